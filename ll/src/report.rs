//! Trace listings of the symbol table, the symbol sets and the syntax graph.

use std::fmt::{self, Display, Formatter};
use bit_set::BitSet;
use itertools::Itertools;
use grammar::escape;
use grammar::{Map, NodeId, NodeKind, SymbolId, SymbolKind, Tab, TokenKind};

const LINE_WIDTH: usize = 80;

fn kind_name(kind: SymbolKind) -> &'static str {
  match kind {
    SymbolKind::Terminal => "t",
    SymbolKind::Pragma => "pr",
    SymbolKind::Nonterminal => "nt",
  }
}

fn token_kind_name(kind: TokenKind) -> &'static str {
  match kind {
    TokenKind::Fixed => "fixed",
    TokenKind::Class => "class",
    TokenKind::Literal => "lit",
    TokenKind::ClassLiteral => "classlit",
  }
}

/// `label` followed by the names of the terminals in `set`, wrapped at
/// [`LINE_WIDTH`]. Continuation lines are indented by `indent`.
fn set_lines(tab: &Tab, label: &str, indent: usize, set: &BitSet) -> Vec<String> {
  let mut lines = vec![];
  let mut cur = format!("{:<indent$}", label, indent = indent);
  for n in set.iter() {
    let name = &tab.sym(tab.terminal(n)).name;
    if cur.len() > indent && cur.len() + 1 + name.len() > LINE_WIDTH {
      lines.push(cur);
      cur = " ".repeat(indent);
    }
    cur.push(' ');
    cur.push_str(name);
  }
  lines.push(cur.trim_end().to_owned());
  lines
}

fn write_lines(fmt: &mut Formatter, lines: Vec<String>) -> fmt::Result {
  for line in lines {
    writeln!(fmt, "{}", line)?;
  }
  Ok(())
}

/// Terminals, pragmas and nonterminals, followed by the literal tokens.
pub struct Symbols<'a>(pub &'a Tab);

impl<'a> Display for Symbols<'a> {
  fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
    let tab = self.0;
    let row = |n: &dyn Display, name: &str, typ: &str, graph: &str, del: &str, line: &dyn Display, token: &str| {
      format!("{:>3} {:<14} {:<4} {:>5} {:<5} {:>5} {}", n, name, typ, graph, del, line, token)
    };

    writeln!(fmt, "{}", row(&"nr", "name", "typ", "graph", "del", &"line", "tokenKind"))?;
    for &sym in tab.terminals.iter().chain(&tab.pragmas).chain(&tab.nonterminals) {
      let sym = tab.sym(sym);
      let graph = sym.graph.map(|p| p.id().to_string()).unwrap_or_default();
      let token = if sym.is_nonterminal() { "" } else { token_kind_name(sym.token_kind) };
      let line = row(
        &sym.n,
        &sym.name,
        kind_name(sym.kind),
        &graph,
        if sym.deletable { "true" } else { "false" },
        &sym.line,
        token,
      );
      writeln!(fmt, "{}", line.trim_end())?;
    }

    if !tab.literals.is_empty() {
      writeln!(fmt)?;
      writeln!(fmt, "Literal Tokens:")?;
      let literals = tab.literals.iter().sorted_by_key(|&(_, sym)| *sym);
      for (text, &sym) in literals {
        writeln!(fmt, "{} = \"{}\".", tab.sym(sym).name, escape::escape(text))?;
      }
    }
    Ok(())
  }
}

/// First and Follow sets of every nonterminal.
pub struct Sets<'a>(pub &'a Tab);

impl<'a> Display for Sets<'a> {
  fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
    let tab = self.0;
    for (i, &sym) in tab.nonterminals.iter().enumerate() {
      let sym = tab.sym(sym);
      if i > 0 {
        writeln!(fmt)?;
      }
      writeln!(fmt, "{}", sym.name)?;
      write_lines(fmt, set_lines(tab, "first:", 9, &sym.first))?;
      write_lines(fmt, set_lines(tab, "follow:", 9, &sym.follow))?;
    }
    Ok(())
  }
}

/// The terminal sets of all ANY and SYNC nodes.
pub struct AnySyncSets<'a>(pub &'a Tab);

impl<'a> Display for AnySyncSets<'a> {
  fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
    let tab = self.0;
    for node in &tab.nodes {
      if let NodeKind::Any | NodeKind::Sync = node.kind {
        let label = format!("{:>4} {:<4}:", node.n.id(), node.kind.name());
        write_lines(fmt, set_lines(tab, &label, 10, &node.set))?;
      }
    }
    Ok(())
  }
}

fn ptr(p: Option<NodeId>, up: bool) -> String {
  match p {
    Some(p) if up => format!("^{}", p.id()),
    Some(p) => p.id().to_string(),
    None => String::new(),
  }
}

/// All nodes of the syntax graph. Successors that leave the enclosing
/// structure are marked with `^`.
pub struct Nodes<'a>(pub &'a Tab);

impl<'a> Display for Nodes<'a> {
  fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
    let tab = self.0;
    let row = |n: &str, typ: &str, name: &str, next: &str, down: &str, sub: &str, line: &str| {
      format!("{:>4} {:<4} {:<12} {:>5} {:>5} {:>5} {:>5}", n, typ, name, next, down, sub, line)
    };

    writeln!(fmt, "{}", row("n", "type", "name", "next", "down", "sub", "line"))?;
    for node in &tab.nodes {
      let name = match node.kind {
        NodeKind::Terminal(sym)
        | NodeKind::Pragma(sym)
        | NodeKind::Nonterminal(sym)
        | NodeKind::Weak(sym) => tab.sym(sym).name.clone(),
        NodeKind::Class { class, .. } => tab.char_class(class).name.clone(),
        NodeKind::Char { ch, .. } => ch.to_string(),
        NodeKind::Sem | NodeKind::Rslv => match node.pos {
          Some(pos) => format!("{}..{}", pos.beg, pos.end),
          None => String::new(),
        },
        _ => String::new(),
      };
      let line = row(
        &node.n.id().to_string(),
        node.kind.name(),
        &name,
        &ptr(node.next.node(), node.up()),
        &ptr(node.down, false),
        &ptr(node.sub, false),
        &node.line.to_string(),
      );
      writeln!(fmt, "{}", line.trim_end())?;
    }
    Ok(())
  }
}

/// Lines on which every symbol is used, sorted by name. Definitions of
/// nonterminals are listed as negative line numbers.
pub struct CrossRef<'a>(pub &'a Tab);

impl<'a> CrossRef<'a> {
  fn collect(&self) -> Map<SymbolId, Vec<i64>> {
    let tab = self.0;
    let mut xref = Map::<SymbolId, Vec<i64>>::default();
    for &sym in &tab.nonterminals {
      xref.entry(sym).or_default().push(-i64::from(tab.sym(sym).line));
    }
    for node in &tab.nodes {
      if let NodeKind::Terminal(sym) | NodeKind::Weak(sym) | NodeKind::Nonterminal(sym) = node.kind {
        xref.entry(sym).or_default().push(i64::from(node.line));
      }
    }
    xref
  }
}

impl<'a> Display for CrossRef<'a> {
  fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
    let tab = self.0;
    let xref = self.collect();
    let entries = xref.iter()
      .sorted_by(|(a, _), (b, _)| tab.sym(**a).name.cmp(&tab.sym(**b).name));

    for (&sym, lines) in entries {
      write!(fmt, "  {:<12}", tab.sym(sym).name)?;
      for (i, line) in lines.iter().enumerate() {
        if i > 0 && i % 12 == 0 {
          write!(fmt, "\n{:14}", "")?;
        }
        write!(fmt, "{:>5}", line)?;
      }
      writeln!(fmt)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::comp_symbol_sets;
  use crate::testing::Builder;
  use insta::assert_snapshot;
  use pretty_assertions::assert_eq;

  // S = "a" A. A = ["b"].
  fn grammar() -> Tab {
    let mut b = Builder::new();
    let (a, na) = (b.t("a"), b.nt("A"));
    let g = b.seq(vec![a, na]);
    b.prod("S", g);
    let t = b.t("b");
    let g = b.opt(t);
    b.prod("A", g);
    let mut tab = b.finish();
    comp_symbol_sets(&mut tab);
    tab
  }

  fn columns(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
  }

  #[test]
  fn symbols() {
    let mut tab = grammar();
    let a = tab.find_sym("a").unwrap();
    tab.sym_mut(a).token_kind = TokenKind::Literal;
    tab.literals.insert("a".to_owned(), a);

    let listing = Symbols(&tab).to_string();
    let lines = listing.lines().collect::<Vec<_>>();
    assert_eq!(columns(lines[0]), vec!["nr", "name", "typ", "graph", "del", "line", "tokenKind"]);
    assert_eq!(columns(lines[1]), vec!["0", "EOF", "t", "false", "0", "fixed"]);
    assert_eq!(columns(lines[2]), vec!["1", "a", "t", "false", "1", "lit"]);
    assert_eq!(columns(lines[3]), vec!["2", "b", "t", "false", "2", "fixed"]);
    assert_eq!(columns(lines[4]), vec!["0", "A", "nt", "3", "true", "1"]);
    assert_eq!(columns(lines[5]), vec!["1", "S", "nt", "0", "false", "1"]);
    assert_eq!(&lines[6..], &["", "Literal Tokens:", "a = \"a\"."]);
  }

  #[test]
  fn first_and_follow() {
    let tab = grammar();
    assert_snapshot!(Sets(&tab).to_string(), @r###"
    A
    first:    b
    follow:   EOF

    S
    first:    a
    follow:   EOF
    "###);
  }

  #[test]
  fn long_sets_are_wrapped() {
    let mut b = Builder::new();
    let arms = (0..30).map(|i| b.t(&format!("token{:02}", i))).collect::<Vec<_>>();
    let g = b.alt(arms);
    b.prod("S", g);
    let mut tab = b.finish();
    comp_symbol_sets(&mut tab);

    let s = tab.find_sym("S").unwrap();
    let lines = set_lines(&tab, "first:", 9, &tab.sym(s).first);
    assert!(lines.len() > 1);
    assert!(lines.iter().all(|line| line.len() <= LINE_WIDTH));
    assert!(lines[1..].iter().all(|line| line.starts_with("          token")));
    let names = lines.iter().flat_map(|line| columns(line)).skip(1).count();
    assert_eq!(names, 30);
  }

  // S = SYNC ["a"] ANY "b".
  fn sync_grammar() -> Tab {
    let mut b = Builder::new();
    let (sync, a) = (b.sync(), b.t("a"));
    let opt = b.opt(a);
    let (any, t) = (b.any(), b.t("b"));
    let g = b.seq(vec![sync, opt, any, t]);
    b.prod("S", g);
    let mut tab = b.finish();
    comp_symbol_sets(&mut tab);
    tab
  }

  #[test]
  fn any_and_sync_sets() {
    let tab = sync_grammar();
    let listing = AnySyncSets(&tab).to_string();
    assert_eq!(listing.lines().collect::<Vec<_>>(), vec![
      "   0 sync: EOF a b",
      "   3 any : b",
    ]);
  }

  #[test]
  fn nodes() {
    let tab = sync_grammar();
    let listing = Nodes(&tab).to_string();
    assert_eq!(listing.lines().collect::<Vec<_>>(), vec![
      "   n type name          next  down   sub  line",
      "   0 sync                  2                 1",
      "   1 t    a               ^3                 1",
      "   2 opt                   3           1     1",
      "   3 any                   4                 1",
      "   4 t    b                                  1",
    ]);
  }

  #[test]
  fn cross_reference() {
    let tab = grammar();
    let listing = CrossRef(&tab).to_string();
    assert_eq!(listing.lines().collect::<Vec<_>>(), vec![
      "  A              -1    1",
      "  S              -1",
      "  a               1",
      "  b               2",
    ]);
  }
}
