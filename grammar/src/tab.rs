//! The symbol table and everything shared by the generator passes.

use crate::bitset::{self, BitSet};
use crate::charset::CharSet;
use crate::diag::Diagnostics;
use crate::escape;
use crate::graph::{Node, NodeId, NodeKind};
use crate::symbol::{Symbol, SymbolId, SymbolKind};
use crate::BiMap;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
  pub fn id(&self) -> u32 {
    self.0
  }
}

#[derive(Debug, Clone)]
pub struct CharClass {
  pub n: ClassId,
  pub name: String,
  pub set: CharSet,
}

#[derive(Debug)]
pub struct Tab {
  pub nodes: Vec<Node>,
  pub symbols: Vec<Symbol>,
  pub terminals: Vec<SymbolId>,
  pub pragmas: Vec<SymbolId>,
  pub nonterminals: Vec<SymbolId>,
  pub classes: Vec<CharClass>,
  /// unescaped literal text of tokens declared by a string
  pub literals: BiMap<String, SymbolId>,
  /// characters ignored by the scanner
  pub ignored: CharSet,
  /// start symbol
  pub gram_sy: Option<SymbolId>,
  pub eof_sy: SymbolId,
  /// used in case of an error
  pub no_sy: Option<SymbolId>,
  /// union of all synchronisation sets
  pub all_sync_sets: BitSet,
  pub diags: Diagnostics,
  /// generated class names handed out so far
  dummy_names: usize,
}

impl Default for Tab {
  fn default() -> Self {
    Self::new()
  }
}

impl Tab {
  pub fn new() -> Self {
    let mut tab = Self {
      nodes: vec![],
      symbols: vec![],
      terminals: vec![],
      pragmas: vec![],
      nonterminals: vec![],
      classes: vec![],
      literals: BiMap::new(),
      ignored: CharSet::new(),
      gram_sy: None,
      eof_sy: SymbolId(0),
      no_sy: None,
      all_sync_sets: BitSet::new(),
      diags: Diagnostics::new(),
      dummy_names: 0,
    };
    tab.eof_sy = tab.new_sym(SymbolKind::Terminal, "EOF", 0);
    tab.ignored.set(' ' as u32);
    tab
  }

  pub fn node(&self, p: NodeId) -> &Node {
    &self.nodes[p.index()]
  }

  pub fn node_mut(&mut self, p: NodeId) -> &mut Node {
    &mut self.nodes[p.index()]
  }

  pub fn sym(&self, sym: SymbolId) -> &Symbol {
    &self.symbols[sym.index()]
  }

  pub fn sym_mut(&mut self, sym: SymbolId) -> &mut Symbol {
    &mut self.symbols[sym.index()]
  }

  pub fn new_sym(&mut self, kind: SymbolKind, name: &str, line: u32) -> SymbolId {
    let name = if name == "\"\"" {
      self.diags.error_on(line, "empty token not allowed");
      "???"
    } else {
      name
    };

    let id = SymbolId(self.symbols.len() as u32);
    let n = match kind {
      SymbolKind::Terminal => {
        self.terminals.push(id);
        self.terminals.len() - 1
      }
      SymbolKind::Pragma => {
        self.pragmas.push(id);
        0
      }
      SymbolKind::Nonterminal => {
        self.nonterminals.push(id);
        self.nonterminals.len() - 1
      }
    };

    self.symbols.push(Symbol::new(kind, name.to_owned(), n, line));
    id
  }

  /// Looks up terminals first, then nonterminals.
  pub fn find_sym(&self, name: &str) -> Option<SymbolId> {
    self.terminals
      .iter()
      .chain(&self.nonterminals)
      .copied()
      .find(|&sym| self.sym(sym).name == name)
  }

  /// The terminal a quoted string in a production stands for.
  pub fn find_literal(&mut self, quoted: &str) -> Option<SymbolId> {
    let s = escape::unescape_quoted(quoted, &mut self.diags);
    self.literals.get_by_left(&s).copied()
  }

  /// Creates the symbol that stands for an unknown token. Must be called
  /// after all terminals are declared.
  pub fn new_no_sym(&mut self) -> SymbolId {
    let sym = self.new_sym(SymbolKind::Terminal, "???", 0);
    self.no_sy = Some(sym);
    sym
  }

  /// Pragmas are numbered after the terminals.
  pub fn renumber_pragmas(&mut self) {
    let mut n = self.terminals.len();
    for i in 0..self.pragmas.len() {
      let sym = self.pragmas[i];
      self.sym_mut(sym).n = n;
      n += 1;
    }
  }

  /// Every ANY node starts out matching all terminals but EOF and noSym.
  pub fn setup_anys(&mut self) {
    let mut set = bitset::full(self.terminals.len());
    set.remove(self.sym(self.eof_sy).n);
    if let Some(no_sy) = self.no_sy {
      set.remove(self.sym(no_sy).n);
    }

    for node in &mut self.nodes {
      if node.kind == NodeKind::Any {
        node.set = set.clone();
      }
    }
  }

  /// Terminal with number `n`.
  pub fn terminal(&self, n: usize) -> SymbolId {
    self.terminals[n]
  }

  pub fn nonterminal(&self, n: usize) -> SymbolId {
    self.nonterminals[n]
  }

  /// Registers a character class; the name `#` asks for a generated name.
  pub fn new_char_class(&mut self, name: &str, set: CharSet) -> ClassId {
    let name = if name == "#" {
      let n = self.dummy_names;
      self.dummy_names += 1;
      // `#A` to `#Z`, then `#26`, `#27`, ...
      if n < 26 {
        format!("#{}", (b'A' + n as u8) as char)
      } else {
        format!("#{}", n)
      }
    } else {
      name.to_owned()
    };

    let n = ClassId(self.classes.len() as u32);
    self.classes.push(CharClass { n, name, set });
    n
  }

  pub fn find_char_class(&self, name: &str) -> Option<ClassId> {
    self.classes.iter().find(|c| c.name == name).map(|c| c.n)
  }

  pub fn find_char_class_by_set(&self, set: &CharSet) -> Option<ClassId> {
    self.classes.iter().find(|c| &c.set == set).map(|c| c.n)
  }

  pub fn char_class(&self, class: ClassId) -> &CharClass {
    &self.classes[class.0 as usize]
  }

  pub fn char_class_set(&self, class: ClassId) -> &CharSet {
    &self.char_class(class).set
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn symbols() {
    let mut tab = Tab::new();
    let a = tab.new_sym(SymbolKind::Terminal, "a", 1);
    let p = tab.new_sym(SymbolKind::Pragma, "option", 2);
    let s = tab.new_sym(SymbolKind::Nonterminal, "S", 3);
    let b = tab.new_sym(SymbolKind::Terminal, "b", 1);
    let x = tab.new_sym(SymbolKind::Nonterminal, "b", 3);

    assert_eq!(tab.sym(tab.eof_sy).n, 0);
    assert_eq!(tab.sym(a).n, 1);
    assert_eq!(tab.sym(b).n, 2);
    assert_eq!(tab.sym(s).n, 0);
    assert_eq!(tab.sym(x).n, 1);

    let no = tab.new_no_sym();
    tab.renumber_pragmas();
    assert_eq!(tab.sym(no).n, 3);
    assert_eq!(tab.sym(p).n, 4);

    assert_eq!(tab.find_sym("b"), Some(b));
    assert_eq!(tab.find_sym("S"), Some(s));
    assert_eq!(tab.find_sym("option"), None);

    let e = tab.new_sym(SymbolKind::Terminal, "\"\"", 7);
    assert_eq!(tab.sym(e).name, "???");
    assert_eq!(tab.diags.errors(), 1);
  }

  #[test]
  fn char_classes() {
    let mut tab = Tab::new();
    let digit = tab.new_char_class("digit", CharSet::from_range('0' as u32, '9' as u32));
    let a = tab.new_char_class("#", CharSet::from_range(1, 2));
    let b = tab.new_char_class("#", CharSet::from_range(3, 4));

    assert_eq!(tab.char_class(a).name, "#A");
    assert_eq!(tab.char_class(b).name, "#B");
    assert_eq!(tab.find_char_class("digit"), Some(digit));
    assert_eq!(tab.find_char_class_by_set(&CharSet::from_range(3, 4)), Some(b));
    assert_eq!(tab.find_char_class_by_set(&CharSet::from_range(3, 5)), None);
  }

  #[test]
  fn hundreds_of_generated_classes() {
    let mut tab = Tab::new();
    let classes = (0..300)
      .map(|i| tab.new_char_class("#", CharSet::from_range(2 * i, 2 * i + 1)))
      .collect::<Vec<_>>();

    assert_eq!(tab.char_class(classes[25]).name, "#Z");
    assert_eq!(tab.char_class(classes[26]).name, "#26");
    assert_eq!(tab.char_class(classes[299]).name, "#299");
    for &class in &classes {
      assert_eq!(tab.find_char_class(&tab.char_class(class).name), Some(class));
    }
  }

  #[test]
  fn anys() {
    let mut tab = Tab::new();
    tab.new_sym(SymbolKind::Terminal, "a", 1);
    tab.new_sym(SymbolKind::Terminal, "b", 1);
    let any = tab.new_any(1);
    tab.setup_anys();
    assert_eq!(tab.node(any).set.iter().collect::<Vec<_>>(), vec![1, 2]);

    tab.new_no_sym();
    tab.setup_anys();
    assert_eq!(tab.node(any).set.iter().collect::<Vec<_>>(), vec![1, 2]);
  }
}
