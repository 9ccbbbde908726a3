#![allow(dead_code)]

use grammar::lexer::Dfa;
use grammar::bitset::BitSet;
use grammar::{CharSet, Graph, SymbolId, SymbolKind, Tab};
use llgen::{Error, Generated, Options};

/// Declares tokens and productions the way the grammar reader does.
pub struct Builder {
  pub tab: Tab,
  pub dfa: Dfa,
  line: u32,
}

impl Builder {
  pub fn new() -> Self {
    Self {
      tab: Tab::new(),
      dfa: Dfa::new(),
      line: 1,
    }
  }

  fn sym(&mut self, kind: SymbolKind, name: &str) -> SymbolId {
    match self.tab.find_sym(name) {
      Some(sym) => sym,
      None => self.tab.new_sym(kind, name, self.line),
    }
  }

  /// `CHARACTERS name = from .. to.`
  pub fn char_class(&mut self, name: &str, from: char, to: char) {
    self.tab.new_char_class(name, CharSet::from_range(from as u32, to as u32));
  }

  /// A character class used inside a token.
  pub fn class(&mut self, name: &str) -> Graph {
    let class = self.tab.find_char_class(name).expect("undeclared class");
    Graph::new(self.tab.new_class(class, self.line))
  }

  /// A string used inside a token.
  pub fn chars(&mut self, quoted: &str) -> Graph {
    self.tab.str_to_graph(quoted, self.line)
  }

  /// `TOKENS name = g.`
  pub fn token(&mut self, name: &str, g: Graph) -> SymbolId {
    let sym = self.tab.new_sym(SymbolKind::Terminal, name, self.line);
    self.tab.finish(&g);
    self.dfa.convert_to_states(&mut self.tab, g.l, sym);
    self.line += 1;
    sym
  }

  /// `TOKENS "text"`, or a string used in a production for the first time.
  pub fn literal(&mut self, quoted: &str) -> SymbolId {
    let sym = self.tab.new_sym(SymbolKind::Terminal, quoted, self.line);
    self.dfa.match_literal(&mut self.tab, quoted, sym);
    self.line += 1;
    sym
  }

  /// `COMMENTS FROM from TO to [NESTED]`
  pub fn comment(&mut self, from: &str, to: &str, nested: bool) {
    let line = self.line;
    let (from, to) = (self.tab.str_to_graph(from, line), self.tab.str_to_graph(to, line));
    self.dfa.new_comment(&mut self.tab, from.l, to.l, nested);
  }

  pub fn t(&mut self, name: &str) -> Graph {
    let sym = self.sym(SymbolKind::Terminal, name);
    Graph::new(self.tab.new_terminal(sym, self.line))
  }

  pub fn nt(&mut self, name: &str) -> Graph {
    let sym = self.sym(SymbolKind::Nonterminal, name);
    Graph::new(self.tab.new_nonterminal(sym, self.line))
  }

  pub fn any(&mut self) -> Graph {
    Graph::new(self.tab.new_any(self.line))
  }

  pub fn sync(&mut self) -> Graph {
    Graph::new(self.tab.new_sync(self.line))
  }

  pub fn seq(&mut self, graphs: Vec<Graph>) -> Graph {
    let mut graphs = graphs.into_iter();
    let first = graphs.next().expect("empty sequence");
    graphs.fold(first, |g1, g2| self.tab.make_sequence(g1, g2))
  }

  pub fn alt(&mut self, graphs: Vec<Graph>) -> Graph {
    let mut graphs = graphs.into_iter();
    let first = graphs.next().expect("no alternatives");
    let first = self.tab.make_first_alt(first);
    graphs.fold(first, |g1, g2| self.tab.make_alternative(g1, g2))
  }

  pub fn iter(&mut self, g: Graph) -> Graph {
    self.tab.make_iteration(g)
  }

  pub fn opt(&mut self, g: Graph) -> Graph {
    self.tab.make_option(g)
  }

  /// `name = g.` The first production belongs to the start symbol.
  pub fn prod(&mut self, name: &str, g: Graph) -> SymbolId {
    let sym = self.sym(SymbolKind::Nonterminal, name);
    self.tab.finish(&g);
    self.tab.sym_mut(sym).graph = Some(g.l);
    if self.tab.gram_sy.is_none() {
      self.tab.gram_sy = Some(sym);
    }
    self.line += 1;
    sym
  }

  pub fn generate(self, options: &Options) -> (Tab, Result<Generated, Error>) {
    let Builder { mut tab, dfa, .. } = self;
    let result = llgen::generate(&mut tab, dfa, options);
    (tab, result)
  }
}

pub fn names(tab: &Tab, set: &BitSet) -> Vec<String> {
  set.iter().map(|n| tab.sym(tab.terminal(n)).name.clone()).collect()
}
