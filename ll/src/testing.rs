//! Builds syntax graphs the way a grammar reader would.

use grammar::{Graph, Position, SymbolId, SymbolKind, Tab};

pub(crate) struct Builder {
  tab: Tab,
  line: u32,
}

impl Builder {
  pub fn new() -> Self {
    Self {
      tab: Tab::new(),
      line: 1,
    }
  }

  fn sym(&mut self, kind: SymbolKind, name: &str) -> SymbolId {
    match self.tab.find_sym(name) {
      Some(sym) => sym,
      None => self.tab.new_sym(kind, name, self.line),
    }
  }

  pub fn t(&mut self, name: &str) -> Graph {
    let sym = self.sym(SymbolKind::Terminal, name);
    Graph::new(self.tab.new_terminal(sym, self.line))
  }

  pub fn wt(&mut self, name: &str) -> Graph {
    let sym = self.sym(SymbolKind::Terminal, name);
    Graph::new(self.tab.new_weak(sym, self.line))
  }

  pub fn nt(&mut self, name: &str) -> Graph {
    let sym = self.sym(SymbolKind::Nonterminal, name);
    Graph::new(self.tab.new_nonterminal(sym, self.line))
  }

  pub fn any(&mut self) -> Graph {
    Graph::new(self.tab.new_any(self.line))
  }

  pub fn eps(&mut self) -> Graph {
    Graph::new(self.tab.new_eps(self.line))
  }

  pub fn sync(&mut self) -> Graph {
    Graph::new(self.tab.new_sync(self.line))
  }

  pub fn rslv(&mut self) -> Graph {
    let pos = Position::new(0, 0, self.line, 1);
    Graph::new(self.tab.new_rslv(pos, self.line))
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

  /// Attaches `g` as the production of `name`. The first production
  /// belongs to the start symbol.
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

  pub fn finish(mut self) -> Tab {
    self.tab.setup_anys();
    self.tab
  }
}
