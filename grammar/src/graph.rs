//! The syntax graph: productions and token structures as chains of nodes.

use crate::bitset::BitSet;
use crate::diag::Position;
use crate::lexer::StateId;
use crate::symbol::SymbolId;
use crate::tab::{ClassId, Tab};
use crate::escape;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
  pub fn id(&self) -> u32 {
    self.0
  }

  pub(crate) fn index(&self) -> usize {
    self.0 as usize
  }
}

/// Transition code of a character node.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub enum TransCode {
  Normal,
  /// matched text is cut off from the token afterwards
  Context,
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum NodeKind {
  Terminal(SymbolId),
  Pragma(SymbolId),
  Nonterminal(SymbolId),
  Class { class: ClassId, code: TransCode },
  Char { ch: u32, code: TransCode },
  /// weak terminal
  Weak(SymbolId),
  Any,
  Eps,
  Sync,
  /// semantic action
  Sem,
  Alt,
  Iter,
  Opt,
  /// resolver expression
  Rslv,
}

impl NodeKind {
  pub fn name(&self) -> &'static str {
    match self {
      NodeKind::Terminal(_) => "t",
      NodeKind::Pragma(_) => "pr",
      NodeKind::Nonterminal(_) => "nt",
      NodeKind::Class { .. } => "clas",
      NodeKind::Char { .. } => "chr",
      NodeKind::Weak(_) => "wt",
      NodeKind::Any => "any",
      NodeKind::Eps => "eps",
      NodeKind::Sync => "sync",
      NodeKind::Sem => "sem",
      NodeKind::Alt => "alt",
      NodeKind::Iter => "iter",
      NodeKind::Opt => "opt",
      NodeKind::Rslv => "rslv",
    }
  }

  pub fn sym(&self) -> Option<SymbolId> {
    match *self {
      NodeKind::Terminal(sym)
      | NodeKind::Pragma(sym)
      | NodeKind::Nonterminal(sym)
      | NodeKind::Weak(sym) => Some(sym),
      _ => None,
    }
  }
}

/// Successor edge of a node.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Next {
  /// successor in the same chain
  Seq(Option<NodeId>),
  /// leaves the enclosing alternative, option or iteration
  Up(Option<NodeId>),
}

impl Next {
  pub fn node(&self) -> Option<NodeId> {
    match *self {
      Next::Seq(p) | Next::Up(p) => p,
    }
  }

  pub fn is_up(&self) -> bool {
    matches!(self, Next::Up(_))
  }

  fn set(&mut self, p: Option<NodeId>) {
    *self = match *self {
      Next::Seq(_) => Next::Seq(p),
      Next::Up(_) => Next::Up(p),
    };
  }

  fn up(&mut self) {
    *self = Next::Up(self.node());
  }
}

#[derive(Debug, Clone)]
pub struct Node {
  pub n: NodeId,
  pub kind: NodeKind,
  pub next: Next,
  /// alt: next alternative
  pub down: Option<NodeId>,
  /// alt, iter, opt: first node of the substructure
  pub sub: Option<NodeId>,
  /// any, sync: the set represented by this node
  pub set: BitSet,
  pub line: u32,
  /// t, nt, wt: actual attributes; sem, rslv: source text
  pub pos: Option<Position>,
  /// automaton state of a token node
  pub state: Option<StateId>,
}

impl Node {
  pub fn sym(&self) -> Option<SymbolId> {
    self.kind.sym()
  }

  pub fn up(&self) -> bool {
    self.next.is_up()
  }
}

/// A graph under construction: its head and the nodes whose successor is
/// still to be linked.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Graph {
  pub l: NodeId,
  pub r: Vec<NodeId>,
}

impl Graph {
  pub fn new(p: NodeId) -> Self {
    Self { l: p, r: vec![p] }
  }
}

impl Tab {
  fn new_node(&mut self, kind: NodeKind, sub: Option<NodeId>, line: u32) -> NodeId {
    let n = NodeId(self.nodes.len() as u32);
    self.nodes.push(Node {
      n,
      kind,
      next: Next::Seq(None),
      down: None,
      sub,
      set: BitSet::new(),
      line,
      pos: None,
      state: None,
    });
    n
  }

  pub fn new_terminal(&mut self, sym: SymbolId, line: u32) -> NodeId {
    self.new_node(NodeKind::Terminal(sym), None, line)
  }

  pub fn new_pragma(&mut self, sym: SymbolId, line: u32) -> NodeId {
    self.new_node(NodeKind::Pragma(sym), None, line)
  }

  pub fn new_nonterminal(&mut self, sym: SymbolId, line: u32) -> NodeId {
    self.new_node(NodeKind::Nonterminal(sym), None, line)
  }

  pub fn new_weak(&mut self, sym: SymbolId, line: u32) -> NodeId {
    self.new_node(NodeKind::Weak(sym), None, line)
  }

  pub fn new_char(&mut self, ch: u32, line: u32) -> NodeId {
    self.new_node(NodeKind::Char { ch, code: TransCode::Normal }, None, line)
  }

  pub fn new_class(&mut self, class: ClassId, line: u32) -> NodeId {
    self.new_node(NodeKind::Class { class, code: TransCode::Normal }, None, line)
  }

  pub fn new_any(&mut self, line: u32) -> NodeId {
    self.new_node(NodeKind::Any, None, line)
  }

  pub fn new_eps(&mut self, line: u32) -> NodeId {
    self.new_node(NodeKind::Eps, None, line)
  }

  pub fn new_sync(&mut self, line: u32) -> NodeId {
    self.new_node(NodeKind::Sync, None, line)
  }

  pub fn new_sem(&mut self, pos: Position, line: u32) -> NodeId {
    let p = self.new_node(NodeKind::Sem, None, line);
    self.node_mut(p).pos = Some(pos);
    p
  }

  pub fn new_rslv(&mut self, pos: Position, line: u32) -> NodeId {
    let p = self.new_node(NodeKind::Rslv, None, line);
    self.node_mut(p).pos = Some(pos);
    p
  }

  fn mark_up(&mut self, tails: &[NodeId]) {
    for &p in tails {
      self.node_mut(p).next.up();
    }
  }

  /// Turns `g` into the first arm of an alternative.
  pub fn make_first_alt(&mut self, g: Graph) -> Graph {
    let line = self.node(g.l).line;
    let alt = self.new_node(NodeKind::Alt, Some(g.l), line);
    self.mark_up(&g.r);

    let mut r = vec![alt];
    r.extend(g.r);
    Graph { l: alt, r }
  }

  /// Appends `g2` as a further arm to `g1`, which must have been started with
  /// [`Tab::make_first_alt`].
  pub fn make_alternative(&mut self, g1: Graph, g2: Graph) -> Graph {
    let line = self.node(g2.l).line;
    let alt = self.new_node(NodeKind::Alt, Some(g2.l), line);
    self.node_mut(alt).next = Next::Up(None);
    self.mark_up(&g2.r);

    let mut p = g1.l;
    while let Some(down) = self.node(p).down {
      p = down;
    }
    self.node_mut(p).down = Some(alt);

    let mut r = g1.r;
    r.push(alt);
    r.extend(g2.r);
    Graph { l: g1.l, r }
  }

  pub fn make_sequence(&mut self, g1: Graph, g2: Graph) -> Graph {
    for &p in &g1.r {
      self.node_mut(p).next.set(Some(g2.l));
    }
    Graph { l: g1.l, r: g2.r }
  }

  pub fn make_iteration(&mut self, g: Graph) -> Graph {
    let line = self.node(g.l).line;
    let iter = self.new_node(NodeKind::Iter, Some(g.l), line);
    self.mark_up(&g.r);
    for &p in &g.r {
      self.node_mut(p).next.set(Some(iter));
    }
    Graph::new(iter)
  }

  pub fn make_option(&mut self, g: Graph) -> Graph {
    let line = self.node(g.l).line;
    let opt = self.new_node(NodeKind::Opt, Some(g.l), line);
    self.mark_up(&g.r);

    let mut r = vec![opt];
    r.extend(g.r);
    Graph { l: opt, r }
  }

  /// Terminates all open ends of a complete production or token.
  pub fn finish(&mut self, g: &Graph) {
    for &p in &g.r {
      self.node_mut(p).next.set(None);
    }
  }

  /// Converts a quoted string on `line` into a chain of character nodes.
  pub fn str_to_graph(&mut self, quoted: &str, line: u32) -> Graph {
    let s = escape::unescape_quoted(quoted, &mut self.diags);
    let mut chars = s.chars();

    let first = match chars.next() {
      Some(c) => self.new_char(c as u32, line),
      None => {
        self.diags.error_on(line, "empty token not allowed");
        return Graph::new(self.new_eps(line));
      }
    };

    let mut last = first;
    for c in chars {
      let p = self.new_char(c as u32, line);
      self.node_mut(last).next = Next::Seq(Some(p));
      last = p;
    }

    Graph { l: first, r: vec![last] }
  }

  /// Marks all character transitions of `p` as context transitions.
  pub fn set_context_trans(&mut self, mut p: Option<NodeId>) {
    while let Some(id) = p {
      let node = self.node(id);
      let (kind, sub, down) = (node.kind, node.sub, node.down);
      match kind {
        NodeKind::Char { ch, .. } => {
          self.node_mut(id).kind = NodeKind::Char { ch, code: TransCode::Context };
        }
        NodeKind::Class { class, .. } => {
          self.node_mut(id).kind = NodeKind::Class { class, code: TransCode::Context };
        }
        NodeKind::Opt | NodeKind::Iter => {
          self.set_context_trans(sub);
        }
        NodeKind::Alt => {
          self.set_context_trans(sub);
          self.set_context_trans(down);
        }
        _ => {}
      }

      let node = self.node(id);
      if node.up() {
        break;
      }
      p = node.next.node();
    }
  }

  pub fn del_node(&self, p: NodeId) -> bool {
    let node = self.node(p);
    match node.kind {
      NodeKind::Nonterminal(sym) => self.sym(sym).deletable,
      NodeKind::Alt => {
        self.del_sub_graph(node.sub)
          || node.down.map_or(false, |down| self.del_sub_graph(Some(down)))
      }
      NodeKind::Iter
      | NodeKind::Opt
      | NodeKind::Sem
      | NodeKind::Eps
      | NodeKind::Rslv
      | NodeKind::Sync => true,
      _ => false,
    }
  }

  /// Whether the chain from `p` to its very end can match the empty input.
  pub fn del_graph(&self, mut p: Option<NodeId>) -> bool {
    while let Some(id) = p {
      if !self.del_node(id) {
        return false;
      }
      p = self.node(id).next.node();
    }
    true
  }

  /// Like [`Tab::del_graph`] but stops at the end of the enclosing structure.
  pub fn del_sub_graph(&self, mut p: Option<NodeId>) -> bool {
    while let Some(id) = p {
      if !self.del_node(id) {
        return false;
      }
      let node = self.node(id);
      if node.up() {
        break;
      }
      p = node.next.node();
    }
    true
  }
}
