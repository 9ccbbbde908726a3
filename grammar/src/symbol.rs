use crate::bitset::BitSet;
use crate::graph::NodeId;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
  pub fn id(&self) -> u32 {
    self.0
  }

  pub(crate) fn index(&self) -> usize {
    self.0 as usize
  }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum SymbolKind {
  Terminal,
  Pragma,
  Nonterminal,
}

/// How a terminal is recognized by the scanner.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum TokenKind {
  /// a structure of literals, e.g. `'a' ('b' | 'c')`
  Fixed,
  /// at least one character class, e.g. `digit {digit}`
  Class,
  /// e.g. `"while"`
  Literal,
  /// a class token that shares its final state with literals, which must be
  /// looked up in the literal table
  ClassLiteral,
}

#[derive(Debug, Clone)]
pub struct Symbol {
  pub kind: SymbolKind,
  pub name: String,
  /// terminal, pragma and nonterminal numbers are counted separately
  pub n: usize,
  pub line: u32,
  /// nonterminals: head of the production
  pub graph: Option<NodeId>,
  pub token_kind: TokenKind,
  pub deletable: bool,
  /// terminal start symbols are already computed
  pub first_ready: bool,
  pub first: BitSet,
  pub follow: BitSet,
  /// nonterminals whose followers have to be added to this symbol
  pub nts: BitSet,
}

impl Symbol {
  pub(crate) fn new(kind: SymbolKind, name: String, n: usize, line: u32) -> Self {
    Self {
      kind,
      name,
      n,
      line,
      graph: None,
      token_kind: TokenKind::Fixed,
      deletable: false,
      first_ready: false,
      first: BitSet::new(),
      follow: BitSet::new(),
      nts: BitSet::new(),
    }
  }

  pub fn is_terminal(&self) -> bool {
    self.kind == SymbolKind::Terminal
  }

  pub fn is_nonterminal(&self) -> bool {
    self.kind == SymbolKind::Nonterminal
  }
}
