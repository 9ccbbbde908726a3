//! Grammar model of the generator: symbols, syntax graphs and the scanner
//! automaton built from token declarations.

use std::hash::BuildHasherDefault;

pub mod bitset;
pub mod charset;
pub mod diag;
pub mod escape;
pub mod graph;
pub mod lexer;
pub mod symbol;
pub mod tab;

pub use charset::CharSet;
pub use diag::{Diagnostics, Position};
pub use graph::{Graph, Next, Node, NodeId, NodeKind, TransCode};
pub use symbol::{Symbol, SymbolId, SymbolKind, TokenKind};
pub use tab::{CharClass, ClassId, Tab};

pub type Map<K, V> = indexmap::IndexMap<K, V, BuildHasherDefault<fnv::FnvHasher>>;
pub type Set<K> = indexmap::IndexSet<K, BuildHasherDefault<fnv::FnvHasher>>;
pub type BiMap<K, V> = bimap::BiHashMap<K, V>;
