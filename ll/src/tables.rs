//! What a parser emitter needs beyond the symbol sets: registered condition
//! sets and the choice between a switch and a chain of conditions.

use bit_set::BitSet;
use grammar::bitset;
use grammar::{NodeId, NodeKind, SymbolId, Tab};
use crate::first::expected0;

/// Sets with more terminals are tested through a registered set.
pub const MAX_TERM: usize = 3;

/// How a parser tests for the terminals of a set.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Cond {
  /// the set is empty
  Never,
  /// compare against each terminal
  Enumerate(Vec<SymbolId>),
  /// look up a registered set
  StartOf(usize),
}

/// Registered terminal sets. Set 0 is the union of all synchronisation sets.
#[derive(Debug, Clone)]
pub struct CondSets {
  sets: Vec<BitSet>,
}

impl CondSets {
  pub fn new(tab: &Tab) -> Self {
    Self {
      sets: vec![tab.all_sync_sets.clone()],
    }
  }

  /// Index of `s`, registering it if no equal set is known.
  pub fn new_cond_set(&mut self, s: &BitSet) -> usize {
    match self.sets.iter().skip(1).position(|set| set == s) {
      Some(i) => i + 1,
      None => {
        self.sets.push(s.clone());
        self.sets.len() - 1
      }
    }
  }

  pub fn cond(&mut self, tab: &Tab, s: &BitSet) -> Cond {
    let n = bitset::elements(s);
    if n == 0 {
      Cond::Never
    } else if n <= MAX_TERM {
      Cond::Enumerate(s.iter().map(|n| tab.terminal(n)).collect())
    } else {
      Cond::StartOf(self.new_cond_set(s))
    }
  }

  pub fn sets(&self) -> &[BitSet] {
    &self.sets
  }
}

/// Whether the alternative `p` of `cur` is better emitted as a switch: it
/// has many arms, all decided by one look-ahead terminal.
pub fn use_switch(tab: &Tab, p: NodeId, cur: SymbolId) -> bool {
  if tab.node(p).kind != NodeKind::Alt {
    return false;
  }

  let mut n_alts = 0;
  let mut s1 = BitSet::new();
  let mut q = Some(p);
  while let Some(alt) = q {
    let sub = tab.node(alt).sub;
    let s2 = expected0(tab, sub, cur);
    if bitset::intersect(&s1, &s2) {
      return false;
    }
    s1.union_with(&s2);
    n_alts += 1;
    if sub.map_or(false, |sub| tab.node(sub).kind == NodeKind::Rslv) {
      return false;
    }
    q = tab.node(alt).down;
  }
  n_alts > 5
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::comp_symbol_sets;
  use crate::testing::Builder;
  use grammar::Graph;
  use pretty_assertions::assert_eq;

  fn terminals(b: &mut Builder, names: &[&str]) -> Vec<Graph> {
    names.iter().map(|name| b.t(name)).collect()
  }

  #[test]
  fn cond_sets() {
    let mut b = Builder::new();
    let arms = terminals(&mut b, &["a", "b", "c", "d"]);
    let g = b.alt(arms);
    b.prod("S", g);
    let mut tab = b.finish();
    comp_symbol_sets(&mut tab);

    let mut sets = CondSets::new(&tab);
    assert_eq!(sets.cond(&tab, &BitSet::new()), Cond::Never);

    let small = [1, 2].iter().copied().collect::<BitSet>();
    assert_eq!(sets.cond(&tab, &small), Cond::Enumerate(vec![tab.terminal(1), tab.terminal(2)]));

    let large = [1, 2, 3, 4].iter().copied().collect::<BitSet>();
    assert_eq!(sets.cond(&tab, &large), Cond::StartOf(1));
    assert_eq!(sets.cond(&tab, &large), Cond::StartOf(1));
    assert_eq!(sets.new_cond_set(&small), 2);

    // an equal set at index 0 is not shared
    let sync = tab.all_sync_sets.clone();
    assert_eq!(sets.new_cond_set(&sync), 3);
    assert_eq!(sets.sets().len(), 4);
  }

  #[test]
  fn switch_for_many_alternatives() {
    let mut b = Builder::new();
    let arms = terminals(&mut b, &["a", "b", "c", "d", "e", "f"]);
    let g = b.alt(arms);
    let s = b.prod("S", g);
    let arms = terminals(&mut b, &["a", "b", "c", "d", "e"]);
    let g = b.alt(arms);
    let t = b.prod("T", g);
    let arms = terminals(&mut b, &["a", "b", "c", "d", "e", "a"]);
    let g = b.alt(arms);
    let u = b.prod("U", g);
    let mut tab = b.finish();
    comp_symbol_sets(&mut tab);

    let graph = |sym: SymbolId| tab.sym(sym).graph.unwrap();
    assert!(use_switch(&tab, graph(s), s));
    assert!(!use_switch(&tab, graph(t), t));
    assert!(!use_switch(&tab, graph(u), u));
  }

  #[test]
  fn no_switch_with_resolver() {
    let mut b = Builder::new();
    let mut arms = terminals(&mut b, &["a", "b", "c", "d", "e"]);
    let (r, f) = (b.rslv(), b.t("f"));
    arms.push(b.seq(vec![r, f]));
    let g = b.alt(arms);
    let s = b.prod("S", g);
    let mut tab = b.finish();
    comp_symbol_sets(&mut tab);

    let graph = tab.sym(s).graph.unwrap();
    assert!(!use_switch(&tab, graph, s));
  }
}
