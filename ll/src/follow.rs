//! Follow sets. Every nonterminal reference contributes the start symbols of
//! its successors directly; if the successors are deletable, the follow set
//! of the enclosing nonterminal is added afterwards by [`complete`].

use bit_set::BitSet;
use bitvec::prelude::*;
use grammar::{NodeId, NodeKind, SymbolId, Tab};
use crate::first::first;

fn comp_follow(tab: &mut Tab, mut p: Option<NodeId>, cur: SymbolId, visited: &mut BitVec) {
  while let Some(id) = p {
    if visited[id.id() as usize] {
      break;
    }
    visited.set(id.id() as usize, true);

    let node = tab.node(id);
    let (kind, next, sub, down) = (node.kind, node.next.node(), node.sub, node.down);
    match kind {
      NodeKind::Nonterminal(sym) => {
        let s = first(tab, next);
        let deletable = tab.del_graph(next);
        let cur_n = tab.sym(cur).n;

        let sym = tab.sym_mut(sym);
        sym.follow.union_with(&s);
        if deletable {
          sym.nts.insert(cur_n);
        }
      }
      NodeKind::Opt | NodeKind::Iter => {
        comp_follow(tab, sub, cur, visited);
      }
      NodeKind::Alt => {
        comp_follow(tab, sub, cur, visited);
        comp_follow(tab, down, cur, visited);
      }
      _ => {}
    }
    p = next;
  }
}

/// Adds the follow sets of all nonterminals `sym` depends on.
fn complete(tab: &mut Tab, sym: SymbolId, cur: SymbolId, visited: &mut BitVec) {
  let n = tab.sym(sym).n;
  if visited[n] {
    return;
  }
  visited.set(n, true);

  for i in 0..tab.nonterminals.len() {
    if !tab.sym(sym).nts.contains(i) {
      continue;
    }
    let other = tab.nonterminal(i);
    complete(tab, other, cur, visited);

    let follow = tab.sym(other).follow.clone();
    let s = tab.sym_mut(sym);
    s.follow.union_with(&follow);
    if sym == cur {
      s.nts.remove(i);
    }
  }
}

pub fn comp_follow_sets(tab: &mut Tab) {
  let nonterminals = tab.nonterminals.clone();
  for &sym in &nonterminals {
    let s = tab.sym_mut(sym);
    s.follow = BitSet::new();
    s.nts = BitSet::new();
  }
  if let Some(gram_sy) = tab.gram_sy {
    let eof = tab.sym(tab.eof_sy).n;
    tab.sym_mut(gram_sy).follow.insert(eof);
  }

  let mut visited = bitvec![0; tab.nodes.len()];
  for &sym in &nonterminals {
    let graph = tab.sym(sym).graph;
    comp_follow(tab, graph, sym, &mut visited);
  }

  for &sym in &nonterminals {
    let mut visited = bitvec![0; nonterminals.len()];
    complete(tab, sym, sym, &mut visited);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::first::{comp_deletable_symbols, comp_first_sets};
  use crate::testing::Builder;
  use pretty_assertions::assert_eq;

  fn follow_of(tab: &Tab, name: &str) -> Vec<String> {
    let sym = tab.find_sym(name).unwrap();
    tab.sym(sym).follow.iter()
      .map(|n| tab.sym(tab.terminal(n)).name.clone())
      .collect()
  }

  fn solve(tab: &mut Tab) {
    comp_deletable_symbols(tab);
    comp_first_sets(tab);
    comp_follow_sets(tab);
  }

  #[test]
  fn follow_inside_iteration() {
    // S = {A} "b". A = "a".
    let mut b = Builder::new();
    let a = b.nt("A");
    let iter = b.iter(a);
    let t = b.t("b");
    let g = b.seq(vec![iter, t]);
    b.prod("S", g);
    let a = b.t("a");
    b.prod("A", a);
    let mut tab = b.finish();

    solve(&mut tab);
    assert_eq!(follow_of(&tab, "S"), vec!["EOF"]);
    assert_eq!(follow_of(&tab, "A"), vec!["b", "a"]);
  }

  #[test]
  fn follow_propagates_through_deletable_tails() {
    // S = A "x". A = "a" B. B = ["b" C]. C = "c" | A.
    let mut b = Builder::new();
    let (a, x) = (b.nt("A"), b.t("x"));
    let g = b.seq(vec![a, x]);
    b.prod("S", g);
    let (a, nb) = (b.t("a"), b.nt("B"));
    let g = b.seq(vec![a, nb]);
    b.prod("A", g);
    let (t, c) = (b.t("b"), b.nt("C"));
    let g = b.seq(vec![t, c]);
    let g = b.opt(g);
    b.prod("B", g);
    let (t, a) = (b.t("c"), b.nt("A"));
    let g = b.alt(vec![t, a]);
    b.prod("C", g);
    let mut tab = b.finish();

    solve(&mut tab);
    assert_eq!(follow_of(&tab, "A"), vec!["x"]);
    assert_eq!(follow_of(&tab, "B"), vec!["x"]);
    assert_eq!(follow_of(&tab, "C"), vec!["x"]);
    assert!(tab.nonterminals.iter().all(|&sym| tab.sym(sym).nts.is_empty()));
  }
}
