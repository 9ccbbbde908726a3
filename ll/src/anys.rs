//! ANY sets and synchronisation sets.

use bit_set::BitSet;
use bitvec::prelude::*;
use grammar::{NodeId, NodeKind, SymbolId, Tab};
use crate::first::{expected, first};

/// The first ANY node that can be reached from `p` without consuming a
/// terminal.
fn leading_any(tab: &Tab, p: Option<NodeId>) -> Option<NodeId> {
  let id = p?;
  let node = tab.node(id);
  let any = match node.kind {
    NodeKind::Any => Some(id),
    NodeKind::Alt => leading_any(tab, node.sub).or_else(|| leading_any(tab, node.down)),
    NodeKind::Opt | NodeKind::Iter => leading_any(tab, node.sub),
    _ => None,
  };

  if any.is_none() && tab.del_node(id) && !node.up() {
    leading_any(tab, node.next.node())
  } else {
    any
  }
}

fn subtract_from_any(tab: &mut Tab, any: NodeId, s: &BitSet) {
  tab.node_mut(any).set.difference_with(s);
}

/// Removes from every ANY set the terminals that could also be taken by a
/// preceding optional part, e.g. `a` and `b` in `[a] ANY`, `{a | b} ANY`,
/// `[a] [b] ANY` and `(a | ) ANY`.
fn find_any_sets(tab: &mut Tab, mut p: Option<NodeId>) {
  while let Some(id) = p {
    let node = tab.node(id);
    let (kind, next, sub, up) = (node.kind, node.next.node(), node.sub, node.up());

    match kind {
      NodeKind::Opt | NodeKind::Iter => {
        find_any_sets(tab, sub);
        if let Some(any) = leading_any(tab, sub) {
          let s = first(tab, next);
          subtract_from_any(tab, any, &s);
        }
      }
      NodeKind::Alt => {
        let mut s1 = BitSet::new();
        let mut q = Some(id);
        while let Some(alt) = q {
          let (sub, down) = (tab.node(alt).sub, tab.node(alt).down);
          find_any_sets(tab, sub);
          match leading_any(tab, sub) {
            Some(any) => {
              let mut s = first(tab, down);
              s.union_with(&s1);
              subtract_from_any(tab, any, &s);
            }
            None => s1.union_with(&first(tab, sub)),
          }
          q = down;
        }
      }
      _ => {}
    }

    if tab.del_node(id) {
      if let Some(any) = leading_any(tab, next) {
        let q = match kind {
          NodeKind::Nonterminal(sym) => tab.sym(sym).graph,
          _ => sub,
        };
        let s = first(tab, q);
        subtract_from_any(tab, any, &s);
      }
    }

    if up {
      break;
    }
    p = next;
  }
}

pub fn comp_any_sets(tab: &mut Tab) {
  for &sym in &tab.nonterminals.clone() {
    let graph = tab.sym(sym).graph;
    find_any_sets(tab, graph);
  }
}

fn comp_sync(tab: &mut Tab, mut p: Option<NodeId>, cur: SymbolId, visited: &mut BitVec) {
  while let Some(id) = p {
    if visited[id.id() as usize] {
      break;
    }
    visited.set(id.id() as usize, true);

    let node = tab.node(id);
    let (kind, next, sub, down) = (node.kind, node.next.node(), node.sub, node.down);
    match kind {
      NodeKind::Sync => {
        let mut s = expected(tab, next, cur);
        s.insert(tab.sym(tab.eof_sy).n);
        tab.all_sync_sets.union_with(&s);
        tab.node_mut(id).set = s;
      }
      NodeKind::Alt => {
        comp_sync(tab, sub, cur, visited);
        comp_sync(tab, down, cur, visited);
      }
      NodeKind::Opt | NodeKind::Iter => {
        comp_sync(tab, sub, cur, visited);
      }
      _ => {}
    }
    p = next;
  }
}

/// Computes the terminals a SYNC node recovers at, and their union over
/// the whole grammar.
pub fn comp_sync_sets(tab: &mut Tab) {
  tab.all_sync_sets = BitSet::new();
  tab.all_sync_sets.insert(tab.sym(tab.eof_sy).n);

  let mut visited = bitvec![0; tab.nodes.len()];
  for &sym in &tab.nonterminals.clone() {
    let graph = tab.sym(sym).graph;
    comp_sync(tab, graph, sym, &mut visited);
  }
}
