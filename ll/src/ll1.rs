//! LL(1) conflicts and the placement of resolvers.

use bit_set::BitSet;
use grammar::bitset;
use grammar::{NodeId, NodeKind, SymbolId, Tab};
use crate::first::{expected, expected0, first};

#[derive(Clone, Copy)]
enum Conflict {
  Alternatives,
  DeletableStructure,
  EmptyAny,
  DeletableContents,
}

fn ll1_error(tab: &mut Tab, line: u32, cur: SymbolId, conflict: Conflict, sym: Option<SymbolId>) {
  let mut msg = format!("LL1 warning in {}: ", tab.sym(cur).name);
  if let Some(sym) = sym {
    msg += &format!("{} is ", tab.sym(sym).name);
  }
  msg += match conflict {
    Conflict::Alternatives => "start of several alternatives",
    Conflict::DeletableStructure => "start & successor of deletable structure",
    Conflict::EmptyAny => "an ANY node that matches no symbol",
    Conflict::DeletableContents => "contents of [...] or {...} must not be deletable",
  };
  tab.diags.warning_on(line, msg);
}

fn check_overlap(
  tab: &mut Tab,
  line: u32,
  cur: SymbolId,
  s1: &BitSet,
  s2: &BitSet,
  conflict: Conflict,
) {
  for n in s1.intersection(s2).collect::<Vec<_>>() {
    let sym = tab.terminal(n);
    ll1_error(tab, line, cur, conflict, Some(sym));
  }
}

fn check_alts(tab: &mut Tab, mut p: Option<NodeId>, cur: SymbolId) {
  while let Some(id) = p {
    let node = tab.node(id);
    let (kind, next, sub, line, up) = (node.kind, node.next.node(), node.sub, node.line, node.up());

    match kind {
      NodeKind::Alt => {
        let mut s1 = BitSet::new();
        let mut q = Some(id);
        while let Some(alt) = q {
          let (sub, down) = (tab.node(alt).sub, tab.node(alt).down);
          let s2 = expected0(tab, sub, cur);
          check_overlap(tab, line, cur, &s1, &s2, Conflict::Alternatives);
          s1.union_with(&s2);
          check_alts(tab, sub, cur);
          q = down;
        }
      }
      NodeKind::Opt | NodeKind::Iter => {
        if tab.del_sub_graph(sub) {
          ll1_error(tab, line, cur, Conflict::DeletableContents, None);
        } else {
          let s1 = expected0(tab, sub, cur);
          let s2 = expected(tab, next, cur);
          check_overlap(tab, line, cur, &s1, &s2, Conflict::DeletableStructure);
        }
        check_alts(tab, sub, cur);
      }
      NodeKind::Any => {
        if tab.node(id).set.is_empty() {
          ll1_error(tab, line, cur, Conflict::EmptyAny, None);
        }
      }
      _ => {}
    }

    if up {
      break;
    }
    p = next;
  }
}

/// Warns about every terminal that cannot decide between the alternatives
/// of a production.
pub fn check_ll1(tab: &mut Tab) {
  for &sym in &tab.nonterminals.clone() {
    let graph = tab.sym(sym).graph;
    check_alts(tab, graph, sym);
  }
}

fn res_err(tab: &mut Tab, p: NodeId, msg: &str) {
  let (pos, line) = (tab.node(p).pos, tab.node(p).line);
  match pos {
    Some(pos) => tab.diags.warning_at(pos, msg),
    None => tab.diags.warning_on(line, msg),
  }
}

fn is_rslv(tab: &Tab, p: NodeId) -> bool {
  tab.node(p).kind == NodeKind::Rslv
}

fn check_res(tab: &mut Tab, mut p: Option<NodeId>, cur: SymbolId, mut rslv_allowed: bool) {
  while let Some(id) = p {
    let node = tab.node(id);
    let (kind, next, sub, up) = (node.kind, node.next.node(), node.sub, node.up());

    match kind {
      NodeKind::Alt => {
        let mut expected_all = BitSet::new();
        let mut q = Some(id);
        while let Some(alt) = q {
          expected_all.union_with(&expected0(tab, tab.node(alt).sub, cur));
          q = tab.node(alt).down;
        }

        let mut so_far = BitSet::new();
        let mut q = Some(id);
        while let Some(alt) = q {
          let (sub, down) = (tab.node(alt).sub, tab.node(alt).down);
          match sub.filter(|&sub| is_rslv(tab, sub)) {
            Some(rslv) => {
              let fs = expected(tab, tab.node(rslv).next.node(), cur);
              if bitset::intersect(&fs, &so_far) {
                res_err(tab, rslv,
                  "Resolver will never be evaluated. Place it at previous conflicting alternative.");
              }
              if !bitset::intersect(&fs, &expected_all) {
                res_err(tab, rslv, "Misplaced resolver: no LL(1) conflict.");
              }
            }
            _ => so_far.union_with(&expected(tab, sub, cur)),
          }
          check_res(tab, sub, cur, true);
          q = down;
        }
      }
      NodeKind::Iter | NodeKind::Opt => {
        if let Some(rslv) = sub.filter(|&sub| is_rslv(tab, sub)) {
          let fs = first(tab, tab.node(rslv).next.node());
          let fs_next = expected(tab, next, cur);
          if !bitset::intersect(&fs, &fs_next) {
            res_err(tab, rslv, "Misplaced resolver: no LL(1) conflict.");
          }
        }
        check_res(tab, sub, cur, true);
      }
      NodeKind::Rslv => {
        if !rslv_allowed {
          res_err(tab, id, "Misplaced resolver: no alternative.");
        }
      }
      _ => {}
    }

    if up {
      break;
    }
    p = next;
    rslv_allowed = false;
  }
}

/// Warns about resolvers that are never evaluated or that do not resolve
/// an LL(1) conflict.
pub fn check_resolvers(tab: &mut Tab) {
  for &sym in &tab.nonterminals.clone() {
    let graph = tab.sym(sym).graph;
    check_res(tab, graph, sym, false);
  }
}
