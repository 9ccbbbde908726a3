//! Grammar checks: every nonterminal has a production, is reachable, is not
//! circular and derives terminal strings.

use bitvec::prelude::*;
use grammar::{NodeId, NodeKind, SymbolId, Tab};

pub fn nts_complete(tab: &mut Tab) -> bool {
  let mut complete = true;
  for &sym in &tab.nonterminals.clone() {
    let sym = tab.sym(sym);
    if sym.graph.is_none() {
      complete = false;
      let (line, msg) = (sym.line, format!("No production for {}", sym.name));
      tab.diags.error_on(line, msg);
    }
  }
  complete
}

fn mark_reached_nts(tab: &Tab, mut p: Option<NodeId>, visited: &mut BitVec) {
  while let Some(id) = p {
    let node = tab.node(id);
    match node.kind {
      NodeKind::Nonterminal(sym) => {
        let sym = tab.sym(sym);
        if !visited[sym.n] {
          visited.set(sym.n, true);
          mark_reached_nts(tab, sym.graph, visited);
        }
      }
      NodeKind::Alt => {
        mark_reached_nts(tab, node.sub, visited);
        mark_reached_nts(tab, node.down, visited);
      }
      NodeKind::Iter | NodeKind::Opt => {
        mark_reached_nts(tab, node.sub, visited);
      }
      _ => {}
    }
    if node.up() {
      break;
    }
    p = node.next.node();
  }
}

/// Warns about nonterminals that cannot be reached from the start symbol.
pub fn all_nt_reached(tab: &mut Tab) -> bool {
  let mut visited = bitvec![0; tab.nonterminals.len()];
  if let Some(gram_sy) = tab.gram_sy {
    let sym = tab.sym(gram_sy);
    visited.set(sym.n, true);
    mark_reached_nts(tab, sym.graph, &mut visited);
  }

  let mut ok = true;
  for &sym in &tab.nonterminals.clone() {
    let sym = tab.sym(sym);
    if !visited[sym.n] {
      ok = false;
      let (line, msg) = (sym.line, format!("{} cannot be reached", sym.name));
      tab.diags.warning_on(line, msg);
    }
  }
  ok
}

/// Nonterminals `p` can derive as the only symbol, e.g. `B` in `A = [x] B.`
fn get_singles(tab: &Tab, p: Option<NodeId>, singles: &mut Vec<SymbolId>) {
  let id = match p {
    Some(id) => id,
    None => return,
  };
  let node = tab.node(id);
  let next = node.next.node();

  match node.kind {
    NodeKind::Nonterminal(sym) => {
      if node.up() || tab.del_graph(next) {
        singles.push(sym);
      }
    }
    NodeKind::Alt | NodeKind::Iter | NodeKind::Opt => {
      if node.up() || tab.del_graph(next) {
        get_singles(tab, node.sub, singles);
        if node.kind == NodeKind::Alt {
          get_singles(tab, node.down, singles);
        }
      }
    }
    _ => {}
  }

  if !node.up() && tab.del_node(id) {
    get_singles(tab, next, singles);
  }
}

/// Reports nonterminals that derive themselves without consuming input.
/// Chain derivations `A -> B` that are not part of a cycle are pruned until
/// only the cycles remain.
pub fn no_circular_productions(tab: &mut Tab) -> bool {
  let mut list = vec![];
  for &sym in &tab.nonterminals {
    let mut singles = vec![];
    get_singles(tab, tab.sym(sym).graph, &mut singles);
    list.extend(singles.into_iter().map(|single| (sym, single)));
  }

  loop {
    let len = list.len();
    let snapshot = list.clone();
    list.retain(|&(left, right)| {
      let on_right_side = snapshot.iter().any(|&(_, r)| r == left);
      let on_left_side = snapshot.iter().any(|&(l, _)| l == right);
      on_left_side && on_right_side
    });
    if list.len() == len {
      break;
    }
  }

  for &(left, right) in &list {
    let line = tab.sym(left).line;
    let msg = format!("{} --> {}", tab.sym(left).name, tab.sym(right).name);
    tab.diags.error_on(line, msg);
  }
  list.is_empty()
}

/// Whether `p` can be derived to terminals, given the nonterminals in
/// `mark` can.
fn is_term(tab: &Tab, mut p: Option<NodeId>, mark: &BitVec) -> bool {
  while let Some(id) = p {
    let node = tab.node(id);
    match node.kind {
      NodeKind::Nonterminal(sym) if !mark[tab.sym(sym).n] => return false,
      NodeKind::Alt => {
        if !is_term(tab, node.sub, mark)
          && node.down.map_or(true, |down| !is_term(tab, Some(down), mark))
        {
          return false;
        }
      }
      _ => {}
    }
    if node.up() {
      break;
    }
    p = node.next.node();
  }
  true
}

pub fn all_nt_to_term(tab: &mut Tab) -> bool {
  let mut mark = bitvec![0; tab.nonterminals.len()];
  loop {
    let mut changed = false;
    for &sym in &tab.nonterminals {
      let sym = tab.sym(sym);
      if !mark[sym.n] && is_term(tab, sym.graph, &mark) {
        mark.set(sym.n, true);
        changed = true;
      }
    }
    if !changed {
      break;
    }
  }

  let mut ok = true;
  for &sym in &tab.nonterminals.clone() {
    let sym = tab.sym(sym);
    if !mark[sym.n] {
      ok = false;
      let (line, msg) = (sym.line, format!("{} cannot be derived to terminals", sym.name));
      tab.diags.error_on(line, msg);
    }
  }
  ok
}
