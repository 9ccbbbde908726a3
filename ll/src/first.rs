//! Deletable symbols and terminal start symbols.

use bit_set::BitSet;
use bitvec::prelude::*;
use grammar::{NodeId, NodeKind, SymbolId, Tab};

/// Marks every nonterminal that can derive the empty string. Deletability
/// of a symbol may depend on symbols further down the list, hence the fixed
/// point.
pub fn comp_deletable_symbols(tab: &mut Tab) {
  loop {
    let mut changed = false;
    for i in 0..tab.nonterminals.len() {
      let sym = tab.nonterminals[i];
      let s = tab.sym(sym);
      if !s.deletable && s.graph.is_some() && tab.del_graph(s.graph) {
        tab.sym_mut(sym).deletable = true;
        changed = true;
      }
    }
    if !changed {
      break;
    }
  }

  for i in 0..tab.nonterminals.len() {
    let sym = tab.sym(tab.nonterminals[i]);
    if sym.deletable {
      let (line, msg) = (sym.line, format!("{} deletable", sym.name));
      tab.diags.warning_on(line, msg);
    }
  }
}

fn first0(tab: &Tab, mut p: Option<NodeId>, mark: &mut BitVec) -> BitSet {
  let mut fs = BitSet::new();

  while let Some(id) = p {
    if mark[id.id() as usize] {
      break;
    }
    mark.set(id.id() as usize, true);

    let node = tab.node(id);
    match node.kind {
      NodeKind::Nonterminal(sym) => {
        let sym = tab.sym(sym);
        if sym.first_ready {
          fs.union_with(&sym.first);
        } else {
          fs.union_with(&first0(tab, sym.graph, mark));
        }
      }
      NodeKind::Terminal(sym) | NodeKind::Weak(sym) => {
        fs.insert(tab.sym(sym).n);
      }
      NodeKind::Any => fs.union_with(&node.set),
      NodeKind::Alt => {
        fs.union_with(&first0(tab, node.sub, mark));
        fs.union_with(&first0(tab, node.down, mark));
      }
      NodeKind::Iter | NodeKind::Opt => {
        fs.union_with(&first0(tab, node.sub, mark));
      }
      _ => {}
    }

    if !tab.del_node(id) {
      break;
    }
    p = node.next.node();
  }

  fs
}

/// Terminals that can start the graph from `p` to its end.
pub fn first(tab: &Tab, p: Option<NodeId>) -> BitSet {
  let mut mark = bitvec![0; tab.nodes.len()];
  first0(tab, p, &mut mark)
}

pub fn comp_first_sets(tab: &mut Tab) {
  for &sym in &tab.nonterminals.clone() {
    let s = tab.sym_mut(sym);
    s.first = BitSet::new();
    s.first_ready = false;
  }

  for &sym in &tab.nonterminals.clone() {
    let fs = first(tab, tab.sym(sym).graph);
    let s = tab.sym_mut(sym);
    s.first = fs;
    s.first_ready = true;
  }
}

/// Terminals expected at `p` inside the production of `cur`.
pub fn expected(tab: &Tab, p: Option<NodeId>, cur: SymbolId) -> BitSet {
  let mut s = first(tab, p);
  if tab.del_graph(p) {
    s.union_with(&tab.sym(cur).follow);
  }
  s
}

/// Like [`expected`], but a graph starting with a resolver expects nothing:
/// the resolver decides.
pub fn expected0(tab: &Tab, p: Option<NodeId>, cur: SymbolId) -> BitSet {
  match p {
    Some(p) if tab.node(p).kind == NodeKind::Rslv => BitSet::new(),
    _ => expected(tab, p, cur),
  }
}
