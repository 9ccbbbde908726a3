//! Adds token structures, literals and comment delimiters to the automaton.

use bitvec::prelude::*;
use crate::escape;
use crate::graph::{NodeId, NodeKind, TransCode};
use crate::symbol::{SymbolId, TokenKind};
use crate::tab::Tab;
use super::dfa::{Comment, Dfa, NfaAction};
use super::{ActionSym, StateId};

impl Dfa {
  fn new_transition(
    &mut self,
    tab: &mut Tab,
    from: StateId,
    to: StateId,
    sym: ActionSym,
    code: TransCode
  ) {
    if sym.is_class() {
      if let Some(cur_sy) = self.cur_sy {
        tab.sym_mut(cur_sy).token_kind = TokenKind::Class;
      }
    }
    if code == TransCode::Context {
      self.has_ctx_moves = true;
    }
    self.state_mut(from).add_action(NfaAction::new(sym, code, to));
  }

  /// State of `p`, or a new final state at the end of the token.
  fn the_state(&mut self, tab: &Tab, p: Option<NodeId>) -> StateId {
    match p.and_then(|p| tab.node(p).state) {
      Some(state) => state,
      None => {
        let state = self.new_state();
        self.state_mut(state).end_of = self.cur_sy;
        state
      }
    }
  }

  /// Assigns a state to every node; there is a transition from the state of
  /// a character node to the state of its successor. All nodes of an
  /// alternative chain share one state.
  ///
  /// A new state is needed after a character, option or alternative, at an
  /// iteration that starts a nested structure and at an iteration that
  /// follows another iteration.
  fn number_nodes(
    &mut self,
    tab: &mut Tab,
    p: Option<NodeId>,
    state: Option<StateId>,
    renum_iter: bool
  ) {
    let p = match p {
      Some(p) if tab.node(p).state.is_none() => p,
      _ => return,
    };

    let node = tab.node(p);
    let (kind, next, sub, down) = (node.kind, node.next.node(), node.sub, node.down);
    let state = match state {
      Some(state) if !(kind == NodeKind::Iter && renum_iter) => state,
      _ => self.new_state(),
    };

    tab.node_mut(p).state = Some(state);
    if tab.del_graph(Some(p)) {
      self.state_mut(state).end_of = self.cur_sy;
    }

    match kind {
      NodeKind::Class { .. } | NodeKind::Char { .. } => {
        self.number_nodes(tab, next, None, false);
      }
      NodeKind::Opt => {
        self.number_nodes(tab, next, None, false);
        self.number_nodes(tab, sub, Some(state), true);
      }
      NodeKind::Iter => {
        self.number_nodes(tab, next, Some(state), true);
        self.number_nodes(tab, sub, Some(state), true);
      }
      NodeKind::Alt => {
        self.number_nodes(tab, next, None, false);
        self.number_nodes(tab, sub, Some(state), true);
        self.number_nodes(tab, down, Some(state), renum_iter);
      }
      _ => {}
    }
  }

  fn step(
    &mut self,
    tab: &mut Tab,
    from: StateId,
    p: Option<NodeId>,
    stepped: &mut BitVec
  ) {
    let p = match p {
      Some(p) => p,
      None => return,
    };
    stepped.set(p.index(), true);

    let node = tab.node(p);
    let (kind, next, sub, down) = (node.kind, node.next.node(), node.sub, node.down);
    let (line, state) = (node.line, node.state);

    match kind {
      NodeKind::Class { class, code } => {
        let to = self.the_state(tab, next);
        self.new_transition(tab, from, to, ActionSym::Class(class), code);
      }
      NodeKind::Char { ch, code } => {
        let to = self.the_state(tab, next);
        self.new_transition(tab, from, to, ActionSym::Char(ch), code);
      }
      NodeKind::Alt => {
        self.step(tab, from, sub, stepped);
        self.step(tab, from, down, stepped);
      }
      NodeKind::Iter | NodeKind::Opt => {
        if tab.del_sub_graph(sub) {
          let msg = if kind == NodeKind::Iter {
            "contents of {...} must not be deletable"
          } else {
            "contents of [...] must not be deletable"
          };
          tab.diags.error_on(line, msg);
          return;
        }

        if let Some(next) = next {
          if !stepped[next.index()] {
            self.step(tab, from, Some(next), stepped);
          }
        }
        self.step(tab, from, sub, stepped);

        if kind == NodeKind::Iter {
          if let Some(state) = state {
            if state != from {
              let mut stepped = bitvec![0; tab.nodes.len()];
              self.step(tab, state, Some(p), &mut stepped);
            }
          }
        }
      }
      _ => {}
    }
  }

  fn find_trans(
    &mut self,
    tab: &mut Tab,
    p: Option<NodeId>,
    start: bool,
    marked: &mut BitVec
  ) {
    let p = match p {
      Some(p) if !marked[p.index()] => p,
      _ => return,
    };
    marked.set(p.index(), true);

    let node = tab.node(p);
    let (kind, next, sub, down) = (node.kind, node.next.node(), node.sub, node.down);
    let state = node.state;

    // start of a group of equally numbered nodes
    if start {
      if let Some(state) = state {
        let mut stepped = bitvec![0; tab.nodes.len()];
        self.step(tab, state, Some(p), &mut stepped);
      }
    }

    match kind {
      NodeKind::Class { .. } | NodeKind::Char { .. } => {
        self.find_trans(tab, next, true, marked);
      }
      NodeKind::Opt => {
        self.find_trans(tab, next, true, marked);
        self.find_trans(tab, sub, false, marked);
      }
      NodeKind::Iter => {
        self.find_trans(tab, next, false, marked);
        self.find_trans(tab, sub, false, marked);
      }
      NodeKind::Alt => {
        self.find_trans(tab, sub, false, marked);
        self.find_trans(tab, down, false, marked);
      }
      _ => {}
    }
  }

  /// Adds the token structure `p` of `sym` to the automaton.
  pub fn convert_to_states(&mut self, tab: &mut Tab, p: NodeId, sym: SymbolId) {
    self.cur_sy = Some(sym);
    if tab.del_graph(Some(p)) {
      let line = tab.sym(sym).line;
      tab.diags.error_on(line, "token might be empty");
      return;
    }

    let start = self.start();
    self.number_nodes(tab, Some(p), Some(start), true);
    let mut marked = bitvec![0; tab.nodes.len()];
    self.find_trans(tab, Some(p), true, &mut marked);

    if tab.node(p).kind == NodeKind::Iter {
      let mut stepped = bitvec![0; tab.nodes.len()];
      self.step(tab, start, Some(p), &mut stepped);
    }
  }

  /// Matches the quoted literal against the automaton built so far. The
  /// literal either gets a path of its own (a fixed token) or shares the
  /// final state of a class token, which then has to consult the literal
  /// table.
  pub fn match_literal(&mut self, tab: &mut Tab, quoted: &str, sym: SymbolId) {
    let s = escape::unescape_quoted(quoted, &mut tab.diags);
    let line = tab.sym(sym).line;
    if s.is_empty() {
      tab.diags.error_on(line, "empty token not allowed");
      return;
    }
    if tab.literals.insert_no_overwrite(s.clone(), sym).is_err() {
      tab.diags.error_on(line, "token string declared twice");
      return;
    }

    let chars = s.chars().map(|c| c as u32).collect::<Vec<_>>();
    let mut state = self.start();
    let mut last_code = None;
    let mut i = 0;

    while i < chars.len() {
      match self.find_action(tab, state, chars[i]) {
        Some(action) => match action.targets.iter().next() {
          Some(&target) => {
            last_code = Some(action.code);
            state = target;
            i += 1;
          }
          None => break,
        },
        None => break,
      }
    }

    // not totally consumed, or ends in a non-final state: build a new path
    if i != chars.len() || self.state(state).end_of.is_none() {
      state = self.start();
      last_code = None;
      i = 0;
    }

    self.cur_sy = Some(sym);
    for &ch in &chars[i..] {
      let to = self.new_state();
      self.new_transition(tab, state, to, ActionSym::Char(ch), TransCode::Normal);
      state = to;
    }

    match self.state(state).end_of {
      None => self.state_mut(state).end_of = Some(sym),
      Some(matched) => {
        if tab.sym(matched).token_kind == TokenKind::Fixed
          || last_code == Some(TransCode::Context)
        {
          // a fixed token, or one whose appendix will be cut off
          let msg = format!(
            "tokens {} and {} cannot be distinguished",
            tab.sym(sym).name,
            tab.sym(matched).name);
          tab.diags.error_on(line, msg);
        } else {
          tab.sym_mut(matched).token_kind = TokenKind::ClassLiteral;
          tab.sym_mut(sym).token_kind = TokenKind::Literal;
        }
      }
    }
  }

  fn comment_str(&mut self, tab: &mut Tab, mut p: Option<NodeId>, line: u32) -> String {
    let mut s = String::new();

    while let Some(id) = p {
      match tab.node(id).kind {
        NodeKind::Char { ch, .. } => {
          s.extend(std::char::from_u32(ch));
        }
        NodeKind::Class { class, .. } => {
          let set = tab.char_class_set(class);
          let first = set.first();
          if set.elements() != 1 {
            tab.diags.error_on(line, "character set contains more than 1 character");
          }
          s.extend(first.and_then(std::char::from_u32));
        }
        _ => tab.diags.error_on(line, "comment delimiters may not be structured"),
      }
      p = tab.node(id).next.node();
    }

    let len = s.chars().count();
    if len == 0 || len > 2 {
      tab.diags.error_on(line, "comment delimiters must be 1 or 2 characters long");
      s = "?".to_owned();
    }
    s
  }

  /// Registers a comment from the delimiter chains `from` and `to`.
  pub fn new_comment(&mut self, tab: &mut Tab, from: NodeId, to: NodeId, nested: bool) {
    let line = tab.node(from).line;
    let start = self.comment_str(tab, Some(from), line);
    let stop = self.comment_str(tab, Some(to), line);
    self.comments.push(Comment { start, stop, nested });
  }
}
