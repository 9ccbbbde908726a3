use std::collections::BTreeSet;
use bit_set::BitSet;
use crate::graph::TransCode;
use crate::symbol::SymbolId;
use crate::tab::Tab;
use crate::BiMap;
use super::{ActionSym, StateId};

/// Action of the automaton under construction; it may lead to several
/// states until the automaton is made deterministic.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct NfaAction {
  pub sym: ActionSym,
  pub code: TransCode,
  pub targets: BTreeSet<StateId>,
}

#[derive(Default, Clone, Debug)]
pub struct NfaState {
  /// character classes come first
  pub actions: Vec<NfaAction>,
  /// token recognized in this state
  pub end_of: Option<SymbolId>,
  /// reached by a context transition
  pub ctx: bool,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Comment {
  pub start: String,
  pub stop: String,
  pub nested: bool,
}

/// Builder of the scanner automaton.
///
/// Tokens are added one at a time with [`Dfa::convert_to_states`] and
/// [`Dfa::match_literal`]; [`Dfa::make_deterministic`] finishes the
/// automaton.
#[derive(Debug)]
pub struct Dfa {
  pub(super) states: Vec<NfaState>,
  /// sets of original states represented by melted states
  pub(super) melted: BiMap<BitSet, StateId>,
  /// last state that is not the result of melting
  pub(super) last_sim_state: usize,
  /// token being added
  pub(super) cur_sy: Option<SymbolId>,
  pub comments: Vec<Comment>,
  pub has_ctx_moves: bool,
}

impl Default for Dfa {
  fn default() -> Self {
    Self::new()
  }
}

impl NfaAction {
  pub fn new(sym: ActionSym, code: TransCode, target: StateId) -> Self {
    let mut targets = BTreeSet::new();
    targets.insert(target);
    Self { sym, code, targets }
  }

  pub fn add_targets(&mut self, other: &NfaAction) {
    self.targets.extend(other.targets.iter().copied());
    if other.code == TransCode::Context {
      self.code = TransCode::Context;
    }
  }
}

impl NfaState {
  pub fn add_action(&mut self, action: NfaAction) {
    let pos = if action.sym.is_class() {
      self.actions.iter().position(|a| !a.sym.is_class()).unwrap_or(self.actions.len())
    } else {
      self.actions.len()
    };
    self.actions.insert(pos, action);
  }
}

impl Dfa {
  pub fn new() -> Self {
    Self {
      states: vec![NfaState::default()],
      melted: BiMap::new(),
      last_sim_state: 0,
      cur_sy: None,
      comments: vec![],
      has_ctx_moves: false,
    }
  }

  pub fn start(&self) -> StateId {
    StateId(0)
  }

  pub fn state(&self, state: StateId) -> &NfaState {
    &self.states[state.index()]
  }

  pub(super) fn state_mut(&mut self, state: StateId) -> &mut NfaState {
    &mut self.states[state.index()]
  }

  pub fn states(&self) -> &[NfaState] {
    &self.states
  }

  pub(super) fn new_state(&mut self) -> StateId {
    self.states.push(NfaState::default());
    StateId(self.states.len() as u32 - 1)
  }

  /// The first action of `state` that accepts `ch`.
  pub fn find_action(
    &self,
    tab: &Tab,
    state: StateId,
    ch: u32
  ) -> Option<&NfaAction> {
    self.state(state).actions.iter().find(|a| match a.sym {
      ActionSym::Char(c) => c == ch,
      ActionSym::Class(class) => tab.char_class_set(class).get(ch),
    })
  }
}
