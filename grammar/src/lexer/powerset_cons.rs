//! Subset construction over character ranges: actions with overlapping
//! character sets are split, and actions leading to several states are
//! redirected to melted states.

use std::collections::BTreeSet;
use bit_set::BitSet;
use crate::graph::TransCode;
use crate::symbol::SymbolId;
use crate::tab::Tab;
use super::automaton::Automaton;
use super::dfa::{Dfa, NfaAction};
use super::{ActionSym, StateId};

impl Dfa {
  /// Replaces the overlapping actions `i < j` of `state` by actions with
  /// disjoint character sets.
  fn split_actions(&mut self, tab: &mut Tab, state: StateId, i: usize, j: usize) {
    let seta = self.state(state).actions[i].sym.symbols(tab);
    let setb = self.state(state).actions[j].sym.symbols(tab);

    if seta == setb {
      let b = self.state_mut(state).actions.remove(j);
      self.state_mut(state).actions[i].add_targets(&b);
    } else if seta.includes(&setb) {
      let mut setc = seta.clone();
      setc.subtract(&setb);
      let sym = ActionSym::shift_with(tab, &setc);

      let actions = &mut self.state_mut(state).actions;
      let a = actions[i].clone();
      actions[j].add_targets(&a);
      actions[i].sym = sym;
    } else if setb.includes(&seta) {
      let mut setc = setb.clone();
      setc.subtract(&seta);
      let sym = ActionSym::shift_with(tab, &setc);

      let actions = &mut self.state_mut(state).actions;
      let b = actions[j].clone();
      actions[i].add_targets(&b);
      actions[j].sym = sym;
    } else {
      let mut setc = seta.clone();
      setc.and(&setb);
      let mut seta = seta;
      let mut setb = setb;
      seta.subtract(&setc);
      setb.subtract(&setc);

      let syma = ActionSym::shift_with(tab, &seta);
      let symb = ActionSym::shift_with(tab, &setb);
      let symc = ActionSym::shift_with(tab, &setc);

      let actions = &mut self.state_mut(state).actions;
      let mut c = NfaAction {
        sym: symc,
        code: TransCode::Normal,
        targets: Default::default(),
      };
      c.add_targets(&actions[i]);
      c.add_targets(&actions[j]);
      actions[i].sym = syma;
      actions[j].sym = symb;
      self.state_mut(state).add_action(c);
    }
  }

  fn find_overlap(&self, tab: &Tab, state: StateId) -> Option<(usize, usize)> {
    let actions = &self.state(state).actions;
    for i in 0..actions.len() {
      for j in i + 1..actions.len() {
        if actions[i].sym.overlaps(&actions[j].sym, tab) {
          return Some((i, j));
        }
      }
    }
    None
  }

  /// Splits actions until no two actions of `state` share a character.
  pub(super) fn make_unique(&mut self, tab: &mut Tab, state: StateId) {
    while let Some((i, j)) = self.find_overlap(tab, state) {
      self.split_actions(tab, state, i, j);
    }
  }

  /// The original states behind `targets`, the token they recognize and
  /// whether any of them is reached by a context transition.
  fn target_states(
    &self,
    tab: &mut Tab,
    targets: &BTreeSet<StateId>
  ) -> (BitSet, Option<SymbolId>, bool) {
    let mut set = BitSet::with_capacity(2 * self.last_sim_state + 2);
    let mut end_of: Option<SymbolId> = None;
    let mut ctx = false;

    for &t in targets {
      if t.index() <= self.last_sim_state {
        set.insert(t.index());
      } else if let Some(melted) = self.melted.get_by_right(&t) {
        set.union_with(melted);
      }

      let state = self.state(t);
      if let Some(sym) = state.end_of {
        match end_of {
          Some(prev) if prev != sym => {
            let msg = format!(
              "tokens {} and {} cannot be distinguished",
              tab.sym(prev).name,
              tab.sym(sym).name);
            tab.diags.error(msg);
          }
          _ => end_of = Some(sym),
        }
      }
      ctx |= state.ctx;
    }

    (set, end_of, ctx)
  }

  /// Redirects every action of `state` with several targets to the state
  /// melted from those targets.
  fn melt_states(&mut self, tab: &mut Tab, state: StateId) {
    for i in 0..self.state(state).actions.len() {
      let targets = &self.state(state).actions[i].targets;
      if targets.len() < 2 {
        continue;
      }
      let targets = targets.clone();

      let (set, end_of, ctx) = self.target_states(tab, &targets);
      let melt = match self.melted.get_by_left(&set) {
        Some(&melt) => melt,
        None => {
          let melt = self.new_state();
          self.state_mut(melt).end_of = end_of;
          self.state_mut(melt).ctx = ctx;
          for &t in &targets {
            self.melt_with(melt, t);
          }
          self.make_unique(tab, melt);
          self.melted.insert(set, melt);
          melt
        }
      };

      let action = &mut self.state_mut(state).actions[i];
      action.targets.clear();
      action.targets.insert(melt);
    }
  }

  /// Copies the actions of `other` to `state`.
  fn melt_with(&mut self, state: StateId, other: StateId) {
    let actions = self.state(other).actions.clone();
    for action in actions {
      self.state_mut(state).add_action(action);
    }
  }

  fn find_ctx_states(&mut self) {
    let mut ctx = vec![];
    for state in &self.states {
      for action in &state.actions {
        if action.code == TransCode::Context {
          ctx.extend(action.targets.iter().copied());
        }
      }
    }
    for state in ctx {
      self.state_mut(state).ctx = true;
    }
  }

  /// Finishes the automaton: every state gets disjoint actions with a
  /// single target each, then redundant states are removed.
  pub fn make_deterministic(mut self, tab: &mut Tab) -> Automaton {
    self.last_sim_state = self.states.len() - 1;
    self.find_ctx_states();

    for i in 0..self.states.len() {
      self.make_unique(tab, StateId(i as u32));
    }
    // melting appends states, which are melted in turn
    let mut i = 0;
    while i < self.states.len() {
      self.melt_states(tab, StateId(i as u32));
      i += 1;
    }

    let mut automaton = Automaton::from_dfa(self);
    automaton.delete_redundant_states();
    automaton.combine_shifts(tab);
    automaton.finish(tab);
    automaton
  }
}
