use bitvec::prelude::*;
use crate::tab::Tab;
use super::automaton::Automaton;
use super::{ActionSym, StateId};

impl Automaton {
  fn find_used_states(&self, used: &mut BitVec) {
    let mut stack = vec![self.start()];
    while let Some(state) = stack.pop() {
      if used[state.index()] {
        continue;
      }
      used.set(state.index(), true);
      stack.extend(self.state(state).actions.iter().map(|a| a.target));
    }
  }

  /// Drops unreachable states and merges final states without actions that
  /// recognize the same token, then renumbers the rest densely.
  pub(super) fn delete_redundant_states(&mut self) {
    let len = self.states.len();
    let mut used = bitvec![0; len];
    self.find_used_states(&mut used);

    let mut replaced_by = (0..len).collect::<Vec<_>>();
    // the start state cannot be final
    for s1 in 1..len {
      let state = &self.states[s1];
      if !used[s1] || state.end_of.is_none() || !state.actions.is_empty() || state.ctx {
        continue;
      }
      for s2 in s1 + 1..len {
        let other = &self.states[s2];
        if used[s2] && other.end_of == state.end_of && other.actions.is_empty() && !other.ctx {
          used.set(s2, false);
          replaced_by[s2] = s1;
        }
      }
    }

    let mut renumbered = vec![0u32; len];
    let mut n = 0;
    for (i, new) in renumbered.iter_mut().enumerate() {
      if used[i] {
        *new = n;
        n += 1;
      }
    }

    let states = std::mem::replace(&mut self.states, vec![]);
    self.states = states
      .into_iter()
      .enumerate()
      .filter(|(i, _)| used[*i])
      .map(|(_, mut state)| {
        state.n = StateId(renumbered[state.n.index()]);
        for action in &mut state.actions {
          let target = replaced_by[action.target.index()];
          action.target = StateId(renumbered[target]);
        }
        state
      })
      .collect();
  }

  /// Merges actions of a state that lead to the same target in the same way.
  pub(super) fn combine_shifts(&mut self, tab: &mut Tab) {
    for state in &mut self.states {
      let mut i = 0;
      while i < state.actions.len() {
        let mut j = i + 1;
        while j < state.actions.len() {
          let (a, b) = (&state.actions[i], &state.actions[j]);
          if a.target == b.target && a.code == b.code {
            let mut set = a.sym.symbols(tab);
            set.or(&b.sym.symbols(tab));
            state.actions[i].sym = ActionSym::shift_with(tab, &set);
            state.actions.remove(j);
          } else {
            j += 1;
          }
        }
        i += 1;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::charset::CharSet;
  use crate::graph::TransCode;
  use crate::lexer::dfa::{Dfa, NfaAction};
  use crate::symbol::SymbolKind;
  use pretty_assertions::assert_eq;

  fn transition(dfa: &mut Dfa, from: u32, ch: char, to: u32) {
    dfa.state_mut(StateId(from)).add_action(
      NfaAction::new(ActionSym::Char(ch as u32), TransCode::Normal, StateId(to)));
  }

  #[test]
  fn merges_final_states() {
    let mut tab = Tab::new();
    let a = tab.new_sym(SymbolKind::Terminal, "a", 1);
    let mut dfa = Dfa::new();
    // 0 -x-> 1, 0 -y-> 2, 3 unreachable; 1 and 2 recognize a
    let (s1, s2, _s3) = (dfa.new_state(), dfa.new_state(), dfa.new_state());
    dfa.state_mut(s1).end_of = Some(a);
    dfa.state_mut(s2).end_of = Some(a);
    transition(&mut dfa, 0, 'x', 1);
    transition(&mut dfa, 0, 'y', 2);

    let automaton = dfa.make_deterministic(&mut tab);
    assert_eq!(automaton.states.len(), 2);

    let start = automaton.state(automaton.start());
    assert_eq!(start.actions.len(), 1);
    assert_eq!(start.actions[0].target, StateId(1));
    assert_eq!(
      automaton.class_set(start.actions[0].sym),
      CharSet::from_range('x' as u32, 'y' as u32));
    assert_eq!(automaton.state(StateId(1)).end_of, Some(a));
  }

  #[test]
  fn keeps_context_states() {
    let mut tab = Tab::new();
    let a = tab.new_sym(SymbolKind::Terminal, "a", 1);
    let mut dfa = Dfa::new();
    let (s1, s2) = (dfa.new_state(), dfa.new_state());
    dfa.state_mut(s1).end_of = Some(a);
    dfa.state_mut(s2).end_of = Some(a);
    transition(&mut dfa, 0, 'x', 1);
    dfa.state_mut(StateId(0)).add_action(
      NfaAction::new(ActionSym::Char('y' as u32), TransCode::Context, s2));

    let automaton = dfa.make_deterministic(&mut tab);
    assert_eq!(automaton.states.len(), 3);
    assert!(automaton.state(StateId(2)).ctx);
    assert!(automaton.state(StateId(2)).is_ctx_end());
  }
}
