use crate::charset::CharSet;
use crate::graph::TransCode;
use crate::symbol::{SymbolId, TokenKind};
use crate::tab::Tab;
use crate::{Map, Set};
use super::dfa::{Comment, Dfa};
use super::tokens::Tokens;
use super::{ActionSym, StateId};

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Action {
  pub sym: ActionSym,
  pub code: TransCode,
  pub target: StateId,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct State {
  pub n: StateId,
  pub actions: Vec<Action>,
  pub end_of: Option<SymbolId>,
  pub ctx: bool,
}

impl State {
  /// A state reached by a context transition with no further context
  /// transitions: the context appendix is cut off here.
  pub fn is_ctx_end(&self) -> bool {
    self.ctx && self.actions.iter().all(|a| a.code != TransCode::Context)
  }
}

/// The deterministic scanner automaton. Every action has a single target,
/// and the character sets of the actions of a state are disjoint.
#[derive(Debug, Clone)]
pub struct Automaton {
  /// state 0 is the start state
  pub states: Vec<State>,
  /// character classes by `ClassId`
  pub classes: Vec<CharSet>,
  pub comments: Vec<Comment>,
  pub ignored: CharSet,
  /// literal text of literal tokens
  pub literals: Map<String, SymbolId>,
  /// tokens that have to be looked up in `literals`
  pub class_literals: Set<SymbolId>,
  pub has_ctx_moves: bool,
}

impl Automaton {
  pub(super) fn from_dfa(dfa: Dfa) -> Self {
    let states = dfa.states
      .into_iter()
      .enumerate()
      .map(|(i, state)| {
        let mut actions = state.actions
          .into_iter()
          .filter_map(|a| a.targets.iter().next().map(|&target| Action {
            sym: a.sym,
            code: a.code,
            target,
          }))
          .collect::<Vec<_>>();
        actions.sort_by_key(|a| !a.sym.is_class());

        State {
          n: StateId(i as u32),
          actions,
          end_of: state.end_of,
          ctx: state.ctx,
        }
      })
      .collect();

    Self {
      states,
      classes: vec![],
      comments: dfa.comments,
      ignored: CharSet::new(),
      literals: Map::default(),
      class_literals: Set::default(),
      has_ctx_moves: dfa.has_ctx_moves,
    }
  }

  /// Takes what scanning needs from the symbol table.
  pub(super) fn finish(&mut self, tab: &Tab) {
    self.classes = tab.classes.iter().map(|c| c.set.clone()).collect();
    self.ignored = tab.ignored.clone();

    for (text, &sym) in tab.literals.iter() {
      if tab.sym(sym).token_kind == TokenKind::Literal {
        self.literals.insert(text.clone(), sym);
      }
    }
    for &sym in &tab.terminals {
      if tab.sym(sym).token_kind == TokenKind::ClassLiteral {
        self.class_literals.insert(sym);
      }
    }
  }

  pub fn start(&self) -> StateId {
    StateId(0)
  }

  pub fn state(&self, state: StateId) -> &State {
    &self.states[state.index()]
  }

  pub fn class_set(&self, sym: ActionSym) -> CharSet {
    match sym {
      ActionSym::Class(class) => self.classes[class.0 as usize].clone(),
      ActionSym::Char(ch) => CharSet::from_range(ch, ch),
    }
  }

  fn accepts(&self, sym: ActionSym, ch: u32) -> bool {
    match sym {
      ActionSym::Char(c) => c == ch,
      ActionSym::Class(class) => self.classes[class.0 as usize].get(ch),
    }
  }

  pub fn find_action(&self, state: StateId, ch: char) -> Option<&Action> {
    self.state(state).actions.iter().find(|a| self.accepts(a.sym, ch as u32))
  }

  pub fn lex<'automaton, 'input>(
    &'automaton self,
    input: &'input str
  ) -> Tokens<'automaton, 'input> {
    Tokens::new(self, input)
  }
}
