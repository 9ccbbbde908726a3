//! Scanner automaton: built as an NFA from token graphs, then made
//! deterministic and minimized.

use crate::charset::CharSet;
use crate::tab::{ClassId, Tab};

pub use automaton::{Action, Automaton, State};
pub use dfa::{Comment, Dfa, NfaAction, NfaState};
pub use tokens::{Error, Token, Tokens};

mod dfa;
mod build;
mod powerset_cons;
mod minimize;
pub mod automaton;
pub mod dump;
pub mod tokens;

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct StateId(pub(crate) u32);

impl StateId {
  pub fn id(&self) -> u32 {
    self.0
  }

  pub(crate) fn index(&self) -> usize {
    self.0 as usize
  }
}

/// What an action is triggered by.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub enum ActionSym {
  Class(ClassId),
  Char(u32),
}

impl ActionSym {
  pub fn is_class(&self) -> bool {
    matches!(self, ActionSym::Class(_))
  }

  /// The characters this symbol stands for.
  pub fn symbols(&self, tab: &Tab) -> CharSet {
    match *self {
      ActionSym::Class(class) => tab.char_class_set(class).clone(),
      ActionSym::Char(ch) => CharSet::from_range(ch, ch),
    }
  }

  /// The symbol for `set`: a single character, or a character class that is
  /// created on demand.
  pub(crate) fn shift_with(tab: &mut Tab, set: &CharSet) -> Self {
    match set.first() {
      Some(ch) if set.elements() == 1 => ActionSym::Char(ch),
      _ => {
        let class = match tab.find_char_class_by_set(set) {
          Some(class) => class,
          None => tab.new_char_class("#", set.clone()),
        };
        ActionSym::Class(class)
      }
    }
  }

  pub(crate) fn overlaps(&self, other: &ActionSym, tab: &Tab) -> bool {
    match (*self, *other) {
      (ActionSym::Char(a), ActionSym::Char(b)) => a == b,
      (ActionSym::Char(ch), ActionSym::Class(class))
      | (ActionSym::Class(class), ActionSym::Char(ch)) => {
        tab.char_class_set(class).get(ch)
      }
      (ActionSym::Class(a), ActionSym::Class(b)) => {
        tab.char_class_set(a).intersects(tab.char_class_set(b))
      }
    }
  }
}
