//! Human readable listings of the automaton and the character classes.

use std::fmt::{self, Display, Formatter};
use crate::charset::CharSet;
use crate::graph::TransCode;
use crate::tab::Tab;
use super::automaton::Automaton;
use super::ActionSym;

/// A character as it appears in listings: quoted when printable.
struct Ch(u32);

impl Display for Ch {
  fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
    match std::char::from_u32(self.0) {
      Some(c) if c != '\'' && c != '\\' && (' '..='~').contains(&c) => {
        write!(fmt, "'{}'", c)
      }
      _ => write!(fmt, "{}", self.0),
    }
  }
}

fn fmt_set(fmt: &mut Formatter, set: &CharSet) -> fmt::Result {
  for (i, r) in set.ranges().iter().enumerate() {
    if i > 0 {
      write!(fmt, " ")?;
    }
    if r.from < r.to {
      write!(fmt, "{}..{}", Ch(r.from), Ch(r.to))?;
    } else {
      write!(fmt, "{}", Ch(r.from))?;
    }
  }
  Ok(())
}

/// The states of an automaton, one line per action.
pub struct States<'a> {
  automaton: &'a Automaton,
  tab: &'a Tab,
}

impl<'a> States<'a> {
  pub fn new(automaton: &'a Automaton, tab: &'a Tab) -> Self {
    Self { automaton, tab }
  }
}

impl<'a> Display for States<'a> {
  fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
    for state in &self.automaton.states {
      let head = match state.end_of {
        Some(sym) => format!("E({})", self.tab.sym(sym).name),
        None => String::new(),
      };
      write!(fmt, "{:<14}{:>3}:", head, state.n.id())?;

      if state.actions.is_empty() {
        writeln!(fmt)?;
      }
      for (i, action) in state.actions.iter().enumerate() {
        if i > 0 {
          write!(fmt, "{:18}", "")?;
        }
        match action.sym {
          ActionSym::Class(class) => {
            write!(fmt, " {}", self.tab.char_class(class).name)?;
          }
          ActionSym::Char(ch) => write!(fmt, " {}", Ch(ch))?,
        }
        write!(fmt, " {}", action.target.id())?;
        if action.code == TransCode::Context {
          write!(fmt, " context")?;
        }
        writeln!(fmt)?;
      }
    }
    Ok(())
  }
}

/// The character classes of a symbol table.
pub struct CharClasses<'a>(pub &'a Tab);

impl<'a> Display for CharClasses<'a> {
  fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
    for class in &self.0.classes {
      write!(fmt, "{:<10}: ", class.name)?;
      fmt_set(fmt, &class.set)?;
      writeln!(fmt)?;
    }
    Ok(())
  }
}
