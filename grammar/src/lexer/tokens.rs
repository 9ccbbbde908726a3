use crate::graph::TransCode;
use crate::symbol::SymbolId;
use super::automaton::Automaton;
use super::dfa::Comment;

/// Runs an [`Automaton`] over a string, the way a generated scanner would.
pub struct Tokens<'automaton, 'input> {
  automaton: &'automaton Automaton,
  input: &'input str,
  pos: usize,
}

#[derive(PartialEq, Eq, Debug)]
pub struct Token<'input> {
  pub kind: SymbolId,
  pub text: &'input str,
  pub start: usize,
  pub end: usize,
}

#[derive(PartialEq, Eq, Debug)]
pub struct Error {
  pub char: char,
  pub start: usize,
  pub end: usize,
}

impl<'automaton, 'input> Tokens<'automaton, 'input> {
  pub(super) fn new(automaton: &'automaton Automaton, input: &'input str) -> Self {
    Self {
      automaton,
      input,
      pos: 0,
    }
  }

  fn peek_char(&self) -> Option<char> {
    self.input[self.pos..].chars().next()
  }

  /// Skips a comment starting at the current position. An unterminated
  /// comment is not a comment.
  fn skip_comment(&mut self, comment: &Comment) -> bool {
    let rest = &self.input[self.pos..];
    if !rest.starts_with(comment.start.as_str()) {
      return false;
    }

    let mut pos = self.pos + comment.start.len();
    let mut level = 1;
    while pos < self.input.len() {
      let rest = &self.input[pos..];
      if rest.starts_with(comment.stop.as_str()) {
        pos += comment.stop.len();
        level -= 1;
        if level == 0 {
          self.pos = pos;
          return true;
        }
      } else if comment.nested && rest.starts_with(comment.start.as_str()) {
        pos += comment.start.len();
        level += 1;
      } else {
        pos += rest.chars().next().map_or(1, |c| c.len_utf8());
      }
    }

    false
  }

  fn skip(&mut self) {
    loop {
      match self.peek_char() {
        Some(c) if c == ' ' || self.automaton.ignored.get(c as u32) => {
          self.pos += c.len_utf8();
        }
        Some(_) => {
          let automaton = self.automaton;
          if !automaton.comments.iter().any(|c| self.skip_comment(c)) {
            return;
          }
        }
        None => return,
      }
    }
  }

  fn token(&self, kind: SymbolId, start: usize, end: usize) -> Token<'input> {
    let text = &self.input[start..end];
    let kind = if self.automaton.class_literals.contains(&kind) {
      self.automaton.literals.get(text).copied().unwrap_or(kind)
    } else {
      kind
    };

    Token {
      kind,
      text,
      start,
      end,
    }
  }
}

impl<'automaton, 'input> Iterator for Tokens<'automaton, 'input> {
  type Item = Result<Token<'input>, Error>;

  fn next(&mut self) -> Option<Self::Item> {
    self.skip();
    if self.pos == self.input.len() {
      return None;
    }

    let start = self.pos;
    let mut state = self.automaton.start();
    // last final state passed: (end, token)
    let mut recognized: Option<(usize, SymbolId)> = None;
    // length of the context appendix read so far
    let mut apx = 0;

    loop {
      let current = self.automaton.state(state);
      let action = self.peek_char()
        .and_then(|c| self.automaton.find_action(state, c).map(|a| (c, a)));

      match action {
        Some((c, action)) => {
          if let Some(kind) = current.end_of {
            let end = if current.is_ctx_end() { self.pos - apx } else { self.pos };
            recognized = Some((end, kind));
          }
          if action.code == TransCode::Context {
            apx += c.len_utf8();
          } else if current.ctx {
            apx = 0;
          }
          self.pos += c.len_utf8();
          state = action.target;
        }
        None => {
          if let Some(kind) = current.end_of {
            if current.is_ctx_end() {
              self.pos -= apx;
            }
            return Some(Ok(self.token(kind, start, self.pos)));
          }

          return match recognized {
            Some((end, kind)) => {
              self.pos = end;
              Some(Ok(self.token(kind, start, end)))
            }
            None => {
              self.pos = start;
              let char = self.peek_char()?;
              self.pos += char.len_utf8();
              Some(Err(Error {
                char,
                start,
                end: self.pos,
              }))
            }
          };
        }
      }
    }
  }
}
