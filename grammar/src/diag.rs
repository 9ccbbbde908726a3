use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// Location of a piece of grammar source text.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
pub struct Position {
  /// byte offsets
  pub beg: usize,
  pub end: usize,
  pub line: u32,
  pub col: u32,
}

impl Position {
  pub fn new(beg: usize, end: usize, line: u32, col: u32) -> Self {
    Self { beg, end, line, col }
  }
}

/// Accumulated errors and warnings of one generator run.
///
/// Checks append to the sink and keep going, so a single run reports as
/// many problems as possible.
#[derive(Default, Debug)]
pub struct Diagnostics {
  items: Vec<Diagnostic<()>>,
}

impl Diagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn error(&mut self, message: impl Into<String>) {
    self.items.push(Diagnostic::error().with_message(message));
  }

  pub fn warning(&mut self, message: impl Into<String>) {
    self.items.push(Diagnostic::warning().with_message(message));
  }

  pub fn error_at(&mut self, pos: Position, message: impl Into<String>) {
    self.push_at(Diagnostic::error(), pos, message);
  }

  pub fn warning_at(&mut self, pos: Position, message: impl Into<String>) {
    self.push_at(Diagnostic::warning(), pos, message);
  }

  /// Reports an error for a grammar line; line 0 means unknown.
  pub fn error_on(&mut self, line: u32, message: impl Into<String>) {
    self.push_on(Diagnostic::error(), line, message);
  }

  pub fn warning_on(&mut self, line: u32, message: impl Into<String>) {
    self.push_on(Diagnostic::warning(), line, message);
  }

  fn push_at(
    &mut self,
    diagnostic: Diagnostic<()>,
    pos: Position,
    message: impl Into<String>,
  ) {
    self.items.push(diagnostic
      .with_message(message)
      .with_labels(vec![Label::primary((), pos.beg..pos.end)])
      .with_notes(vec![format!("at {}:{}", pos.line, pos.col)]));
  }

  fn push_on(
    &mut self,
    diagnostic: Diagnostic<()>,
    line: u32,
    message: impl Into<String>,
  ) {
    let diagnostic = diagnostic.with_message(message);
    self.items.push(if line == 0 {
      diagnostic
    } else {
      diagnostic.with_notes(vec![format!("at line {}", line)])
    });
  }

  pub fn errors(&self) -> usize {
    self.count(Severity::Error)
  }

  pub fn warnings(&self) -> usize {
    self.count(Severity::Warning)
  }

  pub fn has_errors(&self) -> bool {
    self.errors() != 0
  }

  fn count(&self, severity: Severity) -> usize {
    self.items.iter().filter(|d| d.severity == severity).count()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Diagnostic<()>> {
    self.items.iter()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// `error: ...` / `warning: ...` lines, in reporting order.
  pub fn messages(&self) -> Vec<String> {
    self.items.iter().map(|d| {
      let kind = match d.severity {
        Severity::Bug | Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Note => "note",
        Severity::Help => "help",
      };
      format!("{}: {}", kind, d.message)
    }).collect()
  }
}
