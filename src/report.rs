//! Renders the diagnostics of a run against the grammar source.

use std::io;
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::{self, termcolor::NoColor, Config};
use grammar::Diagnostics;

/// Plain text rendering of all diagnostics, followed by the error count.
/// Positions of the diagnostics must lie inside `source`.
pub fn report(name: &str, source: &str, diags: &Diagnostics) -> io::Result<String> {
  let file = SimpleFile::new(name, source);
  let config = Config::default();
  let mut writer = NoColor::new(vec![]);

  for diagnostic in diags.iter() {
    term::emit(&mut writer, &config, &file, diagnostic)?;
  }

  let mut buf = String::from_utf8_lossy(&writer.into_inner()).into_owned();
  buf += &format!("{} errors detected\n", diags.errors());
  Ok(buf)
}
