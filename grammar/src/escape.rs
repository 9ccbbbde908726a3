use crate::diag::Diagnostics;
use std::fmt::Write;

/// Replaces escape sequences by the characters they stand for.
pub fn unescape(s: &str, diags: &mut Diagnostics) -> String {
  let mut buf = String::with_capacity(s.len());
  let mut chars = s.chars();

  while let Some(c) = chars.next() {
    if c != '\\' {
      buf.push(c);
      continue;
    }

    match chars.next() {
      Some('\\') => buf.push('\\'),
      Some('\'') => buf.push('\''),
      Some('"') => buf.push('"'),
      Some('r') => buf.push('\r'),
      Some('n') => buf.push('\n'),
      Some('t') => buf.push('\t'),
      Some('0') => buf.push('\0'),
      Some('a') => buf.push('\u{7}'),
      Some('b') => buf.push('\u{8}'),
      Some('f') => buf.push('\u{c}'),
      Some('v') => buf.push('\u{b}'),
      Some('u') | Some('x') => {
        let digits = chars.by_ref().take(4).collect::<String>();
        if digits.chars().count() < 4 {
          diags.error("bad escape sequence in string or character");
          break;
        }
        match u32::from_str_radix(&digits, 16).ok().and_then(std::char::from_u32) {
          Some(c) => buf.push(c),
          None => diags.error("bad character value"),
        }
      }
      _ => diags.error("bad escape sequence in string or character"),
    }
  }

  buf
}

/// Unescapes the text between the quotes of a string or character literal.
pub fn unescape_quoted(s: &str, diags: &mut Diagnostics) -> String {
  let mut chars = s.chars();
  chars.next();
  chars.next_back();
  unescape(chars.as_str(), diags)
}

/// Inverse of [`unescape`], used in listings.
pub fn escape(s: &str) -> String {
  let mut buf = String::with_capacity(s.len());

  for c in s.chars() {
    match c {
      '\\' => buf.push_str("\\\\"),
      '\'' => buf.push_str("\\'"),
      '"' => buf.push_str("\\\""),
      '\t' => buf.push_str("\\t"),
      '\r' => buf.push_str("\\r"),
      '\n' => buf.push_str("\\n"),
      c if c < ' ' || c > '\u{7f}' => {
        let _ = write!(buf, "\\u{:04x}", c as u32);
      }
      c => buf.push(c),
    }
  }

  buf
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn escapes() {
    let mut diags = Diagnostics::new();
    assert_eq!(unescape(r"a\tb\\cA\x00e9", &mut diags), "a\tb\\cA\u{e9}");
    assert_eq!(unescape_quoted(r#""\"if\"""#, &mut diags), "\"if\"");
    assert!(diags.is_empty());

    assert_eq!(escape("a\tb\"\u{e9}"), "a\\tb\\\"\\u00e9");
  }

  #[test]
  fn bad_escapes() {
    let mut diags = Diagnostics::new();
    assert_eq!(unescape(r"a\qb", &mut diags), "ab");
    assert_eq!(unescape(r"\u12", &mut diags), "");
    assert_eq!(unescape(r"\ud800", &mut diags), "");
    assert_eq!(diags.messages(), vec![
      "error: bad escape sequence in string or character",
      "error: bad escape sequence in string or character",
      "error: bad character value",
    ]);
  }
}
