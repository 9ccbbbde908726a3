//! Generator driver: runs the analysis of a grammar read into a [`Tab`] and
//! builds its scanner automaton.

use std::fmt;
use grammar::lexer::{dump, Automaton, Dfa};
use grammar::Tab;
use ll::report::{AnySyncSets, CrossRef, Nodes, Sets, Symbols};
use ll::CondSets;

pub mod report;

/// Which trace listings to produce.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub struct TraceFlags {
  /// `A`: automaton states and character classes
  pub automaton: bool,
  /// `F`: First and Follow sets
  pub first_follow: bool,
  /// `G`: syntax graph
  pub graph: bool,
  /// `J`: ANY and SYNC sets
  pub any_sync: bool,
  /// `S`: symbol table
  pub symbols: bool,
  /// `X`: cross reference
  pub xref: bool,
}

impl TraceFlags {
  /// Reads switches like `"AFS"`. The digits `0 1 2 4 6 7` stand for
  /// `A F G J S X`; anything else is ignored.
  pub fn parse(s: &str) -> Self {
    let mut flags = Self::default();
    for c in s.chars() {
      match c.to_ascii_uppercase() {
        'A' | '0' => flags.automaton = true,
        'F' | '1' => flags.first_follow = true,
        'G' | '2' => flags.graph = true,
        'J' | '4' => flags.any_sync = true,
        'S' | '6' => flags.symbols = true,
        'X' | '7' => flags.xref = true,
        _ => {}
      }
    }
    flags
  }
}

#[derive(Clone, Copy, Debug)]
pub struct Options {
  pub trace: TraceFlags,
  /// build the scanner automaton
  pub gen_scanner: bool,
  /// the parser checks that the input ends after the start symbol
  pub check_eof: bool,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      trace: TraceFlags::default(),
      gen_scanner: true,
      check_eof: true,
    }
  }
}

/// Everything a scanner and parser emitter needs.
#[derive(Debug)]
pub struct Generated {
  pub automaton: Option<Automaton>,
  pub cond_sets: CondSets,
  pub warnings: usize,
  /// requested listings, in the order they were produced
  pub trace: Vec<String>,
  pub check_eof: bool,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Error {
  /// the grammar reader already reported this many errors
  Reader(usize),
  /// a production is missing, circular or cannot be derived to terminals
  GrammarNotOk,
  /// errors found while building the automaton
  Scanner(usize),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Error::Reader(n) => write!(f, "{} errors detected", n),
      Error::GrammarNotOk => write!(f, "grammar is not ok"),
      Error::Scanner(n) => write!(f, "{} errors detected in the scanner", n),
    }
  }
}

impl std::error::Error for Error {}

/// Analyses the grammar in `tab` and determinizes `dfa`, which holds the
/// token structures and comments added by the grammar reader.
///
/// Problems are reported to `tab.diags`; the returned error only says at
/// which stage generation stopped.
pub fn generate(tab: &mut Tab, dfa: Dfa, options: &Options) -> Result<Generated, Error> {
  if tab.diags.has_errors() {
    return Err(Error::Reader(tab.diags.errors()));
  }

  tab.new_no_sym();
  tab.setup_anys();
  tab.renumber_pragmas();

  ll::comp_symbol_sets(tab);
  let flags = options.trace;
  let mut trace = vec![];
  if flags.first_follow {
    trace.push(Sets(tab).to_string());
  }
  if flags.any_sync {
    trace.push(AnySyncSets(tab).to_string());
  }
  if flags.symbols {
    trace.push(Symbols(tab).to_string());
  }
  if flags.xref {
    trace.push(CrossRef(tab).to_string());
  }
  if flags.graph {
    trace.push(Nodes(tab).to_string());
  }

  if !ll::grammar_ok(tab) {
    return Err(Error::GrammarNotOk);
  }

  let automaton = if options.gen_scanner {
    let automaton = dfa.make_deterministic(tab);
    if tab.diags.has_errors() {
      return Err(Error::Scanner(tab.diags.errors()));
    }
    if flags.automaton {
      trace.push(format!("{}\n{}", dump::States::new(&automaton, tab), dump::CharClasses(tab)));
    }
    Some(automaton)
  } else {
    None
  };

  Ok(Generated {
    automaton,
    cond_sets: CondSets::new(tab),
    warnings: tab.diags.warnings(),
    trace,
    check_eof: options.check_eof,
  })
}
