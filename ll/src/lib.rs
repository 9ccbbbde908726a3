//! LL(1) analysis of a syntax graph: symbol sets, grammar checks and the
//! helpers a parser emitter needs.

use grammar::Tab;

pub mod first;
pub mod follow;
pub mod anys;
pub mod check;
pub mod ll1;
pub mod tables;
pub mod report;

#[cfg(test)]
mod testing;

pub use tables::{Cond, CondSets, MAX_TERM};

/// Computes deletability, First, Any, Follow and Sync sets, in this order.
pub fn comp_symbol_sets(tab: &mut Tab) {
  first::comp_deletable_symbols(tab);
  first::comp_first_sets(tab);
  anys::comp_any_sets(tab);
  follow::comp_follow_sets(tab);
  anys::comp_sync_sets(tab);
}

/// Runs all grammar checks. Only completeness, circularity and termination
/// decide the verdict; the LL(1) and resolver checks run on a sound grammar
/// and only warn.
pub fn grammar_ok(tab: &mut Tab) -> bool {
  let complete = check::nts_complete(tab);
  check::all_nt_reached(tab);
  let noncircular = check::no_circular_productions(tab);
  let terminating = check::all_nt_to_term(tab);

  let ok = complete && noncircular && terminating;
  if ok {
    ll1::check_resolvers(tab);
    ll1::check_ll1(tab);
  }
  ok
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::Builder;
  use pretty_assertions::assert_eq;

  #[test]
  fn gating_checks_do_not_short_circuit() {
    // S = A. A = A. B = "b".
    let mut b = Builder::new();
    let a = b.nt("A");
    b.prod("S", a);
    let a = b.nt("A");
    b.prod("A", a);
    b.nt("C");
    let t = b.t("b");
    b.prod("B", t);
    let mut tab = b.finish();

    comp_symbol_sets(&mut tab);
    assert!(!grammar_ok(&mut tab));
    // nonterminals are declared in the order A, S, C, B
    assert_eq!(tab.diags.messages(), vec![
      "error: No production for C",
      "warning: C cannot be reached",
      "warning: B cannot be reached",
      "error: A --> A",
      "error: A cannot be derived to terminals",
      "error: S cannot be derived to terminals",
    ]);
  }

  #[test]
  fn sound_grammar_is_checked_for_conflicts() {
    // S = "a" "b" | "a" "c".
    let mut b = Builder::new();
    let (a, t) = (b.t("a"), b.t("b"));
    let ab = b.seq(vec![a, t]);
    let (a, t) = (b.t("a"), b.t("c"));
    let ac = b.seq(vec![a, t]);
    let alt = b.alt(vec![ab, ac]);
    b.prod("S", alt);
    let mut tab = b.finish();

    comp_symbol_sets(&mut tab);
    assert!(grammar_ok(&mut tab));
    assert_eq!(tab.diags.messages(), vec![
      "warning: LL1 warning in S: a is start of several alternatives",
    ]);
  }
}
