//! Sets over a fixed universe of small integers (terminal numbers,
//! nonterminal numbers, automaton states).

pub use bit_set::BitSet;

/// `{0, 1, .., n - 1}`
pub fn full(n: usize) -> BitSet {
  (0..n).collect()
}

pub fn from_bit(n: usize, bit: usize) -> BitSet {
  let mut set = BitSet::with_capacity(n);
  set.insert(bit);
  set
}

/// Number of members.
pub fn elements(s: &BitSet) -> usize {
  s.len()
}

/// `a := a - b`
pub fn subtract(a: &mut BitSet, b: &BitSet) {
  a.difference_with(b);
}

pub fn intersect(a: &BitSet, b: &BitSet) -> bool {
  !a.is_disjoint(b)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn helpers() {
    let mut a = full(5);
    assert_eq!(elements(&a), 5);

    let b = from_bit(5, 3);
    assert!(intersect(&a, &b));
    subtract(&mut a, &b);
    assert_eq!(a.iter().collect::<Vec<_>>(), vec![0, 1, 2, 4]);
    assert!(!intersect(&a, &b));
  }
}
