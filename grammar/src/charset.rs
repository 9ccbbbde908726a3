//! Sets of characters stored as sorted, disjoint ranges.

use std::fmt::{self, Debug, Formatter};

/// Largest character value an interval set can hold.
pub const MAX_CHAR: u32 = char::MAX as u32;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Range {
  pub from: u32,
  pub to: u32,
}

/// Invariant: ranges are sorted and `ranges[i].to + 1 < ranges[i + 1].from`,
/// so two sets are equal iff their range lists are equal.
#[derive(PartialEq, Eq, Hash, Clone, Default)]
pub struct CharSet {
  ranges: Vec<Range>,
}

impl CharSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_range(from: u32, to: u32) -> Self {
    let mut set = Self::new();
    set.set_range(from, to);
    set
  }

  /// The set of all characters.
  pub fn full() -> Self {
    Self::from_range(0, MAX_CHAR)
  }

  pub fn ranges(&self) -> &[Range] {
    &self.ranges
  }

  pub fn is_empty(&self) -> bool {
    self.ranges.is_empty()
  }

  pub fn get(&self, c: u32) -> bool {
    self.ranges
      .binary_search_by(|r| {
        if r.to < c {
          std::cmp::Ordering::Less
        } else if r.from > c {
          std::cmp::Ordering::Greater
        } else {
          std::cmp::Ordering::Equal
        }
      })
      .is_ok()
  }

  pub fn set(&mut self, c: u32) {
    self.set_range(c, c);
  }

  pub fn set_range(&mut self, from: u32, to: u32) {
    if from > to {
      return;
    }

    // first range that could touch [from, to]
    let start = self.ranges
      .iter()
      .position(|r| r.to.saturating_add(1) >= from)
      .unwrap_or(self.ranges.len());
    let mut end = start;
    let mut merged = Range { from, to };

    while end < self.ranges.len() && self.ranges[end].from <= to.saturating_add(1) {
      merged.from = merged.from.min(self.ranges[end].from);
      merged.to = merged.to.max(self.ranges[end].to);
      end += 1;
    }

    self.ranges.splice(start..end, std::iter::once(merged));
  }

  /// Number of characters in the set.
  pub fn elements(&self) -> usize {
    self.ranges.iter().map(|r| (r.to - r.from) as usize + 1).sum()
  }

  pub fn first(&self) -> Option<u32> {
    self.ranges.first().map(|r| r.from)
  }

  pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
    self.ranges.iter().flat_map(|r| r.from..=r.to)
  }

  pub fn or(&mut self, other: &CharSet) {
    let mut all = Vec::with_capacity(self.ranges.len() + other.ranges.len());
    all.extend_from_slice(&self.ranges);
    all.extend_from_slice(&other.ranges);
    all.sort_by_key(|r| r.from);

    let mut ranges: Vec<Range> = Vec::with_capacity(all.len());
    for r in all {
      match ranges.last_mut() {
        Some(last) if last.to.saturating_add(1) >= r.from => {
          last.to = last.to.max(r.to);
        }
        _ => ranges.push(r),
      }
    }
    self.ranges = ranges;
  }

  pub fn and(&mut self, other: &CharSet) {
    let mut ranges = vec![];
    let (mut i, mut j) = (0, 0);

    while i < self.ranges.len() && j < other.ranges.len() {
      let a = self.ranges[i];
      let b = other.ranges[j];
      let from = a.from.max(b.from);
      let to = a.to.min(b.to);
      if from <= to {
        ranges.push(Range { from, to });
      }
      if a.to < b.to {
        i += 1;
      } else {
        j += 1;
      }
    }

    self.ranges = ranges;
  }

  pub fn subtract(&mut self, other: &CharSet) {
    let mut ranges = vec![];
    let mut j = 0;

    for &r in &self.ranges {
      let mut from = r.from;
      let mut alive = true;

      while j < other.ranges.len() && other.ranges[j].to < from {
        j += 1;
      }

      let mut k = j;
      while k < other.ranges.len() && other.ranges[k].from <= r.to {
        let cut = other.ranges[k];
        if cut.from > from {
          ranges.push(Range { from, to: cut.from - 1 });
        }
        if cut.to >= r.to {
          alive = false;
          break;
        }
        from = cut.to + 1;
        k += 1;
      }

      if alive {
        ranges.push(Range { from, to: r.to });
      }
    }

    self.ranges = ranges;
  }

  /// Returns whether `other` is a subset of `self`.
  pub fn includes(&self, other: &CharSet) -> bool {
    let mut rest = other.clone();
    rest.subtract(self);
    rest.is_empty()
  }

  pub fn intersects(&self, other: &CharSet) -> bool {
    let (mut i, mut j) = (0, 0);

    while i < self.ranges.len() && j < other.ranges.len() {
      let a = self.ranges[i];
      let b = other.ranges[j];
      if a.from.max(b.from) <= a.to.min(b.to) {
        return true;
      }
      if a.to < b.to {
        i += 1;
      } else {
        j += 1;
      }
    }

    false
  }
}

impl Debug for CharSet {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let mut list = f.debug_set();
    for r in &self.ranges {
      if r.from == r.to {
        list.entry(&r.from);
      } else {
        list.entry(&(r.from..=r.to));
      }
    }
    list.finish()
  }
}
