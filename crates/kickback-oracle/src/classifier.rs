//! Classical threshold labeling of marked-set members.
//!
//! This runs at circuit-construction time on the host. The resulting table
//! is classical input to the oracle compiler; no quantum comparator is
//! built.

use std::collections::BTreeMap;

use crate::predicate::MarkedSet;

/// Labels `x → (x ≥ threshold)` for each `x` of a set.
///
/// Undefined outside the set it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdTable {
    threshold: i64,
    entries: BTreeMap<u64, bool>,
}

impl ThresholdTable {
    /// The cutoff the table was built against.
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Label of `x`, or `None` if `x` is not in the table.
    pub fn get(&self, x: u64) -> Option<bool> {
        self.entries.get(&x).copied()
    }

    /// Number of labeled inputs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(x, label)` pairs in ascending `x`.
    pub fn iter(&self) -> impl Iterator<Item = (u64, bool)> + '_ {
        self.entries.iter().map(|(&x, &v)| (x, v))
    }

    /// Labeled inputs in ascending order.
    pub fn inputs(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    /// The table with labels as `0`/`1`.
    pub fn as_bits(&self) -> BTreeMap<u64, u8> {
        self.iter().map(|(x, v)| (x, u8::from(v))).collect()
    }
}

fn at_or_above(x: u64, threshold: i64) -> bool {
    match u64::try_from(threshold) {
        Ok(t) => x >= t,
        // Every input clears a negative cutoff.
        Err(_) => true,
    }
}

/// Label every member of `set` against `threshold`.
///
/// Thresholds outside the domain are valid and make the comparison vacuous.
pub fn classify(set: &MarkedSet, threshold: i64) -> ThresholdTable {
    classify_values(set.iter(), threshold)
}

/// Label arbitrary non-negative integers when no register width is bound.
pub fn classify_values(values: impl IntoIterator<Item = u64>, threshold: i64) -> ThresholdTable {
    let entries = values
        .into_iter()
        .map(|x| (x, at_or_above(x, threshold)))
        .collect();
    ThresholdTable { threshold, entries }
}
