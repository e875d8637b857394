//! Execution results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome counts for one measurement label.
///
/// Keys are outcomes decoded as unsigned integers (first measured qubit is
/// the most significant bit); values are occurrence counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    counts: BTreeMap<u64, u64>,
}

impl Histogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `outcome`.
    pub fn record(&mut self, outcome: u64, count: u64) {
        if count > 0 {
            *self.counts.entry(outcome).or_insert(0) += count;
        }
    }

    /// Occurrences of `outcome` (0 if never observed).
    pub fn get(&self, outcome: u64) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Share of shots that produced `outcome`, in `[0, 1]`.
    pub fn share(&self, outcome: u64) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.get(outcome) as f64 / total as f64
    }

    /// Combined count of all `outcomes`.
    pub fn count_of<'a>(&self, outcomes: impl IntoIterator<Item = &'a u64>) -> u64 {
        outcomes.into_iter().map(|&o| self.get(o)).sum()
    }

    /// Most frequent outcome; ties resolve to the smallest outcome.
    pub fn most_frequent(&self) -> Option<(u64, u64)> {
        self.counts
            .iter()
            .max_by(|(oa, ca), (ob, cb)| ca.cmp(cb).then(ob.cmp(oa)))
            .map(|(&o, &c)| (o, c))
    }

    /// Iterate `(outcome, count)` in ascending outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(&o, &c)| (o, c))
    }
}

impl FromIterator<(u64, u64)> for Histogram {
    fn from_iter<I: IntoIterator<Item = (u64, u64)>>(iter: I) -> Self {
        let mut histogram = Histogram::new();
        for (outcome, count) in iter {
            histogram.record(outcome, count);
        }
        histogram
    }
}

/// The result of executing one circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// One histogram per measurement label.
    pub histograms: BTreeMap<String, Histogram>,
    /// Number of shots executed.
    pub shots: u32,
    /// Name of the backend that produced the result.
    pub backend: String,
    /// Wall-clock execution time in milliseconds, if measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create an empty result for `shots` shots.
    pub fn new(backend: impl Into<String>, shots: u32) -> Self {
        Self {
            histograms: BTreeMap::new(),
            shots,
            backend: backend.into(),
            execution_time_ms: None,
        }
    }

    /// Attach the histogram for `label`.
    #[must_use]
    pub fn with_histogram(mut self, label: impl Into<String>, histogram: Histogram) -> Self {
        self.histograms.insert(label.into(), histogram);
        self
    }

    /// Set the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Histogram recorded under `label`.
    pub fn histogram(&self, label: &str) -> Option<&Histogram> {
        self.histograms.get(label)
    }

    /// Check that every histogram accounts for exactly `shots` shots.
    pub fn is_complete(&self) -> bool {
        self.histograms
            .values()
            .all(|h| h.total() == u64::from(self.shots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_counts() {
        let mut h = Histogram::new();
        h.record(3, 10);
        h.record(5, 30);
        h.record(3, 5);
        h.record(9, 0);

        assert_eq!(h.get(3), 15);
        assert_eq!(h.get(9), 0);
        assert_eq!(h.len(), 2);
        assert_eq!(h.total(), 45);
        assert_eq!(h.most_frequent(), Some((5, 30)));
        assert!((h.share(5) - 30.0 / 45.0).abs() < 1e-12);
        assert_eq!(h.count_of(&[3, 5, 7]), 45);
    }

    #[test]
    fn test_most_frequent_tie_prefers_smaller_outcome() {
        let h: Histogram = [(4, 2), (1, 2)].into_iter().collect();
        assert_eq!(h.most_frequent(), Some((1, 2)));
        assert_eq!(Histogram::new().most_frequent(), None);
    }

    #[test]
    fn test_execution_result_completeness() {
        let full: Histogram = [(0, 6), (1, 4)].into_iter().collect();
        let short: Histogram = [(0, 3)].into_iter().collect();

        let ok = ExecutionResult::new("sim", 10).with_histogram("m", full.clone());
        assert!(ok.is_complete());
        assert_eq!(ok.histogram("m"), Some(&full));
        assert!(ok.histogram("ancilla").is_none());

        let bad = ok.with_histogram("ancilla", short);
        assert!(!bad.is_complete());
    }
}
