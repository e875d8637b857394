//! Measurement declarations.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// Widest read-out that decodes into a `u64` outcome.
pub const MAX_MEASURED_QUBITS: usize = 64;

/// A terminal read-out of `qubits` under `label`.
///
/// The measured outcome is decoded as an unsigned integer with the first
/// declared qubit as the most significant bit. Marked-set integers are
/// compared directly against these values, so the convention is fixed here
/// rather than left to each backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measurement {
    /// Qubits in read-out order, most significant first.
    pub qubits: Vec<QubitId>,
    /// Key under which backends report the outcome histogram.
    pub label: String,
}

impl Measurement {
    /// Create a measurement, rejecting empty, repeated and over-wide qubit
    /// lists.
    pub fn new(label: impl Into<String>, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<Self> {
        let label = label.into();
        let qubits: Vec<_> = qubits.into_iter().collect();
        if qubits.is_empty() {
            return Err(IrError::EmptyMeasurement(label));
        }
        if qubits.len() > MAX_MEASURED_QUBITS {
            return Err(IrError::MeasurementTooWide {
                label,
                width: qubits.len(),
            });
        }
        let mut seen = FxHashSet::default();
        for &qubit in &qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateMeasurement { qubit, label });
            }
        }
        Ok(Self { qubits, label })
    }

    /// Number of measured qubits (bit width of the decoded outcome).
    pub fn width(&self) -> usize {
        self.qubits.len()
    }

    /// Decode an outcome, given which qubits were observed in |1⟩.
    pub fn decode(&self, mut is_set: impl FnMut(QubitId) -> bool) -> u64 {
        self.qubits
            .iter()
            .fold(0u64, |acc, &q| (acc << 1) | u64::from(is_set(q)))
    }
}
