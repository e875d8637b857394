//! Deutsch–Jozsa oracle assembly and verdict.
//!
//! The threshold table covers the marked set only. It is completed into a
//! total predicate with a complement value, compiled over the full domain
//! with phase kickback onto an ancilla in |−⟩, and wrapped in the DJ frame.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

use kickback_hal::Histogram;
use kickback_ir::{Circuit, QubitId};

use crate::amplifier::{ANCILLA_LABEL, DATA_LABEL};
use crate::classifier::ThresholdTable;
use crate::error::{OracleError, OracleResult};
use crate::oracle::{PhaseFlip, compile};
use crate::predicate::{MarkedSet, TotalPredicate};

/// Default share of all-zero outcomes required to call a function constant.
pub const DEFAULT_CONFIDENCE: f64 = 0.99;

/// Check that a complement value is 0 or 1.
pub fn check_complement(complement: i64) -> OracleResult<bool> {
    match complement {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(OracleError::Configuration(format!(
            "complement value must be 0 or 1, got {other}"
        ))),
    }
}

impl TotalPredicate {
    /// `f(x) = table[x]` for `x` in `set`, `complement` everywhere else.
    ///
    /// # Errors
    ///
    /// `Configuration` if `complement` is not 0 or 1, or if `table` is not
    /// defined on exactly the members of `set`.
    pub fn assemble(set: &MarkedSet, table: &ThresholdTable, complement: i64) -> OracleResult<Self> {
        let default = check_complement(complement)?;
        if table.len() != set.len() || !table.inputs().eq(set.iter()) {
            return Err(OracleError::Configuration(format!(
                "threshold table covers {} inputs but the marked set has {} members",
                table.len(),
                set.len()
            )));
        }
        Ok(TotalPredicate::from_parts(
            set.width(),
            table.iter().collect(),
            default,
        ))
    }
}

/// Options for the stand-alone Deutsch–Jozsa circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeutschJozsaOptions {
    /// Apply the closing H to the ancilla as well.
    pub ancilla_basis_change: bool,
    /// Measure the ancilla under [`ANCILLA_LABEL`].
    pub measure_ancilla: bool,
}

impl Default for DeutschJozsaOptions {
    fn default() -> Self {
        Self {
            ancilla_basis_change: true,
            measure_ancilla: true,
        }
    }
}

/// Phase-kickback oracle for `predicate` on `data`, using an ancilla the
/// caller holds in |−⟩.
pub fn deutsch_jozsa_oracle(
    data: &[QubitId],
    ancilla: QubitId,
    predicate: &TotalPredicate,
) -> OracleResult<Circuit> {
    compile(data, PhaseFlip::kickback(ancilla), predicate)
}

/// Deutsch–Jozsa circuit for `predicate` over a fresh register.
///
/// Data qubits are `0..n`, the ancilla is qubit `n`: X on the ancilla, H on
/// everything, the kickback oracle, H on the data (and the ancilla), then
/// measurement of the data under [`DATA_LABEL`].
#[instrument(skip_all, fields(width = predicate.width()))]
pub fn deutsch_jozsa(
    predicate: &TotalPredicate,
    options: &DeutschJozsaOptions,
) -> OracleResult<Circuit> {
    let n = predicate.width();
    let data: Vec<QubitId> = QubitId::range(0, n).collect();
    let ancilla = QubitId(n);

    let mut circuit = Circuit::new("deutsch_jozsa", n + 1);
    circuit
        .x(ancilla)?
        .h_all(data.iter().copied())?
        .h(ancilla)?
        .append(&deutsch_jozsa_oracle(&data, ancilla, predicate)?)?
        .h_all(data.iter().copied())?;
    if options.ancilla_basis_change {
        circuit.h(ancilla)?;
    }
    circuit.measure(data.iter().copied(), DATA_LABEL)?;
    if options.measure_ancilla {
        circuit.measure([ancilla], ANCILLA_LABEL)?;
    }

    debug!(
        ops = circuit.num_ops(),
        constant = predicate.is_constant(),
        balanced = predicate.is_balanced(),
        "built deutsch-jozsa circuit"
    );
    Ok(circuit)
}

/// Outcome of a Deutsch–Jozsa run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The all-zero data outcome met the confidence share.
    Constant,
    /// It did not; the function is balanced or otherwise non-constant.
    NotConstant,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Constant => write!(f, "constant"),
            Verdict::NotConstant => write!(f, "not constant"),
        }
    }
}

/// Decide from a data-register histogram.
///
/// `Constant` iff the share of outcome 0 is at least `confidence`.
pub fn verdict(histogram: &Histogram, confidence: f64) -> Verdict {
    if histogram.share(0) >= confidence {
        Verdict::Constant
    } else {
        Verdict::NotConstant
    }
}
