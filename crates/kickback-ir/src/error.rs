//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building circuits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index lies outside the register.
    #[error(
        "Qubit {qubit} outside register of width {width}{}",
        format_gate_context(.gate_name)
    )]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Width of the register the operation was applied to.
        width: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// The target of a controlled gate also appears among its controls.
    #[error("Target {qubit} is also a control of gate '{gate_name}'")]
    TargetInControls {
        /// The qubit used as both target and control.
        qubit: QubitId,
        /// Name of the gate.
        gate_name: String,
    },

    /// A qubit is measured more than once under the same label.
    #[error("Qubit {qubit} measured twice under label '{label}'")]
    DuplicateMeasurement {
        /// The qubit measured twice.
        qubit: QubitId,
        /// The measurement label.
        label: String,
    },

    /// A measurement declaration without qubits.
    #[error("Measurement '{0}' declares no qubits")]
    EmptyMeasurement(String),

    /// More qubits under one label than a decoded outcome can hold.
    #[error("Measurement '{label}' reads {width} qubits; at most 64 fit in an outcome")]
    MeasurementTooWide {
        /// The measurement label.
        label: String,
        /// Number of qubits declared under it.
        width: usize,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = IrError::QubitOutOfRange {
            qubit: QubitId(9),
            width: 8,
            gate_name: Some("mcz".into()),
        };
        assert_eq!(err.to_string(), "Qubit q9 outside register of width 8 (gate: mcz)");

        let err = IrError::DuplicateQubit {
            qubit: QubitId(1),
            gate_name: None,
        };
        assert_eq!(err.to_string(), "Duplicate qubit q1 in operation");
    }
}
