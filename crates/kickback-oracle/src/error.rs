//! Error types for the oracle crate.

use thiserror::Error;

use kickback_hal::HalError;
use kickback_ir::IrError;

/// Errors raised while building or running oracle circuits.
///
/// Every construction error surfaces before anything is handed to a
/// backend; backend failures abort the run unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// An integer falls outside the `width`-bit domain.
    #[error("Value {value} is outside the domain [0, 2^{width})")]
    Domain {
        /// The offending value.
        value: i64,
        /// Register width the domain is bound to.
        width: u32,
    },

    /// A predicate's bit width does not match the qubits it is compiled onto.
    #[error("Register width mismatch: predicate has {expected} bits, got {got} qubits")]
    RegisterWidthMismatch {
        /// Bit width of the predicate.
        expected: usize,
        /// Number of qubits supplied.
        got: usize,
    },

    /// A gate or measurement could not be built.
    #[error("Invalid gate specification: {0}")]
    InvalidGateSpec(#[from] IrError),

    /// A run parameter is out of range or unreadable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend failed to execute a circuit.
    #[error("Backend error: {0}")]
    Backend(#[from] HalError),
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;
