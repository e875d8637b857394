//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur while executing circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Invalid circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Circuit exceeds backend capabilities.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Execution failed inside the backend.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
