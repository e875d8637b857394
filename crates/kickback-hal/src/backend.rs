//! Backend trait and configuration.
//!
//! The [`Backend`] trait is deliberately small:
//!
//! ```text
//!   capabilities() ──→ validate() ──→ execute()
//!    (sync, &ref)       (async)       (async)
//! ```
//!
//! [`Backend::run`] chains the last two and is what the pipeline calls.
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `validate()` | async | yes | `HalResult<ValidationResult>` |
//! | `execute()` | async | yes | `HalResult<ExecutionResult>` |
//! | `run()` | async | provided | `HalResult<ExecutionResult>` |

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kickback_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::result::ExecutionResult;

/// Configuration for a backend instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Backend-specific settings (`max_qubits`, `seed`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned extra setting.
    ///
    /// Returns `Ok(None)` when the key is absent and a configuration error
    /// when it is present but not a non-negative integer.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
        }
    }
}

/// Trait for circuit execution backends.
///
/// # Contract
///
/// - `capabilities()` MUST be synchronous and infallible, cached at
///   construction time.
/// - `validate()` MUST check width, shots, and gate support without
///   executing anything.
/// - `execute()` MUST return one histogram per measurement label present in
///   the circuit, each totalling exactly `shots`.
/// - Implementations MUST be usable from concurrent tasks through `&self`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Validate a circuit and shot count against backend constraints.
    async fn validate(&self, circuit: &Circuit, shots: u32) -> HalResult<ValidationResult>;

    /// Execute a circuit for `shots` repetitions.
    async fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult>;

    /// Validate, then execute.
    ///
    /// A circuit rejected by `validate()` is never executed; the rejection is
    /// reported as [`HalError::InvalidCircuit`] with all reasons joined.
    async fn run(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        match self.validate(circuit, shots).await? {
            ValidationResult::Valid => {}
            ValidationResult::Invalid { reasons } => {
                debug!(backend = self.name(), ?reasons, "circuit rejected");
                return Err(HalError::InvalidCircuit(reasons.join("; ")));
            }
        }
        self.execute(circuit, shots).await
    }
}

/// Result of circuit validation against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit can be executed as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}
