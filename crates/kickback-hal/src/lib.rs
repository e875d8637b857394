//! Kickback Backend Abstraction
//!
//! The oracle pipeline builds circuits; something else samples them. This
//! crate is the seam between the two: a [`Backend`] accepts a
//! [`kickback_ir::Circuit`] and a shot count and returns an
//! [`ExecutionResult`] holding one [`Histogram`] per measurement label.
//!
//! # Contract
//!
//! - Execution is a single call; it either returns complete histograms whose
//!   totals equal the requested shots, or fails.
//! - Outcomes are decoded with the first declared measurement qubit as the
//!   most significant bit (see [`kickback_ir::Measurement::decode`]).
//! - No retries and no partial delivery.
//!
//! # Implementing a Backend
//!
//! ```ignore
//! use kickback_hal::{Backend, Capabilities, ExecutionResult, HalResult, ValidationResult};
//! use kickback_ir::Circuit;
//! use async_trait::async_trait;
//!
//! struct MyBackend {
//!     capabilities: Capabilities,
//! }
//!
//! #[async_trait]
//! impl Backend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     fn capabilities(&self) -> &Capabilities {
//!         &self.capabilities
//!     }
//!
//!     async fn validate(&self, circuit: &Circuit, shots: u32) -> HalResult<ValidationResult> {
//!         Ok(self.capabilities.check(circuit, shots))
//!     }
//!
//!     async fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
//!         // Sample the circuit
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, ValidationResult};
pub use capability::Capabilities;
pub use error::{HalError, HalResult};
pub use result::{ExecutionResult, Histogram};
