//! Kickback Oracle Pipeline
//!
//! Compiles classical predicates over `n`-bit integers into phase-flip
//! oracles and chains them into a three-stage pipeline:
//!
//! ```text
//!   marked set S ──→ Grover amplification ──┐
//!        │                                  │
//!        └──→ threshold table ──→ total predicate f ──→ Deutsch–Jozsa
//!                                 (complement outside S)       │
//!                                                              ▼
//!                                                 constant / not constant
//! ```
//!
//! # Components
//!
//! - [`compile`]: predicate to oracle, with an in-place, |1⟩-ancilla or
//!   |−⟩-kickback flip
//! - [`diffuse`]: inversion about the mean
//! - [`amplify`]: Grover rounds over a marked set
//! - [`classify`]: threshold labels for the marked set
//! - [`TotalPredicate::assemble`] and [`deutsch_jozsa`]: the DJ stage
//! - [`Pipeline`]: runs a validated [`RunPlan`] on any
//!   [`kickback_hal::Backend`]
//!
//! # Bit Order
//!
//! `qubits[i]` carries bit `i` of the MSB-first expansion of `x`, and
//! measured outcomes decode with the first declared qubit as the most
//! significant bit, so outcome `x` reads back as the integer `x`.
//!
//! # Example
//!
//! ```ignore
//! use kickback_adapter_sim::SimulatorBackend;
//! use kickback_oracle::{Pipeline, PipelineConfig};
//!
//! let plan = PipelineConfig::load(None)?.validate()?;
//! let pipeline = Pipeline::new(SimulatorBackend::with_seed(7));
//! let run = pipeline.run(&plan).await?;
//! println!("{} ({:.3} all-zero)", run.verdict, run.histogram.share(0));
//! ```
//!
//! The Grover result does not feed the later stages: the marked set is
//! taken from configuration throughout.

pub mod amplifier;
pub mod assembler;
pub mod classifier;
pub mod config;
pub mod diffusion;
pub mod error;
pub mod layout;
pub mod oracle;
pub mod pipeline;
pub mod predicate;
pub mod telemetry;

pub use amplifier::{
    ANCILLA_LABEL, AmplifierOptions, DATA_LABEL, FlipMode, amplification_fragment, amplify,
    optimal_iterations,
};
pub use assembler::{
    DEFAULT_CONFIDENCE, DeutschJozsaOptions, Verdict, deutsch_jozsa, deutsch_jozsa_oracle, verdict,
};
pub use classifier::{ThresholdTable, classify, classify_values};
pub use config::{LogFormat, LoggingConfig, PipelineConfig, RunPlan};
pub use diffusion::diffuse;
pub use error::{OracleError, OracleResult};
pub use layout::RegisterLayout;
pub use oracle::{AncillaState, PhaseFlip, compile, cost_of};
pub use pipeline::{Assembly, DeutschJozsaRun, GroverRun, Pipeline, PipelineRun, assemble};
pub use predicate::{MarkedSet, PredicateSource, TotalPredicate};
pub use telemetry::init_logging;
