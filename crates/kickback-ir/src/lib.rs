//! Kickback Circuit Description
//!
//! This crate provides the data structures every other Kickback crate speaks:
//! qubit identifiers, gate operations, measurement declarations and the
//! append-only [`Circuit`] that carries them to a backend.
//!
//! # Overview
//!
//! A circuit is an ordered sequence of [`Operation`]s plus an ordered list of
//! [`Measurement`] declarations. Operations are never reordered: two circuits
//! compose by concatenation, and that concatenation is associative.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] is an opaque index into a fixed-width register
//! - **Gates**: [`StandardGate`] covers the three gate kinds the oracle
//!   compiler emits (bit-flip, basis-change, phase-flip)
//! - **Operations**: [`Operation`] is either a single-qubit gate or a
//!   multi-controlled gate with an ordered, duplicate-free control list
//! - **Measurements**: [`Measurement`] names a set of qubits read out under a
//!   label; the first declared qubit is the most significant bit
//! - **Circuit**: [`Circuit`] validates every operation against its width
//!
//! # Example: Phase-Flipping |11⟩
//!
//! ```rust
//! use kickback_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("flip_11", 2);
//! circuit.h_all(QubitId::range(0, 2)).unwrap();
//! circuit.mcz([QubitId(0)], QubitId(1)).unwrap();
//! circuit.measure(QubitId::range(0, 2), "m").unwrap();
//!
//! assert_eq!(circuit.num_ops(), 3);
//! assert_eq!(circuit.measurements().len(), 1);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Role | Controlled form |
//! |------|------|-----------------|
//! | `X` | bit-flip (dress / undress, ancilla priming) | `mcx` (phase kickback on a \|−⟩ ancilla) |
//! | `H` | basis change (superposition, DJ frame) | `mch` |
//! | `Z` | phase flip | `mcz` |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod measurement;
pub mod operation;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use measurement::{MAX_MEASURED_QUBITS, Measurement};
pub use operation::Operation;
pub use qubit::QubitId;
