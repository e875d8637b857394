//! Kickback Local Statevector Simulator
//!
//! Exact statevector simulation of X, H and Z with any number of controls,
//! followed by shot sampling from the final distribution. Intended for
//! testing the oracle pipeline on small registers.
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```ignore
//! use kickback_adapter_sim::SimulatorBackend;
//! use kickback_hal::Backend;
//! use kickback_ir::{Circuit, QubitId};
//!
//! let backend = SimulatorBackend::with_seed(42);
//!
//! let mut circuit = Circuit::new("bell", 2);
//! circuit.h(QubitId(0))?.mcx([QubitId(0)], QubitId(1))?;
//! circuit.measure(QubitId::range(0, 2), "m")?;
//!
//! let result = backend.run(&circuit, 1000).await?;
//! // Expect ~50% 0b00 and ~50% 0b11
//! println!("{:?}", result.histogram("m"));
//! ```

mod simulator;
mod statevector;

pub use simulator::{QUBIT_LIMIT, SimulatorBackend};
