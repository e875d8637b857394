//! Grover diffusion operator.

use kickback_ir::{Circuit, QubitId};

use crate::error::{OracleError, OracleResult};

/// Reflection about the uniform superposition over `qubits`.
///
/// H on every qubit, X on every qubit, a multi-controlled Z on the last
/// qubit controlled by the rest, then X and H again: `4n + 1` operations.
/// A single qubit degenerates to H, X, Z, X, H.
pub fn diffuse(qubits: &[QubitId]) -> OracleResult<Circuit> {
    let (&target, controls) = qubits.split_last().ok_or_else(|| {
        OracleError::Configuration("diffusion needs at least one qubit".into())
    })?;
    let register = qubits.iter().map(|q| q.0 + 1).max().unwrap_or(0);

    let mut circuit = Circuit::new("diffusion", register);
    circuit
        .h_all(qubits.iter().copied())?
        .x_all(qubits.iter().copied())?
        .mcz(controls.iter().copied(), target)?
        .x_all(qubits.iter().copied())?
        .h_all(qubits.iter().copied())?;
    Ok(circuit)
}
