//! Backend capabilities.

use serde::{Deserialize, Serialize};

use kickback_ir::{Circuit, StandardGate};

use crate::backend::ValidationResult;

/// What a backend can execute.
///
/// Capabilities are fixed at construction time and reported synchronously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Backend name.
    pub name: String,
    /// Maximum register width.
    pub num_qubits: u32,
    /// Maximum shots per execution.
    pub max_shots: u32,
    /// Gate kinds accepted, single or multi-controlled.
    pub gate_set: Vec<StandardGate>,
    /// Whether this is a simulator.
    pub is_simulator: bool,
}

impl Capabilities {
    /// Capabilities of an exact statevector simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            max_shots: 1_000_000,
            gate_set: vec![StandardGate::X, StandardGate::H, StandardGate::Z],
            is_simulator: true,
        }
    }

    /// Check a circuit and shot count against these capabilities.
    pub fn check(&self, circuit: &Circuit, shots: u32) -> ValidationResult {
        let mut reasons = vec![];

        if circuit.num_qubits() > self.num_qubits {
            reasons.push(format!(
                "circuit has {} qubits but {} supports {}",
                circuit.num_qubits(),
                self.name,
                self.num_qubits
            ));
        }
        if shots == 0 || shots > self.max_shots {
            reasons.push(format!(
                "shots must be in 1..={}, got {shots}",
                self.max_shots
            ));
        }
        if circuit.measurements().is_empty() {
            reasons.push("circuit declares no measurements".into());
        }
        for op in circuit.operations() {
            if !self.gate_set.contains(&op.gate()) {
                reasons.push(format!("gate '{}' is not supported", op.name()));
                break;
            }
        }

        if reasons.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { reasons }
        }
    }
}
