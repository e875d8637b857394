//! Grover amplitude amplification.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, instrument};

use kickback_ir::{Circuit, QubitId};

use crate::diffusion::diffuse;
use crate::error::{OracleError, OracleResult};
use crate::oracle::{AncillaState, PhaseFlip, compile};
use crate::predicate::MarkedSet;

/// Measurement label of the data register.
pub const DATA_LABEL: &str = "m";
/// Measurement label of auxiliary qubits.
pub const ANCILLA_LABEL: &str = "ancilla";

/// Which phase-flip strategy a stage uses for marking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipMode {
    /// Multi-controlled Z on a dedicated ancilla primed to |1⟩.
    #[default]
    Ancilla,
    /// Multi-controlled Z on the last data qubit.
    InPlace,
}

/// Options for [`amplify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmplifierOptions {
    /// Marking strategy. The ancilla, when used, is qubit `n`.
    pub flip: FlipMode,
    /// Also measure the ancilla under [`ANCILLA_LABEL`].
    pub measure_ancilla: bool,
}

impl Default for AmplifierOptions {
    fn default() -> Self {
        Self {
            flip: FlipMode::Ancilla,
            measure_ancilla: true,
        }
    }
}

/// Iteration count that maximises the marked-state probability,
/// `round(π/4 · √(2^n / |S|))`. Zero for an empty set.
pub fn optimal_iterations(width: u32, marked: usize) -> u32 {
    if marked == 0 {
        return 0;
    }
    let ratio = 2f64.powi(width as i32) / marked as f64;
    (PI / 4.0 * ratio.sqrt()).round() as u32
}

/// Gates that move an ancilla from |0⟩ into `state`.
fn prime(circuit: &mut Circuit, ancilla: QubitId, state: AncillaState) -> OracleResult<()> {
    circuit.x(ancilla)?;
    if state == AncillaState::Minus {
        circuit.h(ancilla)?;
    }
    Ok(())
}

/// Gates that return an ancilla from `state` to |0⟩.
fn unprime(circuit: &mut Circuit, ancilla: QubitId, state: AncillaState) -> OracleResult<()> {
    if state == AncillaState::Minus {
        circuit.h(ancilla)?;
    }
    circuit.x(ancilla)?;
    Ok(())
}

/// `iterations` rounds of {oracle for `set`, diffusion} over `qubits`.
///
/// With an ancilla strategy the ancilla is primed once before the first
/// round and restored once after the last, so it starts and ends in |0⟩.
/// Zero iterations give an empty fragment.
pub fn amplification_fragment(
    qubits: &[QubitId],
    set: &MarkedSet,
    iterations: u32,
    flip: PhaseFlip,
) -> OracleResult<Circuit> {
    let oracle = compile(qubits, flip, set)?;
    let diffusion = diffuse(qubits)?;
    let register = oracle.num_qubits().max(diffusion.num_qubits());

    let mut circuit = Circuit::new("amplification", register);
    if iterations == 0 {
        return Ok(circuit);
    }
    if let PhaseFlip::Ancilla { qubit, state } = flip {
        prime(&mut circuit, qubit, state)?;
    }
    for _ in 0..iterations {
        circuit.append(&oracle)?.append(&diffusion)?;
    }
    if let PhaseFlip::Ancilla { qubit, state } = flip {
        unprime(&mut circuit, qubit, state)?;
    }
    Ok(circuit)
}

/// Build the Grover circuit for `set` over a fresh `width`-qubit register.
///
/// Uniform superposition over qubits `0..width`, the amplification
/// fragment, then measurement of the data under [`DATA_LABEL`]. The
/// iteration count is taken as given; see [`optimal_iterations`].
#[instrument(skip(set, options), fields(marked = set.len()))]
pub fn amplify(
    width: u32,
    set: &MarkedSet,
    iterations: u32,
    options: &AmplifierOptions,
) -> OracleResult<Circuit> {
    if set.width() != width {
        return Err(OracleError::RegisterWidthMismatch {
            expected: set.width() as usize,
            got: width as usize,
        });
    }
    let data: Vec<QubitId> = QubitId::range(0, width).collect();
    let flip = match options.flip {
        FlipMode::Ancilla => PhaseFlip::ancilla(QubitId(width)),
        FlipMode::InPlace => PhaseFlip::InPlace,
    };
    let register = width + u32::from(flip.ancilla_qubit().is_some());

    let mut circuit = Circuit::new("grover", register);
    circuit.h_all(data.iter().copied())?;
    circuit.append(&amplification_fragment(&data, set, iterations, flip)?)?;
    circuit.measure(data.iter().copied(), DATA_LABEL)?;
    if let (Some(ancilla), true) = (flip.ancilla_qubit(), options.measure_ancilla) {
        circuit.measure([ancilla], ANCILLA_LABEL)?;
    }

    debug!(ops = circuit.num_ops(), depth = circuit.depth(), "built grover circuit");
    Ok(circuit)
}
