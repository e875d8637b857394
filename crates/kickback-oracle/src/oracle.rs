//! Predicate to phase-flip oracle compiler.
//!
//! For every input `x` the predicate marks, the compiler emits
//!
//! 1. X on each qubit whose bit of `x` is 0, so `|x⟩` becomes all-ones;
//! 2. one multi-controlled flip chosen by the [`PhaseFlip`] strategy;
//! 3. the same X gates again.
//!
//! That is `2·zeros(x) + 1` operations per marked input and nothing else:
//! preparing an ancilla is the job of whoever owns the register layout.
//! `qubits[i]` carries bit `i` of the MSB-first expansion of `x`.

use tracing::{debug, instrument, warn};

use kickback_ir::{Circuit, Operation, QubitId, StandardGate};

use crate::error::{OracleError, OracleResult};
use crate::predicate::{PredicateSource, bits_msb_first};

/// Widest full-domain predicate compiled without a warning.
pub const FULL_DOMAIN_WARN_WIDTH: u32 = 10;

/// State in which the caller holds an ancilla flip target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AncillaState {
    /// |1⟩: a multi-controlled Z on the ancilla flips the data phase.
    One,
    /// |−⟩: a multi-controlled X on the ancilla kicks its phase back.
    Minus,
}

/// How the multi-controlled phase flip is realised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseFlip {
    /// Multi-controlled Z on the last data qubit, the rest as controls.
    InPlace,
    /// Flip targeting an auxiliary qubit, controlled by every data qubit.
    Ancilla {
        /// The auxiliary qubit.
        qubit: QubitId,
        /// How the caller prepared it.
        state: AncillaState,
    },
}

impl PhaseFlip {
    /// Ancilla-mediated flip with the ancilla primed to |1⟩.
    pub fn ancilla(qubit: QubitId) -> Self {
        PhaseFlip::Ancilla {
            qubit,
            state: AncillaState::One,
        }
    }

    /// Ancilla-mediated flip with the ancilla in |−⟩.
    pub fn kickback(qubit: QubitId) -> Self {
        PhaseFlip::Ancilla {
            qubit,
            state: AncillaState::Minus,
        }
    }

    /// The auxiliary qubit, if any.
    pub fn ancilla_qubit(&self) -> Option<QubitId> {
        match self {
            PhaseFlip::InPlace => None,
            PhaseFlip::Ancilla { qubit, .. } => Some(*qubit),
        }
    }

    /// The flip applied once the marked input has been mapped to all-ones.
    fn operation(&self, qubits: &[QubitId]) -> OracleResult<Operation> {
        let op = match *self {
            PhaseFlip::InPlace => {
                let (&target, controls) = qubits.split_last().ok_or(
                    OracleError::RegisterWidthMismatch {
                        expected: 1,
                        got: 0,
                    },
                )?;
                Operation::controlled(StandardGate::Z, target, controls.iter().copied())?
            }
            PhaseFlip::Ancilla { qubit, state } => {
                let gate = match state {
                    AncillaState::One => StandardGate::Z,
                    AncillaState::Minus => StandardGate::X,
                };
                Operation::controlled(gate, qubit, qubits.iter().copied())?
            }
        };
        Ok(op)
    }
}

/// Compile a predicate into a phase-flip fragment over `qubits`.
///
/// Marked inputs are visited in ascending order, so compilation is
/// deterministic. An empty or all-false predicate compiles to an empty
/// fragment.
///
/// # Errors
///
/// - `RegisterWidthMismatch` if the predicate width differs from
///   `qubits.len()`.
/// - `InvalidGateSpec` for repeated data qubits or an ancilla that is also a
///   data qubit.
#[instrument(skip_all, fields(width = qubits.len(), flip = ?flip))]
pub fn compile<'a>(
    qubits: &[QubitId],
    flip: PhaseFlip,
    source: impl Into<PredicateSource<'a>>,
) -> OracleResult<Circuit> {
    let source = source.into();
    let width = source.width();
    if width as usize != qubits.len() {
        return Err(OracleError::RegisterWidthMismatch {
            expected: width as usize,
            got: qubits.len(),
        });
    }
    if source.is_full_domain() && width > FULL_DOMAIN_WARN_WIDTH {
        warn!(
            width,
            "full-domain oracle visits 2^{} inputs; construction time and size grow exponentially",
            width
        );
    }

    // Validates operands even when nothing ends up marked.
    let flip_op = flip.operation(qubits)?;

    let register = qubits
        .iter()
        .copied()
        .chain(flip.ancilla_qubit())
        .map(|q| q.0 + 1)
        .max()
        .unwrap_or(0);
    let mut circuit = Circuit::new("oracle", register);

    let mut marked = 0usize;
    for x in source.matching() {
        let zeros: Vec<QubitId> = qubits
            .iter()
            .zip(bits_msb_first(x, width))
            .filter(|&(_, bit)| !bit)
            .map(|(&q, _)| q)
            .collect();
        circuit.x_all(zeros.iter().copied())?;
        circuit.apply(flip_op.clone())?;
        circuit.x_all(zeros.iter().copied())?;
        marked += 1;
    }

    debug!(marked, ops = circuit.num_ops(), "compiled oracle");
    Ok(circuit)
}

/// Number of operations [`compile`] emits for a single marked input.
pub fn cost_of(x: u64, width: u32) -> usize {
    2 * bits_msb_first(x, width).filter(|bit| !bit).count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{MarkedSet, TotalPredicate};
    use kickback_ir::IrError;

    fn data(n: u32) -> Vec<QubitId> {
        QubitId::range(0, n).collect()
    }

    #[test]
    fn test_single_member_gate_count_every_strategy() {
        let n = 5;
        let strategies = [
            PhaseFlip::InPlace,
            PhaseFlip::ancilla(QubitId(n)),
            PhaseFlip::kickback(QubitId(n)),
        ];
        for x in 0..(1i64 << n) {
            let set = MarkedSet::new(n, [x]).unwrap();
            for flip in strategies {
                let oracle = compile(&data(n), flip, &set).unwrap();
                let zeros = (0..n).filter(|b| (x >> b) & 1 == 0).count();
                assert_eq!(oracle.num_ops(), 2 * zeros + 1, "x = {x}, flip = {flip:?}");
                assert_eq!(oracle.num_ops(), cost_of(x as u64, n));
            }
        }
    }

    #[test]
    fn test_dressing_follows_msb_first_order() {
        // x = 0b011 over 3 qubits: bit 0 of the expansion (q0) is 0.
        let set = MarkedSet::new(3, [0b011]).unwrap();
        let oracle = compile(&data(3), PhaseFlip::ancilla(QubitId(3)), &set).unwrap();
        let ops = oracle.operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0], Operation::single(StandardGate::X, QubitId(0)));
        assert_eq!(ops[1].name(), "mcz");
        assert_eq!(ops[1].target(), QubitId(3));
        assert_eq!(ops[1].controls(), data(3).as_slice());
        assert_eq!(ops[2], ops[0]);
        assert_eq!(oracle.num_qubits(), 4);
    }

    #[test]
    fn test_in_place_targets_last_data_qubit() {
        let set = MarkedSet::new(3, [7]).unwrap();
        let oracle = compile(&data(3), PhaseFlip::InPlace, &set).unwrap();
        assert_eq!(oracle.num_ops(), 1);
        let flip = &oracle.operations()[0];
        assert_eq!(flip.target(), QubitId(2));
        assert_eq!(flip.controls(), &[QubitId(0), QubitId(1)]);
        assert_eq!(oracle.num_qubits(), 3);
    }

    #[test]
    fn test_kickback_uses_mcx() {
        let set = MarkedSet::new(2, [3]).unwrap();
        let oracle = compile(&data(2), PhaseFlip::kickback(QubitId(2)), &set).unwrap();
        assert_eq!(oracle.operations()[0].name(), "mcx");
    }

    #[test]
    fn test_single_qubit_in_place_degenerates_to_z() {
        let set = MarkedSet::new(1, [1]).unwrap();
        let oracle = compile(&data(1), PhaseFlip::InPlace, &set).unwrap();
        assert_eq!(
            oracle.operations(),
            &[Operation::single(StandardGate::Z, QubitId(0))]
        );
    }

    #[test]
    fn test_empty_and_all_false_are_identity() {
        let empty = MarkedSet::empty(4).unwrap();
        assert!(compile(&data(4), PhaseFlip::InPlace, &empty).unwrap().is_empty());

        let never = TotalPredicate::constant(4, false).unwrap();
        let oracle = compile(&data(4), PhaseFlip::kickback(QubitId(4)), &never).unwrap();
        assert!(oracle.is_empty());
    }

    #[test]
    fn test_full_domain_marks_every_true_input() {
        let p = TotalPredicate::new(3, [(0, false), (5, false)], true).unwrap();
        let oracle = compile(&data(3), PhaseFlip::kickback(QubitId(3)), &p).unwrap();
        let expected: usize = p.ones().map(|x| cost_of(x, 3)).sum();
        assert_eq!(oracle.num_ops(), expected);
        assert_eq!(oracle.count_ops()["mcx"], 6);
    }

    #[test]
    fn test_width_mismatch() {
        let set = MarkedSet::new(3, [1]).unwrap();
        let err = compile(&data(4), PhaseFlip::InPlace, &set).unwrap_err();
        assert!(matches!(
            err,
            OracleError::RegisterWidthMismatch {
                expected: 3,
                got: 4
            }
        ));
    }

    #[test]
    fn test_ancilla_inside_data_is_rejected() {
        let set = MarkedSet::empty(3).unwrap();
        let err = compile(&data(3), PhaseFlip::ancilla(QubitId(1)), &set).unwrap_err();
        assert!(matches!(
            err,
            OracleError::InvalidGateSpec(IrError::TargetInControls { .. })
        ));
    }

    #[test]
    fn test_repeated_data_qubit_is_rejected() {
        let set = MarkedSet::new(2, [0]).unwrap();
        let qubits = [QubitId(0), QubitId(0)];
        let err = compile(&qubits, PhaseFlip::ancilla(QubitId(2)), &set).unwrap_err();
        assert!(matches!(
            err,
            OracleError::InvalidGateSpec(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let set = MarkedSet::new(6, [40, 3, 17]).unwrap();
        let a = compile(&data(6), PhaseFlip::InPlace, &set).unwrap();
        let b = compile(&data(6), PhaseFlip::InPlace, &set).unwrap();
        assert_eq!(a, b);
    }
}
