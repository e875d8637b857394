//! Gate operations with their operands.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::QubitId;

/// A gate applied to concrete qubits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// A gate on one qubit.
    Single {
        /// The gate kind.
        gate: StandardGate,
        /// The qubit it acts on.
        target: QubitId,
    },
    /// A gate on `target` that fires only when every control is |1⟩.
    MultiControlled {
        /// The gate kind applied to the target.
        gate: StandardGate,
        /// The qubit the gate acts on.
        target: QubitId,
        /// Ordered, duplicate-free controls, disjoint from `target`.
        controls: Vec<QubitId>,
    },
}

impl Operation {
    /// Create a single-qubit operation.
    pub fn single(gate: StandardGate, target: QubitId) -> Self {
        Operation::Single { gate, target }
    }

    /// Create a multi-controlled operation.
    ///
    /// An empty control list yields the plain single-qubit gate, so a
    /// one-qubit register needs no special casing upstream.
    pub fn controlled(
        gate: StandardGate,
        target: QubitId,
        controls: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        let controls: Vec<_> = controls.into_iter().collect();
        if controls.is_empty() {
            return Ok(Self::single(gate, target));
        }
        let op = Operation::MultiControlled {
            gate,
            target,
            controls,
        };
        op.check_operands()?;
        Ok(op)
    }

    /// Get the gate kind.
    #[inline]
    pub fn gate(&self) -> StandardGate {
        match self {
            Operation::Single { gate, .. } | Operation::MultiControlled { gate, .. } => *gate,
        }
    }

    /// Get the target qubit.
    #[inline]
    pub fn target(&self) -> QubitId {
        match self {
            Operation::Single { target, .. } | Operation::MultiControlled { target, .. } => {
                *target
            }
        }
    }

    /// Get the controls (empty for single-qubit operations).
    pub fn controls(&self) -> &[QubitId] {
        match self {
            Operation::Single { .. } => &[],
            Operation::MultiControlled { controls, .. } => controls,
        }
    }

    /// Check if this operation has controls.
    pub fn is_controlled(&self) -> bool {
        matches!(self, Operation::MultiControlled { .. })
    }

    /// All qubits touched, controls first, target last.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.controls()
            .iter()
            .copied()
            .chain(std::iter::once(self.target()))
    }

    /// Number of qubits touched.
    pub fn num_qubits(&self) -> usize {
        self.controls().len() + 1
    }

    /// Get the name of the operation (`x`, `mcz`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Single { gate, .. } => gate.name(),
            Operation::MultiControlled { gate, .. } => gate.controlled_name(),
        }
    }

    /// Validate the operation against a register of `width` qubits.
    pub fn validate(&self, width: u32) -> IrResult<()> {
        for qubit in self.qubits() {
            if qubit.0 >= width {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    width,
                    gate_name: Some(self.name().to_string()),
                });
            }
        }
        self.check_operands()
    }

    fn check_operands(&self) -> IrResult<()> {
        let target = self.target();
        let mut seen = FxHashSet::default();
        for &control in self.controls() {
            if control == target {
                return Err(IrError::TargetInControls {
                    qubit: target,
                    gate_name: self.name().to_string(),
                });
            }
            if !seen.insert(control) {
                return Err(IrError::DuplicateQubit {
                    qubit: control,
                    gate_name: Some(self.name().to_string()),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Single { gate, target } => write!(f, "{gate} {target}"),
            Operation::MultiControlled {
                target, controls, ..
            } => {
                write!(f, "{} ", self.name())?;
                for (i, control) in controls.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{control}")?;
                }
                write!(f, " -> {target}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_operation() {
        let op = Operation::single(StandardGate::H, QubitId(2));
        assert_eq!(op.name(), "h");
        assert_eq!(op.target(), QubitId(2));
        assert!(op.controls().is_empty());
        assert!(!op.is_controlled());
        assert_eq!(op.to_string(), "h q2");
    }

    #[test]
    fn test_controlled_operation() {
        let op =
            Operation::controlled(StandardGate::Z, QubitId(3), [QubitId(0), QubitId(1)]).unwrap();
        assert_eq!(op.name(), "mcz");
        assert_eq!(op.num_qubits(), 3);
        assert_eq!(
            op.qubits().collect::<Vec<_>>(),
            vec![QubitId(0), QubitId(1), QubitId(3)]
        );
        assert_eq!(op.to_string(), "mcz q0,q1 -> q3");
    }

    #[test]
    fn test_controlled_without_controls_degenerates() {
        let op = Operation::controlled(StandardGate::Z, QubitId(0), Vec::new()).unwrap();
        assert_eq!(op, Operation::single(StandardGate::Z, QubitId(0)));
    }

    #[test]
    fn test_target_in_controls_rejected() {
        let err = Operation::controlled(StandardGate::Z, QubitId(1), [QubitId(0), QubitId(1)])
            .unwrap_err();
        assert!(matches!(err, IrError::TargetInControls { qubit: QubitId(1), .. }));
    }

    #[test]
    fn test_duplicate_control_rejected() {
        let err = Operation::controlled(StandardGate::X, QubitId(2), [QubitId(0), QubitId(0)])
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(0), .. }));
    }

    #[test]
    fn test_validate_width() {
        let op = Operation::controlled(StandardGate::Z, QubitId(4), [QubitId(0)]).unwrap();
        assert!(op.validate(5).is_ok());
        assert!(matches!(
            op.validate(4),
            Err(IrError::QubitOutOfRange { qubit: QubitId(4), width: 4, .. })
        ));
    }
}
