//! Append-only circuit builder.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::measurement::{MAX_MEASURED_QUBITS, Measurement};
use crate::operation::Operation;
use crate::qubit::QubitId;

/// A quantum circuit description.
///
/// Operations are only ever appended. Composition concatenates the operation
/// sequences (and the measurement lists) of two circuits without reordering
/// either, which makes it associative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Register width; every operand lies in `[0, num_qubits)`.
    num_qubits: u32,
    /// Gate operations in application order.
    operations: Vec<Operation>,
    /// Terminal measurement declarations in declaration order.
    measurements: Vec<Measurement>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            operations: vec![],
            measurements: vec![],
        }
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Append an operation after validating it against the register width.
    pub fn apply(&mut self, operation: Operation) -> IrResult<&mut Self> {
        operation.validate(self.num_qubits)?;
        self.operations.push(operation);
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Operation::single(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Operation::single(StandardGate::X, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Operation::single(StandardGate::Z, qubit))
    }

    /// Apply a multi-controlled Z gate.
    pub fn mcz(
        &mut self,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Operation::controlled(StandardGate::Z, target, controls)?)
    }

    /// Apply a multi-controlled X gate.
    pub fn mcx(
        &mut self,
        controls: impl IntoIterator<Item = QubitId>,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.apply(Operation::controlled(StandardGate::X, target, controls)?)
    }

    /// Apply Hadamard to each qubit in order.
    pub fn h_all(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        for qubit in qubits {
            self.h(qubit)?;
        }
        Ok(self)
    }

    /// Apply Pauli-X to each qubit in order.
    pub fn x_all(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        for qubit in qubits {
            self.x(qubit)?;
        }
        Ok(self)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Declare a measurement of `qubits` under `label`.
    ///
    /// A label may be declared more than once, but no qubit may be read twice
    /// under the same label.
    pub fn measure(
        &mut self,
        qubits: impl IntoIterator<Item = QubitId>,
        label: impl Into<String>,
    ) -> IrResult<&mut Self> {
        let measurement = Measurement::new(label, qubits)?;
        self.check_measurement(&measurement)?;
        self.measurements.push(measurement);
        Ok(self)
    }

    fn check_measurement(&self, measurement: &Measurement) -> IrResult<()> {
        let width = self.measured_qubits(&measurement.label).len() + measurement.width();
        if width > MAX_MEASURED_QUBITS {
            return Err(IrError::MeasurementTooWide {
                label: measurement.label.clone(),
                width,
            });
        }
        for &qubit in &measurement.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    width: self.num_qubits,
                    gate_name: Some("measure".into()),
                });
            }
            let repeated = self
                .measurements
                .iter()
                .filter(|m| m.label == measurement.label)
                .any(|m| m.qubits.contains(&qubit));
            if repeated {
                return Err(IrError::DuplicateMeasurement {
                    qubit,
                    label: measurement.label.clone(),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Append every operation and measurement of `other` after this circuit's.
    ///
    /// The register widens to the larger of the two widths. Nothing is
    /// appended if `other` would repeat a measured qubit under a label or
    /// push a label past [`MAX_MEASURED_QUBITS`].
    pub fn append(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        let mut merged = self.measurements.clone();
        for measurement in &other.measurements {
            for &qubit in &measurement.qubits {
                let repeated = merged
                    .iter()
                    .filter(|m| m.label == measurement.label)
                    .any(|m| m.qubits.contains(&qubit));
                if repeated {
                    return Err(IrError::DuplicateMeasurement {
                        qubit,
                        label: measurement.label.clone(),
                    });
                }
            }
            let width = merged
                .iter()
                .filter(|m| m.label == measurement.label)
                .map(Measurement::width)
                .sum::<usize>()
                + measurement.width();
            if width > MAX_MEASURED_QUBITS {
                return Err(IrError::MeasurementTooWide {
                    label: measurement.label.clone(),
                    width,
                });
            }
            merged.push(measurement.clone());
        }

        self.num_qubits = self.num_qubits.max(other.num_qubits);
        self.operations.extend_from_slice(&other.operations);
        self.measurements = merged;
        Ok(self)
    }

    /// Concatenate two circuits into a new one named after `self`.
    pub fn concat(&self, other: &Circuit) -> IrResult<Circuit> {
        let mut out = self.clone();
        out.append(other)?;
        Ok(out)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the register width.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Get the gate operations in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Get the measurement declarations in order.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Qubits declared under `label`, in declaration order.
    pub fn measured_qubits(&self, label: &str) -> Vec<QubitId> {
        self.measurements
            .iter()
            .filter(|m| m.label == label)
            .flat_map(|m| m.qubits.iter().copied())
            .collect()
    }

    /// Get the number of gate operations.
    pub fn num_ops(&self) -> usize {
        self.operations.len()
    }

    /// Check if the circuit has no gate operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Count operations by name (`h`, `x`, `mcz`, ...).
    pub fn count_ops(&self) -> FxHashMap<&'static str, usize> {
        let mut counts = FxHashMap::default();
        for op in &self.operations {
            *counts.entry(op.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Get the circuit depth (layers of operations on overlapping qubits).
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits as usize];
        let mut depth = 0;
        for op in &self.operations {
            let next = op.qubits().map(|q| layer[q.index()]).max().unwrap_or(0) + 1;
            for q in op.qubits() {
                layer[q.index()] = next;
            }
            depth = depth.max(next);
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test", 3);
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.is_empty());
        assert!(circuit.measurements().is_empty());
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::new("test", 3);
        circuit
            .h(QubitId(0))
            .unwrap()
            .x(QubitId(1))
            .unwrap()
            .mcz([QubitId(0), QubitId(1)], QubitId(2))
            .unwrap();

        assert_eq!(circuit.num_ops(), 3);
        assert_eq!(circuit.operations()[2].name(), "mcz");
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut circuit = Circuit::new("test", 2);
        let err = circuit.h(QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { width: 2, .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_measurement_labels() {
        let mut circuit = Circuit::new("test", 3);
        circuit.measure(QubitId::range(0, 2), "m").unwrap();
        circuit.measure([QubitId(2)], "ancilla").unwrap();
        // Same qubit under a different label is fine.
        circuit.measure([QubitId(0)], "copy").unwrap();

        assert_eq!(circuit.measured_qubits("m"), vec![QubitId(0), QubitId(1)]);
        assert!(matches!(
            circuit.measure([QubitId(1)], "m"),
            Err(IrError::DuplicateMeasurement { .. })
        ));
    }

    #[test]
    fn test_measurement_width_is_capped_per_label() {
        let mut circuit = Circuit::new("wide", 70);
        circuit.measure(QubitId::range(0, 40), "m").unwrap();
        let err = circuit.measure(QubitId::range(40, 30), "m").unwrap_err();
        assert!(matches!(
            err,
            IrError::MeasurementTooWide { width: 70, .. }
        ));
        // Another label has its own budget.
        circuit.measure(QubitId::range(40, 30), "rest").unwrap();
    }

    #[test]
    fn test_append_preserves_order() {
        let mut a = Circuit::new("a", 2);
        a.h(QubitId(0)).unwrap();
        let mut b = Circuit::new("b", 3);
        b.x(QubitId(2)).unwrap().z(QubitId(1)).unwrap();

        a.append(&b).unwrap();
        let names: Vec<_> = a.operations().iter().map(Operation::name).collect();
        assert_eq!(names, vec!["h", "x", "z"]);
        assert_eq!(a.num_qubits(), 3);
        assert_eq!(a.name(), "a");
    }

    #[test]
    fn test_append_rejects_repeated_measurement() {
        let mut a = Circuit::new("a", 1);
        a.measure([QubitId(0)], "m").unwrap();
        let mut b = Circuit::new("b", 1);
        b.x(QubitId(0)).unwrap();
        b.measure([QubitId(0)], "m").unwrap();

        assert!(a.append(&b).is_err());
        // Failed append leaves the circuit untouched.
        assert!(a.is_empty());
        assert_eq!(a.measurements().len(), 1);
    }

    #[test]
    fn test_count_ops() {
        let mut circuit = Circuit::new("test", 2);
        circuit.h_all(QubitId::range(0, 2)).unwrap();
        circuit.mcx([QubitId(0)], QubitId(1)).unwrap();
        let counts = circuit.count_ops();
        assert_eq!(counts["h"], 2);
        assert_eq!(counts["mcx"], 1);
    }
}
