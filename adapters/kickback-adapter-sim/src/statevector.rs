//! Statevector simulation engine.

use num_complex::Complex64;

use kickback_ir::{Operation, QubitId, StandardGate};

/// A statevector representing a quantum state.
///
/// Qubit `q` corresponds to bit `q` of the amplitude index.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self { amplitudes }
    }

    /// Apply an operation to the statevector.
    ///
    /// Controlled operations act only on basis states where every control
    /// bit is set.
    pub fn apply(&mut self, operation: &Operation) {
        let controls = control_mask(operation.controls());
        let target = operation.target().index();
        match operation.gate() {
            StandardGate::X => self.apply_x(target, controls),
            StandardGate::H => self.apply_h(target, controls),
            StandardGate::Z => self.apply_z(target, controls),
        }
    }

    // =========================================================================
    // Gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize, controls: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & controls == controls {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_z(&mut self, qubit: usize, controls: usize) {
        let mask = (1 << qubit) | controls;
        for i in 0..self.amplitudes.len() {
            if i & mask == mask {
                self.amplitudes[i] = -self.amplitudes[i];
            }
        }
    }

    fn apply_h(&mut self, qubit: usize, controls: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 && i & controls == controls {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    // =========================================================================
    // Read-out
    // =========================================================================

    #[cfg(test)]
    fn amplitude(&self, index: usize) -> Complex64 {
        self.amplitudes[index]
    }

    /// Born-rule probabilities of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Check whether `qubit` is |1⟩ in basis state `index`.
    pub fn is_set(index: usize, qubit: QubitId) -> bool {
        (index >> qubit.index()) & 1 == 1
    }
}

fn control_mask(controls: &[QubitId]) -> usize {
    controls.iter().fold(0, |mask, q| mask | (1 << q.index()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn op(gate: StandardGate, target: u32, controls: &[u32]) -> Operation {
        Operation::controlled(gate, QubitId(target), controls.iter().copied().map(QubitId))
            .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert_eq!(sv.probabilities().len(), 4);
        assert!(approx_eq(sv.amplitude(0), Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitude(1), Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_x_gate() {
        let mut sv = Statevector::new(1);
        sv.apply(&op(StandardGate::X, 0, &[]));
        assert!(approx_eq(sv.amplitude(0), Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitude(1), Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_h_gate() {
        let mut sv = Statevector::new(1);
        sv.apply(&op(StandardGate::H, 0, &[]));
        let expected = 1.0 / 2.0_f64.sqrt();
        assert!(approx_eq(sv.amplitude(0), Complex64::new(expected, 0.0)));
        assert!(approx_eq(sv.amplitude(1), Complex64::new(expected, 0.0)));
    }

    #[test]
    fn test_hzh_is_x() {
        let mut sv = Statevector::new(1);
        sv.apply(&op(StandardGate::H, 0, &[]));
        sv.apply(&op(StandardGate::Z, 0, &[]));
        sv.apply(&op(StandardGate::H, 0, &[]));
        assert!(approx_eq(sv.amplitude(1), Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_mcx_fires_only_when_all_controls_set() {
        // |011⟩ (q0, q1 set): Toffoli onto q2 -> |111⟩
        let mut sv = Statevector::new(3);
        sv.apply(&op(StandardGate::X, 0, &[]));
        sv.apply(&op(StandardGate::X, 1, &[]));
        sv.apply(&op(StandardGate::X, 2, &[0, 1]));
        assert!(approx_eq(sv.amplitude(0b111), Complex64::new(1.0, 0.0)));

        // Only q0 set: nothing happens
        let mut sv = Statevector::new(3);
        sv.apply(&op(StandardGate::X, 0, &[]));
        sv.apply(&op(StandardGate::X, 2, &[0, 1]));
        assert!(approx_eq(sv.amplitude(0b001), Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_mcz_flips_only_all_ones() {
        let mut sv = Statevector::new(2);
        sv.apply(&op(StandardGate::H, 0, &[]));
        sv.apply(&op(StandardGate::H, 1, &[]));
        sv.apply(&op(StandardGate::Z, 1, &[0]));

        assert!(approx_eq(sv.amplitude(0b00), Complex64::new(0.5, 0.0)));
        assert!(approx_eq(sv.amplitude(0b01), Complex64::new(0.5, 0.0)));
        assert!(approx_eq(sv.amplitude(0b10), Complex64::new(0.5, 0.0)));
        assert!(approx_eq(sv.amplitude(0b11), Complex64::new(-0.5, 0.0)));
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let mut sv = Statevector::new(3);
        for q in 0..3 {
            sv.apply(&op(StandardGate::H, q, &[]));
        }
        sv.apply(&op(StandardGate::Z, 2, &[0, 1]));
        let total: f64 = sv.probabilities().iter().sum();
        assert!((total - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_is_set() {
        assert!(Statevector::is_set(0b100, QubitId(2)));
        assert!(!Statevector::is_set(0b100, QubitId(0)));
    }
}
