//! Qubit assignment for the combined pipeline circuit.

use kickback_ir::QubitId;

use crate::amplifier::FlipMode;

/// Where each role lives in the combined register.
///
/// Data qubits are `0..n`. With an ancilla flip the Grover ancilla is
/// qubit `n`; the Deutsch–Jozsa ancilla takes the next free index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterLayout {
    width: u32,
    grover_ancilla: Option<QubitId>,
    dj_ancilla: QubitId,
}

impl RegisterLayout {
    /// Lay out `width` data qubits for the given Grover strategy.
    pub fn new(width: u32, flip: FlipMode) -> Self {
        let grover_ancilla = match flip {
            FlipMode::Ancilla => Some(QubitId(width)),
            FlipMode::InPlace => None,
        };
        let dj_ancilla = QubitId(width + u32::from(grover_ancilla.is_some()));
        Self {
            width,
            grover_ancilla,
            dj_ancilla,
        }
    }

    /// Number of data qubits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Data qubits, most significant bit first.
    pub fn data(&self) -> Vec<QubitId> {
        QubitId::range(0, self.width).collect()
    }

    /// The Grover marking ancilla, if the strategy uses one.
    pub fn grover_ancilla(&self) -> Option<QubitId> {
        self.grover_ancilla
    }

    /// The Deutsch–Jozsa kickback ancilla.
    pub fn dj_ancilla(&self) -> QubitId {
        self.dj_ancilla
    }

    /// All ancillas in index order.
    pub fn ancillas(&self) -> Vec<QubitId> {
        self.grover_ancilla
            .into_iter()
            .chain(std::iter::once(self.dj_ancilla))
            .collect()
    }

    /// Total register width.
    pub fn num_qubits(&self) -> u32 {
        self.dj_ancilla.0 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancilla_layout() {
        let layout = RegisterLayout::new(7, FlipMode::Ancilla);
        assert_eq!(layout.data().len(), 7);
        assert_eq!(layout.grover_ancilla(), Some(QubitId(7)));
        assert_eq!(layout.dj_ancilla(), QubitId(8));
        assert_eq!(layout.ancillas(), vec![QubitId(7), QubitId(8)]);
        assert_eq!(layout.num_qubits(), 9);
    }

    #[test]
    fn test_in_place_layout() {
        let layout = RegisterLayout::new(4, FlipMode::InPlace);
        assert_eq!(layout.grover_ancilla(), None);
        assert_eq!(layout.dj_ancilla(), QubitId(4));
        assert_eq!(layout.num_qubits(), 5);
    }
}
