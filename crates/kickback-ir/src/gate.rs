//! Gate kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The gate kinds an oracle circuit is built from.
///
/// All three are self-inverse, which is what lets the compiler undo its
/// dressing layer by simply replaying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X (bit-flip).
    X,
    /// Hadamard (basis change).
    H,
    /// Pauli-Z (phase flip).
    Z,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::H => "h",
            StandardGate::Z => "z",
        }
    }

    /// Name of the multi-controlled form of this gate.
    #[inline]
    pub fn controlled_name(&self) -> &'static str {
        match self {
            StandardGate::X => "mcx",
            StandardGate::H => "mch",
            StandardGate::Z => "mcz",
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
