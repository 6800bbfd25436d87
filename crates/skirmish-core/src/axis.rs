//! The three piece axes addressed by motion opcodes.

use std::fmt;

/// A piece axis.
///
/// Scripts encode the axis as an instruction word: 0 = X, 1 = Y, 2 = Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y (vertical) axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// All axes, in encoding order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Decode an axis from its instruction-word encoding.
    ///
    /// Returns `None` for anything other than 0, 1 or 2.
    pub fn from_word(word: u32) -> Option<Self> {
        match word {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }

    /// Index of this axis into per-axis arrays.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}
