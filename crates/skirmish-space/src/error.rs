//! Error types for grid construction and addressing.

use crate::rect::DiscreteRect;
use std::fmt;

/// Errors arising from grid construction or cell addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// A cell coordinate is outside the grid.
    CellOutOfBounds {
        /// Column of the offending cell.
        x: i64,
        /// Row of the offending cell.
        y: i64,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// A rectangle does not lie wholly inside the grid.
    RectOutOfBounds {
        /// The offending rectangle.
        rect: DiscreteRect,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// Cell data does not match the requested dimensions.
    DimensionMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
    /// A yard map contains a character with no cell meaning.
    InvalidYardMapCell {
        /// The unrecognised character.
        found: char,
    },
    /// Attempted to construct a grid with zero cells.
    EmptySpace,
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CellOutOfBounds { x, y, bounds } => {
                write!(f, "cell ({x}, {y}) out of bounds: {bounds}")
            }
            Self::RectOutOfBounds { rect, bounds } => {
                write!(f, "rect {rect} out of bounds: {bounds}")
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "expected {expected} cells, got {actual}")
            }
            Self::InvalidYardMapCell { found } => {
                write!(f, "invalid yard map cell {found:?}")
            }
            Self::EmptySpace => write!(f, "grid must have at least one cell"),
        }
    }
}

impl std::error::Error for SpaceError {}
