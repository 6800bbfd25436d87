//! Faults that abort a script thread.

use std::fmt;

use crate::value_id::CobValueId;

/// A fault raised while executing a script thread.
///
/// Faults are fatal to the thread that raised them and to nothing else;
/// the driver discards the thread and carries on with the tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// The instruction word is not an opcode.
    UnknownOpcode {
        /// The offending word.
        word: u32,
        /// Where it was read from.
        address: usize,
    },
    /// An axis operand other than 0, 1 or 2.
    InvalidAxis {
        /// The offending word.
        word: u32,
    },
    /// The instruction pointer ran past the end of the script.
    InstructionOutOfRange {
        /// The instruction pointer.
        address: usize,
    },
    /// A linked-value id with no meaning.
    UnknownValueId {
        /// The offending id.
        id: i32,
    },
    /// `SET_VALUE` on a read-only linked value.
    ReadOnlyValue {
        /// The value.
        value: CobValueId,
    },
    /// A piece index outside the script's piece table.
    UnknownPiece {
        /// The offending index.
        index: u32,
    },
    /// A piece the unit's model does not have.
    MissingPiece {
        /// The piece name.
        name: String,
    },
    /// A function index outside the script's function table.
    UnknownFunction {
        /// The offending index.
        index: u32,
    },
    /// A local variable index outside the current frame.
    LocalOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of locals in the frame.
        count: usize,
    },
    /// A static variable index outside the environment.
    StaticOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of static variables.
        count: usize,
    },
    /// The script's own unit no longer exists.
    MissingUnit {
        /// The unit id.
        unit: u32,
    },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode { word, address } => {
                write!(f, "unknown opcode {word:#010x} at {address}")
            }
            Self::InvalidAxis { word } => write!(f, "invalid axis {word}"),
            Self::InstructionOutOfRange { address } => {
                write!(f, "instruction pointer {address} past end of script")
            }
            Self::UnknownValueId { id } => write!(f, "unknown value id {id}"),
            Self::ReadOnlyValue { value } => write!(f, "cannot set read-only value {value}"),
            Self::UnknownPiece { index } => write!(f, "unknown piece index {index}"),
            Self::MissingPiece { name } => write!(f, "model has no piece {name:?}"),
            Self::UnknownFunction { index } => write!(f, "unknown function index {index}"),
            Self::LocalOutOfRange { index, count } => {
                write!(f, "local {index} out of range ({count} locals)")
            }
            Self::StaticOutOfRange { index, count } => {
                write!(f, "static {index} out of range ({count} statics)")
            }
            Self::MissingUnit { unit } => write!(f, "unit {unit} does not exist"),
        }
    }
}

impl std::error::Error for ScriptError {}
