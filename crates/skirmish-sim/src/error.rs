//! Error types for simulation operations.

use std::error::Error;
use std::fmt;

use skirmish_core::{PlayerId, UnitId};
use skirmish_space::{DiscreteRect, SpaceError};

/// Errors from [`GameSimulation`](crate::GameSimulation) operations.
///
/// Expected control flow (a footprint collision, a blocked yard, a
/// stalled resource request) is not an error; those operations report
/// it through their return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// No unit definition is registered under this name.
    UnknownUnitType {
        /// The requested type, upper-cased.
        name: String,
    },
    /// No model definition is registered under this name.
    UnknownModel {
        /// The model (object) name.
        name: String,
    },
    /// No compiled script is registered for this unit type.
    UnknownScript {
        /// The unit type.
        name: String,
    },
    /// No weapon definition is registered under this name.
    UnknownWeapon {
        /// The weapon type, upper-cased.
        name: String,
    },
    /// No movement class is registered under this name.
    UnknownMovementClass {
        /// The movement class name.
        name: String,
    },
    /// A building's definition carries no yard map.
    MissingYardMap {
        /// The unit type.
        unit_type: String,
    },
    /// The unit does not exist (never created, or already swept).
    UnknownUnit {
        /// The requested id.
        unit: UnitId,
    },
    /// The unit's model has no piece with this name.
    UnknownPiece {
        /// The unit.
        unit: UnitId,
        /// The requested piece.
        name: String,
    },
    /// The player does not exist.
    UnknownPlayer {
        /// The requested id.
        player: PlayerId,
    },
    /// A footprint that must lie on the map does not.
    FootprintOutOfBounds {
        /// The unit whose footprint was computed.
        unit: UnitId,
        /// The offending footprint.
        rect: DiscreteRect,
    },
    /// A grid operation failed.
    Space(SpaceError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUnitType { name } => write!(f, "unknown unit type `{name}`"),
            Self::UnknownModel { name } => write!(f, "unknown unit model `{name}`"),
            Self::UnknownScript { name } => write!(f, "no script for unit type `{name}`"),
            Self::UnknownWeapon { name } => write!(f, "unknown weapon type `{name}`"),
            Self::UnknownMovementClass { name } => {
                write!(f, "unknown movement class `{name}`")
            }
            Self::MissingYardMap { unit_type } => {
                write!(f, "building type `{unit_type}` has no yard map")
            }
            Self::UnknownUnit { unit } => write!(f, "unit {unit} does not exist"),
            Self::UnknownPiece { unit, name } => {
                write!(f, "unit {unit} has no piece `{name}`")
            }
            Self::UnknownPlayer { player } => write!(f, "player {player} does not exist"),
            Self::FootprintOutOfBounds { unit, rect } => {
                write!(f, "footprint {rect} of unit {unit} is off the map")
            }
            Self::Space(e) => write!(f, "space: {e}"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for SimError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}
