//! Events published for the presentation layer.

use skirmish_core::{PieceEffect, UnitId};

/// A visual or audible side effect of the simulation.
///
/// The simulation only records events; the scene drains them with
/// [`GameSimulation::take_events`](crate::GameSimulation::take_events).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A unit entered the world.
    UnitSpawned {
        /// The new unit.
        unit_id: UnitId,
    },
    /// A unit was activated.
    UnitActivated {
        /// The unit.
        unit_id: UnitId,
    },
    /// A unit was deactivated.
    UnitDeactivated {
        /// The unit.
        unit_id: UnitId,
    },
    /// A script emitted smoke or an explosion at a piece.
    PieceEffect {
        /// The unit.
        unit_id: UnitId,
        /// The piece.
        piece: String,
        /// What happened.
        effect: PieceEffect,
    },
    /// A dead unit was removed from the world.
    UnitRemoved {
        /// The unit.
        unit_id: UnitId,
    },
}
