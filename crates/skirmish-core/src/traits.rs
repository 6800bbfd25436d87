//! The interpreter ↔ simulation seam.
//!
//! The script interpreter never sees the simulation directly. It reads
//! unit state through [`CobHost::unit`] snapshots and routes every
//! mutation through a named host method, so single opcodes can be
//! exercised against a recording mock.

use crate::fixed::{SimScalar, SimVector};
use crate::id::{PlayerId, UnitId};
use crate::SimAngle;

/// Read-only snapshot of the unit fields scripts can query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitView {
    /// World position of the unit's origin.
    pub position: SimVector,
    /// Heading about the Y axis.
    pub rotation: SimAngle,
    /// Height of the unit's collision volume.
    pub height: SimScalar,
    /// Owning player.
    pub owner: PlayerId,
    /// Current hit points.
    pub hit_points: u32,
    /// Maximum hit points.
    pub max_hit_points: u32,
    /// Whether the unit is activated (on).
    pub activated: bool,
    /// Whether the unit is in its build stance.
    pub in_build_stance: bool,
    /// Whether the unit's yard (doors) is open.
    pub yard_open: bool,
    /// Remaining build progress as a percentage in `[0, 100]`.
    pub build_percent_left: u32,
    /// Standing fire orders state.
    pub fire_orders: i32,
    /// Standing move orders state.
    pub move_orders: i32,
    /// Whether the unit is armored.
    pub armored: bool,
}

/// A visual effect emitted at a piece of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceEffect {
    /// The piece is blown off the model.
    Explode {
        /// Explosion type flags from the script.
        explosion_type: i32,
    },
    /// A particle effect is emitted from the piece.
    Smoke {
        /// Effect type from the script.
        sfx_type: i32,
    },
}

/// The simulation surface available to a running script.
///
/// Implemented by the simulation's script host and by the mock host in
/// `skirmish-test-utils`. Every method that takes a [`UnitId`] must
/// tolerate ids of units that no longer exist.
pub trait CobHost {
    /// Draw uniformly from `[low, high]` using the simulation's seeded
    /// generator. Callers guarantee `low <= high`.
    fn random_range(&mut self, low: i32, high: i32) -> i32;

    /// Snapshot of a live unit, or `None` if it does not exist.
    fn unit(&self, unit: UnitId) -> Option<UnitView>;

    /// World position of a named piece of a unit.
    ///
    /// `None` if the unit does not exist or its model lacks the piece.
    fn piece_position(&self, unit: UnitId, piece: &str) -> Option<SimVector>;

    /// Terrain height at a world position.
    fn ground_height(&self, x: SimScalar, z: SimScalar) -> SimScalar;

    /// Smallest live unit id, or 0 if there are none.
    fn min_unit_id(&self) -> u32;

    /// Largest unit id ever allocated, or 0 if none has been.
    fn max_unit_id(&self) -> u32;

    /// Show or hide a piece.
    fn set_piece_visible(&mut self, unit: UnitId, piece: &str, visible: bool);

    /// Enable or disable lighting on a piece.
    fn set_piece_shaded(&mut self, unit: UnitId, piece: &str, shaded: bool);

    /// Emit a visual effect at a piece.
    fn emit_piece_effect(&mut self, unit: UnitId, piece: &str, effect: PieceEffect);

    /// Activate or deactivate a unit.
    fn set_activation(&mut self, unit: UnitId, active: bool);

    /// Enter or leave the build stance.
    fn set_build_stance(&mut self, unit: UnitId, value: bool);

    /// Request the unit's yard to open or close.
    ///
    /// The request is silently refused if closing would trap a unit.
    fn set_yard_open(&mut self, unit: UnitId, open: bool);

    /// Start or stop clearing units off the unit's footprint.
    fn set_bugger_off(&mut self, unit: UnitId, value: bool);

    /// Update the unit's standing move orders.
    fn set_standing_move_orders(&mut self, unit: UnitId, value: i32);

    /// Update the unit's standing fire orders.
    fn set_standing_fire_orders(&mut self, unit: UnitId, value: i32);

    /// Set whether the unit is armored.
    fn set_armored(&mut self, unit: UnitId, value: bool);
}
