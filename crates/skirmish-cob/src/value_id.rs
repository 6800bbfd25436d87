//! Identifiers of the linked values scripts can read and write.

use std::fmt;

/// A linked value: a named unit or world property exposed to scripts.
///
/// Discriminants are the ids scripts push before `GET_VALUE`,
/// `GET_VALUE_WITH_ARGS` and `SET_VALUE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CobValueId {
    /// Whether the unit is activated.
    Activation = 1,
    /// Standing move orders.
    StandingMoveOrders = 2,
    /// Standing fire orders.
    StandingFireOrders = 3,
    /// Health as a percentage of maximum.
    Health = 4,
    /// Whether the unit is in its build stance.
    InBuildStance = 5,
    /// Whether the unit is busy.
    Busy = 6,
    /// Packed world XZ of a piece.
    PieceXZ = 7,
    /// World Y of a piece.
    PieceY = 8,
    /// Packed world XZ of a unit.
    UnitXZ = 9,
    /// World Y of a unit.
    UnitY = 10,
    /// Height of a unit.
    UnitHeight = 11,
    /// Heading of a packed XZ vector relative to the unit.
    XZAtan = 12,
    /// Length of a packed XZ vector.
    XZHypot = 13,
    /// Angle of a two-component vector.
    Atan = 14,
    /// Length of a two-component vector.
    Hypot = 15,
    /// Terrain height at a packed XZ position.
    GroundHeight = 16,
    /// Remaining build progress of this unit.
    BuildPercentLeft = 17,
    /// Whether the yard is open.
    YardOpen = 18,
    /// Whether the unit is clearing its footprint.
    BuggerOff = 19,
    /// Whether the unit is armored.
    Armored = 20,
    /// Veteran level.
    VeteranLevel = 32,
    /// Whether a unit is controlled by this machine.
    UnitIsOnThisComp = 68,
    /// Smallest live unit id.
    MinId = 69,
    /// Largest allocated unit id.
    MaxId = 70,
    /// This unit's id.
    MyId = 71,
    /// Team of a unit.
    UnitTeam = 72,
    /// Remaining build progress of a unit.
    UnitBuildPercentLeft = 73,
    /// Whether a unit is allied with this unit.
    UnitAllied = 74,
}

impl CobValueId {
    const ALL: [CobValueId; 28] = [
        CobValueId::Activation,
        CobValueId::StandingMoveOrders,
        CobValueId::StandingFireOrders,
        CobValueId::Health,
        CobValueId::InBuildStance,
        CobValueId::Busy,
        CobValueId::PieceXZ,
        CobValueId::PieceY,
        CobValueId::UnitXZ,
        CobValueId::UnitY,
        CobValueId::UnitHeight,
        CobValueId::XZAtan,
        CobValueId::XZHypot,
        CobValueId::Atan,
        CobValueId::Hypot,
        CobValueId::GroundHeight,
        CobValueId::BuildPercentLeft,
        CobValueId::YardOpen,
        CobValueId::BuggerOff,
        CobValueId::Armored,
        CobValueId::VeteranLevel,
        CobValueId::UnitIsOnThisComp,
        CobValueId::MinId,
        CobValueId::MaxId,
        CobValueId::MyId,
        CobValueId::UnitTeam,
        CobValueId::UnitBuildPercentLeft,
        CobValueId::UnitAllied,
    ];

    /// Decode a value id pushed by a script.
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| *v as i32 == id)
    }

    /// The id scripts use for this value.
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Whether `SET_VALUE` accepts this id.
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            CobValueId::Activation
                | CobValueId::StandingMoveOrders
                | CobValueId::StandingFireOrders
                | CobValueId::InBuildStance
                | CobValueId::Busy
                | CobValueId::YardOpen
                | CobValueId::BuggerOff
                | CobValueId::Armored
        )
    }
}

impl fmt::Display for CobValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.id())
    }
}
