//! Players and their resource ledgers.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use skirmish_core::SimScalar;

macro_rules! resource {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub SimScalar);

        impl $name {
            /// No resource.
            pub const ZERO: $name = $name(SimScalar::ZERO);

            /// A whole amount.
            pub const fn from_int(v: i32) -> Self {
                Self(SimScalar::from_int(v))
            }

            /// True for a consumption delta.
            pub fn is_negative(self) -> bool {
                self.0 < SimScalar::ZERO
            }
        }

        impl Add for $name {
            type Output = $name;

            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = $name;

            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: $name) {
                self.0 -= rhs.0;
            }
        }

        impl Neg for $name {
            type Output = $name;

            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

resource!(
    /// An amount of energy. Positive deltas produce, negative ones consume.
    Energy
);
resource!(
    /// An amount of metal. Positive deltas produce, negative ones consume.
    Metal
);

/// Who controls a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePlayerType {
    /// A person.
    Human,
    /// The AI.
    Computer,
}

/// Whether a player is still in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePlayerStatus {
    /// Still playing.
    Alive,
    /// Eliminated.
    Dead,
}

/// A player and its resource ledger.
///
/// Each tick, units report resource deltas through
/// [`add_resource_delta`](Self::add_resource_delta). Consumption is
/// recorded as *desired* whether or not it is granted, and granted only
/// while the player is not stalled on that resource. Committing the
/// buffers into the stockpile happens outside the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GamePlayerInfo {
    /// Display name.
    pub name: Option<String>,
    /// Human or computer.
    pub player_type: GamePlayerType,
    /// Team colour index.
    pub color: u8,
    /// Alive or eliminated.
    pub status: GamePlayerStatus,
    /// Faction.
    pub side: String,

    /// Stored metal.
    pub metal: Metal,
    /// Metal storage capacity.
    pub max_metal: Metal,
    /// Stored energy.
    pub energy: Energy,
    /// Energy storage capacity.
    pub max_energy: Energy,

    /// Metal requests are refused this tick.
    pub metal_stalled: bool,
    /// Energy requests are refused this tick.
    pub energy_stalled: bool,

    /// Metal units asked to consume this tick.
    pub desired_metal_consumption_buffer: Metal,
    /// Energy units asked to consume this tick.
    pub desired_energy_consumption_buffer: Energy,
    /// Metal desired in the previous accounting period.
    pub previous_desired_metal_consumption_buffer: Metal,
    /// Energy desired in the previous accounting period.
    pub previous_desired_energy_consumption_buffer: Energy,
    /// Metal actually granted this tick.
    pub actual_metal_consumption_buffer: Metal,
    /// Energy actually granted this tick.
    pub actual_energy_consumption_buffer: Energy,
    /// Metal produced this tick.
    pub metal_production_buffer: Metal,
    /// Energy produced this tick.
    pub energy_production_buffer: Energy,
}

impl GamePlayerInfo {
    /// A living player with empty storage and buffers.
    pub fn new(player_type: GamePlayerType, side: impl Into<String>, color: u8) -> Self {
        Self {
            name: None,
            player_type,
            color,
            status: GamePlayerStatus::Alive,
            side: side.into(),
            metal: Metal::ZERO,
            max_metal: Metal::ZERO,
            energy: Energy::ZERO,
            max_energy: Energy::ZERO,
            metal_stalled: false,
            energy_stalled: false,
            desired_metal_consumption_buffer: Metal::ZERO,
            desired_energy_consumption_buffer: Energy::ZERO,
            previous_desired_metal_consumption_buffer: Metal::ZERO,
            previous_desired_energy_consumption_buffer: Energy::ZERO,
            actual_metal_consumption_buffer: Metal::ZERO,
            actual_energy_consumption_buffer: Energy::ZERO,
            metal_production_buffer: Metal::ZERO,
            energy_production_buffer: Energy::ZERO,
        }
    }

    /// Record a unit's resource deltas.
    ///
    /// The `apparent` deltas are what the unit asked for and decide
    /// whether the request is granted; the `actual` deltas are what gets
    /// booked if it is. Returns `false` (booking nothing) if either
    /// apparent delta consumes a resource the player is stalled on.
    pub fn add_resource_delta(
        &mut self,
        apparent_energy: Energy,
        apparent_metal: Metal,
        actual_energy: Energy,
        actual_metal: Metal,
    ) -> bool {
        // A refused energy request leaves the metal desire unrecorded.
        if !(self.record_energy_desire(apparent_energy) && self.record_metal_desire(apparent_metal))
        {
            return false;
        }
        self.accept_energy(actual_energy);
        self.accept_metal(actual_metal);
        true
    }

    fn record_energy_desire(&mut self, energy: Energy) -> bool {
        if !energy.is_negative() {
            return true;
        }
        self.desired_energy_consumption_buffer -= energy;
        !self.energy_stalled
    }

    fn record_metal_desire(&mut self, metal: Metal) -> bool {
        if !metal.is_negative() {
            return true;
        }
        self.desired_metal_consumption_buffer -= metal;
        !self.metal_stalled
    }

    fn accept_energy(&mut self, energy: Energy) {
        if energy.is_negative() {
            self.actual_energy_consumption_buffer -= energy;
        } else {
            self.energy_production_buffer += energy;
        }
    }

    fn accept_metal(&mut self, metal: Metal) {
        if metal.is_negative() {
            self.actual_metal_consumption_buffer -= metal;
        } else {
            self.metal_production_buffer += metal;
        }
    }

    /// Start a new accounting period: remember this period's desired
    /// consumption and clear every buffer.
    pub fn reset_buffers(&mut self) {
        self.previous_desired_energy_consumption_buffer = self.desired_energy_consumption_buffer;
        self.previous_desired_metal_consumption_buffer = self.desired_metal_consumption_buffer;
        self.desired_energy_consumption_buffer = Energy::ZERO;
        self.desired_metal_consumption_buffer = Metal::ZERO;
        self.actual_energy_consumption_buffer = Energy::ZERO;
        self.actual_metal_consumption_buffer = Metal::ZERO;
        self.energy_production_buffer = Energy::ZERO;
        self.metal_production_buffer = Metal::ZERO;
    }

    /// True while the player is in the game.
    pub fn is_alive(&self) -> bool {
        self.status == GamePlayerStatus::Alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> GamePlayerInfo {
        GamePlayerInfo::new(GamePlayerType::Human, "ARM", 0)
    }

    #[test]
    fn production_is_always_accepted() {
        let mut p = player();
        p.energy_stalled = true;
        assert!(p.add_resource_delta(
            Energy::from_int(5),
            Metal::from_int(2),
            Energy::from_int(5),
            Metal::from_int(2)
        ));
        assert_eq!(p.energy_production_buffer, Energy::from_int(5));
        assert_eq!(p.metal_production_buffer, Metal::from_int(2));
        assert_eq!(p.desired_energy_consumption_buffer, Energy::ZERO);
    }

    #[test]
    fn consumption_is_recorded_then_accepted() {
        let mut p = player();
        assert!(p.add_resource_delta(
            Energy::from_int(-3),
            Metal::ZERO,
            Energy::from_int(-3),
            Metal::ZERO
        ));
        assert_eq!(p.desired_energy_consumption_buffer, Energy::from_int(3));
        assert_eq!(p.actual_energy_consumption_buffer, Energy::from_int(3));
    }

    #[test]
    fn stalled_request_is_desired_but_not_booked() {
        let mut p = player();
        p.metal_stalled = true;
        assert!(!p.add_resource_delta(
            Energy::from_int(-1),
            Metal::from_int(-4),
            Energy::from_int(-1),
            Metal::from_int(-4)
        ));
        assert_eq!(p.desired_metal_consumption_buffer, Metal::from_int(4));
        assert_eq!(p.desired_energy_consumption_buffer, Energy::from_int(1));
        assert_eq!(p.actual_metal_consumption_buffer, Metal::ZERO);
        assert_eq!(p.actual_energy_consumption_buffer, Energy::ZERO);
    }

    #[test]
    fn reset_rolls_desire_into_previous() {
        let mut p = player();
        p.add_resource_delta(
            Energy::from_int(-2),
            Metal::ZERO,
            Energy::from_int(-2),
            Metal::ZERO,
        );
        p.reset_buffers();
        assert_eq!(p.previous_desired_energy_consumption_buffer, Energy::from_int(2));
        assert_eq!(p.desired_energy_consumption_buffer, Energy::ZERO);
        assert_eq!(p.actual_energy_consumption_buffer, Energy::ZERO);
    }
}
