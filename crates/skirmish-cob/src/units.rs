//! Script-side units and their conversion to simulation units.
//!
//! Scripts express positions in 16.16 world units, speeds per second and
//! angles in 65536-per-turn units. The simulation advances in ticks, so
//! every rate is divided by [`SIM_TICKS_PER_SECOND`] on the way in.

use skirmish_core::{SimAngle, SimScalar, MILLISECONDS_PER_TICK, SIM_TICKS_PER_SECOND};

/// A linear position or distance, 16.16 fixed point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CobPosition(pub i32);

impl CobPosition {
    /// As a world distance.
    pub fn to_world(self) -> SimScalar {
        SimScalar::from_raw(self.0)
    }

    /// From a world distance.
    pub fn from_world(v: SimScalar) -> Self {
        CobPosition(v.raw())
    }
}

/// A linear speed in 16.16 world units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CobSpeed(pub i32);

impl CobSpeed {
    /// World units per tick.
    pub fn per_tick(self) -> SimScalar {
        SimScalar::from_raw(self.0 / SIM_TICKS_PER_SECOND as i32)
    }
}

/// An angle, 65536 units per turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CobAngle(pub i32);

impl CobAngle {
    /// As a simulation angle. Only the low 16 bits matter.
    pub fn to_sim(self) -> SimAngle {
        SimAngle(self.0 as u16)
    }

    /// From a simulation angle.
    pub fn from_sim(angle: SimAngle) -> Self {
        CobAngle(angle.0 as i32)
    }
}

/// An angular speed in angle units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CobAngularSpeed(pub i32);

impl CobAngularSpeed {
    /// Angle units per tick.
    pub fn per_tick(self) -> i32 {
        self.0 / SIM_TICKS_PER_SECOND as i32
    }
}

/// A sleep duration in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CobSleepDuration(pub i32);

impl CobSleepDuration {
    /// Whole ticks to sleep. Negative durations sleep for zero ticks.
    pub fn to_ticks(self) -> u32 {
        self.0.max(0) as u32 / MILLISECONDS_PER_TICK
    }
}

/// Pack world X and Z into one script integer.
///
/// The whole parts are kept: X in the high 16 bits, Z in the low 16.
pub fn pack_coords(x: SimScalar, z: SimScalar) -> i32 {
    (x.to_int() << 16) | (z.to_int() & 0xffff)
}

/// Inverse of [`pack_coords`]. Both halves are sign-extended.
pub fn unpack_coords(packed: i32) -> (SimScalar, SimScalar) {
    (
        SimScalar::from_int(packed >> 16),
        SimScalar::from_int(packed as i16 as i32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_signed_coordinates() {
        let packed = pack_coords(SimScalar::from_int(-3), SimScalar::from_int(-7));
        assert_eq!(
            unpack_coords(packed),
            (SimScalar::from_int(-3), SimScalar::from_int(-7))
        );
        assert_eq!(
            pack_coords(SimScalar::from_int(1), SimScalar::from_int(2)),
            (1 << 16) | 2
        );
    }

    #[test]
    fn fractional_parts_are_dropped() {
        let packed = pack_coords(SimScalar::from_ratio(5, 2), SimScalar::from_ratio(7, 2));
        assert_eq!(
            unpack_coords(packed),
            (SimScalar::from_int(2), SimScalar::from_int(3))
        );
    }

    #[test]
    fn rates_convert_per_tick() {
        assert_eq!(CobSpeed(30 << 16).per_tick(), SimScalar::ONE);
        assert_eq!(CobAngularSpeed(300).per_tick(), 10);
        assert_eq!(CobSleepDuration(1000).to_ticks(), 30);
        assert_eq!(CobSleepDuration(32).to_ticks(), 0);
        assert_eq!(CobSleepDuration(-50).to_ticks(), 0);
    }

    #[test]
    fn angles_keep_low_bits() {
        assert_eq!(CobAngle(65536 + 5).to_sim(), SimAngle(5));
        assert_eq!(CobAngle(-16384).to_sim(), SimAngle(49152));
        assert_eq!(CobAngle::from_sim(SimAngle::HALF_TURN), CobAngle(32768));
        assert_eq!(
            CobPosition::from_world(SimScalar::ONE).to_world(),
            SimScalar::ONE
        );
    }
}
