//! Strongly-typed identifiers and the [`GameTime`] tick counter.
//!
//! Identifiers are opaque handles allocated monotonically by the
//! simulation. They are stable for an entity's lifetime and never reused,
//! so ordering by identifier is a stable, replica-independent iteration
//! order.

use std::fmt;
use std::ops::{Add, Sub};

/// Identifies a unit within a simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for UnitId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a player.
///
/// `PlayerId(n)` is the n-th player added to the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlayerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a map feature (trees, rocks, wreckage).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(pub u32);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FeatureId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(pub u32);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProjectileId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing simulation tick counter.
///
/// Incremented once per call to the tick driver. Durations measured in
/// ticks (sleeps, projectile lifetimes) are also expressed as `GameTime`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameTime(pub u32);

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for GameTime {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl Add for GameTime {
    type Output = GameTime;

    fn add(self, rhs: GameTime) -> GameTime {
        GameTime(self.0.saturating_add(rhs.0))
    }
}

impl Sub for GameTime {
    type Output = GameTime;

    fn sub(self, rhs: GameTime) -> GameTime {
        GameTime(self.0.saturating_sub(rhs.0))
    }
}
