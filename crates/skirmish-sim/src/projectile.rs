//! Projectiles in flight.

use indexmap::IndexMap;
use skirmish_core::{GameTime, PlayerId, SimScalar, SimVector};

/// Downward acceleration on ballistic projectiles, world units per tick
/// squared (112 units per second squared).
pub const GRAVITY_PER_TICK: SimScalar = SimScalar::from_raw(8155);

/// A projectile fired by a weapon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projectile {
    /// Weapon type that fired it, upper-cased.
    pub weapon_type: String,
    /// Player credited with its damage.
    pub owner: PlayerId,
    /// Current position.
    pub position: SimVector,
    /// Position at the start of the tick.
    pub previous_position: SimVector,
    /// Where it was fired from.
    pub origin: SimVector,
    /// Displacement per tick.
    pub velocity: SimVector,
    /// Falls under gravity.
    pub gravity: bool,
    /// Damage per target category.
    pub damage: IndexMap<String, u32>,
    /// Area-of-effect radius.
    pub damage_radius: SimScalar,
    /// Tick it was fired on.
    pub created_at: GameTime,
    /// Tick it expires on, if it has a fixed lifetime.
    pub die_on_frame: Option<GameTime>,
    /// Bounces off the ground instead of detonating.
    pub ground_bounce: bool,
    /// Tick it last emitted a smoke trail.
    pub last_smoke: GameTime,
}

impl Projectile {
    /// Move one tick along the current velocity.
    pub fn advance(&mut self) {
        self.previous_position = self.position;
        self.position = self.position + self.velocity;
        if self.gravity {
            self.velocity.y -= GRAVITY_PER_TICK;
        }
    }

    /// True once the projectile's lifetime has run out at `now`.
    pub fn is_expired(&self, now: GameTime) -> bool {
        matches!(self.die_on_frame, Some(t) if now >= t)
    }

    /// Damage against `category`, or the `DEFAULT` entry if it has none.
    pub fn get_damage(&self, category: &str) -> u32 {
        self.damage
            .get(category)
            .or_else(|| self.damage.get("DEFAULT"))
            .copied()
            .unwrap_or(0)
    }
}
