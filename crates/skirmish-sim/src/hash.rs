//! Fingerprints of simulation state.
//!
//! Field lists are fixed: adding a field to a hashed type changes every
//! replica's fingerprint, so peers must agree on them.

use skirmish_hash::{combine_hashes, hash_unordered, ComputeHash, GameHash};

use crate::player::{Energy, GamePlayerInfo, GamePlayerStatus, GamePlayerType, Metal};
use crate::projectile::Projectile;
use crate::simulation::GameSimulation;
use crate::unit::{LifeState, UnitState};

impl ComputeHash for Energy {
    fn compute_hash(&self) -> GameHash {
        self.0.compute_hash()
    }
}

impl ComputeHash for Metal {
    fn compute_hash(&self) -> GameHash {
        self.0.compute_hash()
    }
}

impl ComputeHash for GamePlayerType {
    fn compute_hash(&self) -> GameHash {
        match self {
            GamePlayerType::Human => GameHash(0),
            GamePlayerType::Computer => GameHash(1),
        }
    }
}

impl ComputeHash for GamePlayerStatus {
    fn compute_hash(&self) -> GameHash {
        match self {
            GamePlayerStatus::Alive => GameHash(0),
            GamePlayerStatus::Dead => GameHash(1),
        }
    }
}

impl ComputeHash for LifeState {
    // Dead units never survive a tick, so only the living are hashed.
    fn compute_hash(&self) -> GameHash {
        GameHash::ZERO
    }
}

impl ComputeHash for GamePlayerInfo {
    fn compute_hash(&self) -> GameHash {
        combine_hashes!(
            self.player_type,
            self.color,
            self.status,
            self.side,
            self.metal,
            self.max_metal,
            self.energy,
            self.max_energy,
            self.metal_stalled,
            self.energy_stalled,
            self.desired_metal_consumption_buffer,
            self.desired_energy_consumption_buffer,
            self.previous_desired_metal_consumption_buffer,
            self.previous_desired_energy_consumption_buffer,
            self.actual_metal_consumption_buffer,
            self.actual_energy_consumption_buffer,
            self.metal_production_buffer,
            self.energy_production_buffer,
        )
    }
}

impl ComputeHash for UnitState {
    fn compute_hash(&self) -> GameHash {
        combine_hashes!(
            self.unit_type,
            self.position,
            self.owner,
            self.rotation,
            self.hit_points,
            self.life_state,
            self.in_build_stance,
            self.yard_open,
            self.fire_orders,
            self.activated,
            self.energy_production_buffer,
            self.metal_production_buffer,
            self.previous_energy_consumption_buffer,
            self.previous_metal_consumption_buffer,
            self.energy_consumption_buffer,
            self.metal_consumption_buffer,
        )
    }
}

impl ComputeHash for Projectile {
    fn compute_hash(&self) -> GameHash {
        combine_hashes!(
            self.owner,
            self.position,
            self.origin,
            self.velocity,
            self.damage_radius,
            hash_unordered(self.damage.values()),
        )
    }
}

impl ComputeHash for GameSimulation {
    fn compute_hash(&self) -> GameHash {
        combine_hashes!(
            self.game_time,
            self.players,
            hash_unordered(self.units.values()),
            hash_unordered(self.projectiles.values()),
        )
    }
}

impl GameSimulation {
    /// Fingerprint of the current world state.
    ///
    /// Replicas that have applied the same commands from the same seed
    /// report the same value after every tick.
    pub fn compute_hash(&self) -> GameHash {
        ComputeHash::compute_hash(self)
    }
}
