//! Authoritative lockstep world state for Skirmish.
//!
//! [`GameSimulation`] holds units, features, projectiles, players, the
//! occupancy and metal grids, the path request queue and the seeded
//! random generator. Every replica that starts from the same
//! [`SimConfig`] and applies the same commands reaches the same state on
//! every tick, which [`GameSimulation::compute_hash`] lets peers verify.
//!
//! Unit scripts run through [`SimScriptHost`], the simulation's
//! implementation of [`CobHost`](skirmish_core::CobHost).
//! [`GameSimulation::tick`] resumes them in unit id order, advances piece
//! animation and projectiles, and sweeps dead units.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod definitions;
pub mod error;
pub mod event;
pub mod feature;
pub mod hash;
pub mod order;
pub mod piece;
pub mod player;
pub mod projectile;
pub mod scene;
pub mod script;
pub mod simulation;
pub mod terrain;
pub mod unit;

pub use config::{ConfigError, SimConfig};
pub use definitions::{
    FeatureDefinition, GameDefinitions, MovementClass, MovementCollisionInfo, PieceDefinition,
    ProjectilePhysicsType, UnitDefinition, UnitModelDefinition, WeaponDefinition,
};
pub use error::SimError;
pub use event::GameEvent;
pub use feature::MapFeature;
pub use order::UnitOrder;
pub use piece::{PieceMoveOperation, PieceTurnOperation, UnitPiece};
pub use player::{Energy, GamePlayerInfo, GamePlayerStatus, GamePlayerType, Metal};
pub use projectile::{Projectile, GRAVITY_PER_TICK};
pub use script::SimScriptHost;
pub use simulation::{GameSimulation, PathRequest, WinStatus};
pub use terrain::MapTerrain;
pub use unit::{LifeState, UnitState, UnitWeapon, FIRE_AT_WILL, MANEUVER};
