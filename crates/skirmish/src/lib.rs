//! Skirmish: a deterministic lockstep gameplay core for real-time
//! strategy engines.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Skirmish sub-crates. For most users, adding `skirmish` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use skirmish::prelude::*;
//!
//! let config = SimConfig::flat(33, 33, 7).unwrap();
//! let mut sim = GameSimulation::new(config).unwrap();
//! let a = sim.add_player(GamePlayerInfo::new(GamePlayerType::Human, "ARM", 0));
//! sim.add_player(GamePlayerInfo::new(GamePlayerType::Computer, "CORE", 1));
//!
//! sim.tick();
//! assert_eq!(sim.game_time(), GameTime(1));
//! assert_eq!(sim.compute_win_status(), WinStatus::Undecided);
//! sim.player_mut(PlayerId(1)).unwrap().status = GamePlayerStatus::Dead;
//! assert_eq!(sim.compute_win_status(), WinStatus::Won(a));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `skirmish-core` | IDs, fixed-point numerics, the `CobHost` trait |
//! | [`space`] | `skirmish-space` | Grids, rectangles, occupancy and yard maps |
//! | [`cob`] | `skirmish-cob` | The unit script interpreter |
//! | [`hash`] | `skirmish-hash` | State fingerprints and desync detection |
//! | [`sim`] | `skirmish-sim` | The authoritative world state and tick driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, numerics and the script host trait (`skirmish-core`).
pub use skirmish_core as types;

/// Grids, rectangles and occupancy cells (`skirmish-space`).
pub use skirmish_space as space;

/// The unit script interpreter (`skirmish-cob`).
///
/// Threads are resumed with [`cob::CobExecutionContext::execute`], which
/// reports why they stopped as a [`cob::CobStatus`].
pub use skirmish_cob as cob;

/// State fingerprints (`skirmish-hash`).
///
/// Record per-tick fingerprints in a [`hash::HashLog`] and compare peers
/// with [`hash::first_divergence`].
pub use skirmish_hash as hash;

/// The simulation (`skirmish-sim`).
pub use skirmish_sim as sim;

/// Common imports for typical Skirmish usage.
///
/// ```rust
/// use skirmish::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use skirmish_core::{
        Axis, CobHost, FeatureId, GameTime, PlayerId, ProjectileId, SimAngle, SimScalar,
        SimVector, UnitId,
    };

    // Space
    pub use skirmish_space::{DiscreteRect, Grid, OccupiedType};

    // Scripts
    pub use skirmish_cob::{CobEnvironment, CobScript, CobStatus, ScriptError};

    // Fingerprints
    pub use skirmish_hash::{first_divergence, ComputeHash, GameHash, HashLog};

    // Simulation
    pub use skirmish_sim::{
        ConfigError, GameDefinitions, GameEvent, GamePlayerInfo, GamePlayerStatus,
        GamePlayerType, GameSimulation, MapTerrain, SimConfig, SimError, UnitDefinition,
        WinStatus,
    };
}
