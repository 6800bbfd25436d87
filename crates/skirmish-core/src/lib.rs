//! Core types and traits for the Skirmish simulation core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the whole workspace: entity
//! identifiers, the tick counter, deterministic fixed-point numerics,
//! and the [`CobHost`] trait through which the script interpreter reads
//! and mutates simulation state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod axis;
pub mod fixed;
pub mod id;
pub mod math;
pub mod traits;

pub use axis::Axis;
pub use fixed::{SimAngle, SimScalar, SimVector};
pub use id::{FeatureId, GameTime, PlayerId, ProjectileId, UnitId};
pub use traits::{CobHost, PieceEffect, UnitView};

/// Number of simulation ticks per second of game time.
///
/// All per-second quantities coming from scripts (speeds, sleep
/// durations) are converted to per-tick quantities with this constant.
pub const SIM_TICKS_PER_SECOND: u32 = 30;

/// Milliseconds of game time covered by one tick, rounded down.
pub const MILLISECONDS_PER_TICK: u32 = 1000 / SIM_TICKS_PER_SECOND;
