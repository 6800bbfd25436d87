//! Simulation configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for constructing a
//! [`GameSimulation`](crate::GameSimulation).
//! [`validate()`](SimConfig::validate) checks that the terrain can carry
//! an occupancy grid and that every registered unit type can actually be
//! instantiated, so spawn-time lookups cannot fail on missing data.

use std::error::Error;
use std::fmt;

use skirmish_core::SimScalar;

use crate::definitions::GameDefinitions;
use crate::error::SimError;
use crate::terrain::MapTerrain;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The heightmap needs at least 2×2 samples to span one cell.
    TerrainTooSmall {
        /// Heightmap width in samples.
        width: u32,
        /// Heightmap height in samples.
        height: u32,
    },
    /// A unit type names a model that is not registered.
    MissingModel {
        /// The unit type.
        unit_type: String,
        /// The model it names.
        model: String,
    },
    /// A unit type has no compiled script.
    MissingScript {
        /// The unit type.
        unit_type: String,
    },
    /// A unit type's movement class cannot be resolved.
    Definition(SimError),
    /// A building has no yard map.
    MissingYardMap {
        /// The unit type.
        unit_type: String,
    },
    /// A building's yard map does not match its footprint.
    YardMapSizeMismatch {
        /// The unit type.
        unit_type: String,
        /// Footprint in cells.
        footprint: (u32, u32),
        /// Yard map dimensions.
        yard_map: (u32, u32),
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerrainTooSmall { width, height } => {
                write!(f, "terrain {width}x{height} is smaller than 2x2 samples")
            }
            Self::MissingModel { unit_type, model } => {
                write!(f, "unit type `{unit_type}` uses unknown model `{model}`")
            }
            Self::MissingScript { unit_type } => {
                write!(f, "unit type `{unit_type}` has no script")
            }
            Self::Definition(e) => write!(f, "definition: {e}"),
            Self::MissingYardMap { unit_type } => {
                write!(f, "building type `{unit_type}` has no yard map")
            }
            Self::YardMapSizeMismatch {
                unit_type,
                footprint,
                yard_map,
            } => write!(
                f,
                "building type `{unit_type}` has a {}x{} yard map for a {}x{} footprint",
                yard_map.0, yard_map.1, footprint.0, footprint.1
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Definition(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SimError> for ConfigError {
    fn from(e: SimError) -> Self {
        Self::Definition(e)
    }
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for constructing a simulation.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Map heightmap and sea level.
    pub terrain: MapTerrain,
    /// Unit, model, script, weapon and movement-class registries.
    pub definitions: GameDefinitions,
    /// Seed for the simulation's random generator. Replicas that must
    /// stay in lockstep share it.
    pub seed: u64,
    /// Metal in every map cell before metal features are placed.
    pub surface_metal: u8,
}

impl SimConfig {
    /// A configuration with empty registries on `terrain`.
    pub fn new(terrain: MapTerrain, seed: u64) -> Self {
        Self {
            terrain,
            definitions: GameDefinitions::new(),
            seed,
            surface_metal: 0,
        }
    }

    /// A flat, dry `width × height` sample map.
    pub fn flat(width: u32, height: u32, seed: u64) -> Result<Self, ConfigError> {
        let terrain = MapTerrain::flat(width, height, SimScalar::ZERO, SimScalar::ZERO)
            .map_err(|_| ConfigError::TerrainTooSmall { width, height })?;
        Ok(Self::new(terrain, seed))
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. The occupancy grid is one smaller than the heightmap.
        let heights = self.terrain.height_map();
        if heights.width() < 2 || heights.height() < 2 {
            return Err(ConfigError::TerrainTooSmall {
                width: heights.width(),
                height: heights.height(),
            });
        }

        for unit in self.definitions.units() {
            let unit_type = unit.name.to_uppercase();
            // 2. Models and scripts are looked up on every spawn.
            if self.definitions.model(&unit.object_name).is_err() {
                return Err(ConfigError::MissingModel {
                    unit_type,
                    model: unit.object_name.clone(),
                });
            }
            if self.definitions.script(&unit.name).is_err() {
                return Err(ConfigError::MissingScript { unit_type });
            }
            // 3. Footprints must resolve.
            let footprint = self
                .definitions
                .footprint_xz(&unit.movement_collision_info)?;
            // 4. Buildings stamp a yard map exactly over their footprint.
            if !unit.is_mobile {
                let yard_map = unit
                    .yard_map
                    .as_ref()
                    .ok_or_else(|| ConfigError::MissingYardMap {
                        unit_type: unit_type.clone(),
                    })?;
                let dims = (yard_map.width(), yard_map.height());
                if dims != footprint {
                    return Err(ConfigError::YardMapSizeMismatch {
                        unit_type,
                        footprint,
                        yard_map: dims,
                    });
                }
            }
        }

        Ok(())
    }
}
