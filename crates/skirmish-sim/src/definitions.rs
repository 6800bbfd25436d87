//! Static game data: unit, model, weapon, movement-class and feature
//! definitions.
//!
//! Definitions are produced by an external loader and registered in a
//! [`GameDefinitions`] before the simulation starts. Names are
//! case-insensitive; registries store and look them up upper-cased.

use std::sync::Arc;

use indexmap::IndexMap;
use skirmish_cob::CobScript;
use skirmish_core::{GameTime, SimScalar, SimVector};
use skirmish_space::{Grid, YardMapCell};

use crate::error::SimError;

/// Terrain constraints for a class of mobile units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovementClass {
    /// Registry name; empty for ad-hoc classes.
    pub name: String,
    /// Footprint width in cells.
    pub footprint_x: u32,
    /// Footprint depth in cells.
    pub footprint_z: u32,
    /// Minimum water depth the unit can stand in.
    pub min_water_depth: i32,
    /// Maximum water depth the unit can stand in.
    pub max_water_depth: i32,
    /// Maximum terrain slope on land, as a height difference across one cell.
    pub max_slope: i32,
    /// Maximum terrain slope under water.
    pub max_water_slope: i32,
}

/// Where a unit's footprint and terrain constraints come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MovementCollisionInfo {
    /// Defined inline on the unit.
    AdHoc(MovementClass),
    /// A registered movement class, by name.
    Named(String),
}

/// A unit type.
#[derive(Clone, Debug)]
pub struct UnitDefinition {
    /// Unit type name.
    pub name: String,
    /// Name of the model the unit uses.
    pub object_name: String,
    /// Mobile units occupy cells wholesale; immobile ones stamp a yard map.
    pub is_mobile: bool,
    /// Floats on water.
    pub floater: bool,
    /// Hovers over water.
    pub can_hover: bool,
    /// Maximum (and initial) hit points.
    pub max_hit_points: u32,
    /// Footprint and terrain constraints.
    pub movement_collision_info: MovementCollisionInfo,
    /// Per-cell passability of a building. Required for immobile units.
    pub yard_map: Option<Grid<YardMapCell>>,
    /// Weapon types for the three weapon slots.
    pub weapons: [Option<String>; 3],
}

/// One piece of a unit model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceDefinition {
    /// Piece name, as referenced by scripts.
    pub name: String,
    /// Offset from the parent piece (or the unit origin).
    pub origin: SimVector,
    /// Parent piece, if any.
    pub parent: Option<String>,
}

/// A unit model: a hierarchy of named pieces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitModelDefinition {
    /// Height of the model above its origin.
    pub height: SimScalar,
    /// Pieces; parents may appear in any order.
    pub pieces: Vec<PieceDefinition>,
}

/// How a projectile moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectilePhysicsType {
    /// Straight line; expires once it has covered the target distance.
    LineOfSight,
    /// Falls under gravity.
    Ballistic,
}

/// A weapon type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaponDefinition {
    /// Projectile physics.
    pub physics_type: ProjectilePhysicsType,
    /// Projectile speed, world units per tick.
    pub velocity: SimScalar,
    /// Damage per target category.
    pub damage: IndexMap<String, u32>,
    /// Area-of-effect radius.
    pub damage_radius: SimScalar,
    /// Fixed projectile lifetime, if any.
    pub weapon_timer: Option<GameTime>,
    /// Random spread applied around `weapon_timer`.
    pub random_decay: GameTime,
    /// Whether projectiles bounce off the ground.
    pub ground_bounce: bool,
}

/// A map feature type (rocks, trees, wreckage, metal patches).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureDefinition {
    /// Footprint width in cells.
    pub footprint_x: u32,
    /// Footprint depth in cells.
    pub footprint_z: u32,
    /// Blocks movement.
    pub blocking: bool,
    /// Cannot be destroyed.
    pub indestructible: bool,
    /// Metal per cell; zero for none.
    pub metal: u8,
}

/// Every definition the simulation consults, keyed by upper-cased name.
#[derive(Clone, Debug, Default)]
pub struct GameDefinitions {
    units: IndexMap<String, UnitDefinition>,
    models: IndexMap<String, UnitModelDefinition>,
    scripts: IndexMap<String, Arc<CobScript>>,
    weapons: IndexMap<String, WeaponDefinition>,
    movement_classes: IndexMap<String, MovementClass>,
}

impl GameDefinitions {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit type under its own name.
    pub fn add_unit(&mut self, definition: UnitDefinition) {
        self.units.insert(definition.name.to_uppercase(), definition);
    }

    /// Register a model.
    pub fn add_model(&mut self, name: &str, definition: UnitModelDefinition) {
        self.models.insert(name.to_uppercase(), definition);
    }

    /// Register the compiled script for a unit type.
    pub fn add_script(&mut self, unit_type: &str, script: Arc<CobScript>) {
        self.scripts.insert(unit_type.to_uppercase(), script);
    }

    /// Register a weapon type.
    pub fn add_weapon(&mut self, name: &str, definition: WeaponDefinition) {
        self.weapons.insert(name.to_uppercase(), definition);
    }

    /// Register a movement class under its own name.
    pub fn add_movement_class(&mut self, class: MovementClass) {
        self.movement_classes.insert(class.name.to_uppercase(), class);
    }

    /// The unit type `name`.
    pub fn unit(&self, name: &str) -> Result<&UnitDefinition, SimError> {
        let key = name.to_uppercase();
        self.units
            .get(&key)
            .ok_or(SimError::UnknownUnitType { name: key })
    }

    /// The model `name`.
    pub fn model(&self, name: &str) -> Result<&UnitModelDefinition, SimError> {
        let key = name.to_uppercase();
        self.models
            .get(&key)
            .ok_or(SimError::UnknownModel { name: key })
    }

    /// The script of unit type `unit_type`.
    pub fn script(&self, unit_type: &str) -> Result<&Arc<CobScript>, SimError> {
        let key = unit_type.to_uppercase();
        self.scripts
            .get(&key)
            .ok_or(SimError::UnknownScript { name: key })
    }

    /// The weapon type `name`.
    pub fn weapon(&self, name: &str) -> Result<&WeaponDefinition, SimError> {
        let key = name.to_uppercase();
        self.weapons
            .get(&key)
            .ok_or(SimError::UnknownWeapon { name: key })
    }

    /// True if a weapon type `name` is registered.
    pub fn has_weapon(&self, name: &str) -> bool {
        self.weapons.contains_key(&name.to_uppercase())
    }

    /// Resolve a unit's movement class.
    pub fn movement_class(&self, info: &MovementCollisionInfo) -> Result<MovementClass, SimError> {
        match info {
            MovementCollisionInfo::AdHoc(class) => Ok(class.clone()),
            MovementCollisionInfo::Named(name) => self
                .movement_classes
                .get(&name.to_uppercase())
                .cloned()
                .ok_or_else(|| SimError::UnknownMovementClass { name: name.clone() }),
        }
    }

    /// Footprint width and depth in cells.
    pub fn footprint_xz(&self, info: &MovementCollisionInfo) -> Result<(u32, u32), SimError> {
        let class = self.movement_class(info)?;
        Ok((class.footprint_x, class.footprint_z))
    }

    /// All unit types, in registration order.
    pub fn units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.units.values()
    }
}
