//! The authoritative world state and its spatial and economic rules.
//!
//! [`GameSimulation`] owns everything that must stay identical across
//! replicas: units, features, projectiles, players, the occupancy and
//! metal grids, the path request queue and the random generator.
//! Placement and collision decisions all read and write the single
//! occupancy grid held here, so they always see a consistent world.
//!
//! Piece animation and scene-facing setters live in [`scene`](crate::scene),
//! the script driver in [`script`](crate::script), and fingerprinting in
//! [`hash`](crate::hash).

use std::collections::{BTreeMap, VecDeque};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_cob::CobEnvironment;
use skirmish_core::{
    FeatureId, GameTime, PlayerId, ProjectileId, SimAngle, SimScalar, SimVector, UnitId,
};
use skirmish_space::{
    BuildingOccupiedCell, DiscreteRect, Grid, GridRegion, OccupiedCell, OccupiedType,
    YardMapCell,
};

use crate::config::{ConfigError, SimConfig};
use crate::definitions::{
    FeatureDefinition, GameDefinitions, MovementClass, MovementCollisionInfo,
    ProjectilePhysicsType,
};
use crate::error::SimError;
use crate::event::GameEvent;
use crate::feature::MapFeature;
use crate::order::UnitOrder;
use crate::piece::UnitPiece;
use crate::player::{Energy, GamePlayerInfo, GamePlayerStatus, Metal};
use crate::projectile::Projectile;
use crate::terrain::MapTerrain;
use crate::unit::{UnitState, UnitWeapon};

/// A unit waiting for the pathfinder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathRequest {
    /// The unit that wants a path.
    pub unit_id: UnitId,
}

/// Outcome of the game so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinStatus {
    /// Exactly one player is alive.
    Won(PlayerId),
    /// Nobody is alive.
    Draw,
    /// Two or more players are alive.
    Undecided,
}

/// The authoritative, deterministic world state.
///
/// Entity ids are allocated monotonically and never reused; unit ids
/// start at 1. Entities live in [`BTreeMap`]s so every replica iterates
/// them in id order.
#[derive(Clone, Debug)]
pub struct GameSimulation {
    pub(crate) game_time: GameTime,
    pub(crate) terrain: MapTerrain,
    pub(crate) definitions: GameDefinitions,
    pub(crate) occupied_grid: Grid<OccupiedCell>,
    pub(crate) metal_grid: Grid<u8>,
    pub(crate) players: Vec<GamePlayerInfo>,
    pub(crate) units: BTreeMap<UnitId, UnitState>,
    pub(crate) next_unit_id: u32,
    pub(crate) features: BTreeMap<FeatureId, MapFeature>,
    pub(crate) next_feature_id: u32,
    pub(crate) projectiles: BTreeMap<ProjectileId, Projectile>,
    pub(crate) next_projectile_id: u32,
    pub(crate) path_requests: VecDeque<PathRequest>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) events: Vec<GameEvent>,
}

impl GameSimulation {
    /// Build an empty world from a validated configuration.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let SimConfig {
            terrain,
            definitions,
            seed,
            surface_metal,
        } = config;

        let heights = terrain.height_map();
        let (width, height) = (heights.width() - 1, heights.height() - 1);
        let too_small = |_| ConfigError::TerrainTooSmall {
            width: width + 1,
            height: height + 1,
        };
        let occupied_grid = Grid::new(width, height, OccupiedCell::default()).map_err(too_small)?;
        let metal_grid = Grid::new(width, height, surface_metal).map_err(too_small)?;

        log::info!("simulation created: {width}x{height} cells, seed {seed}");

        Ok(Self {
            game_time: GameTime(0),
            terrain,
            definitions,
            occupied_grid,
            metal_grid,
            players: Vec::new(),
            units: BTreeMap::new(),
            next_unit_id: 1,
            features: BTreeMap::new(),
            next_feature_id: 0,
            projectiles: BTreeMap::new(),
            next_projectile_id: 0,
            path_requests: VecDeque::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The current tick.
    pub fn game_time(&self) -> GameTime {
        self.game_time
    }

    /// The map terrain.
    pub fn terrain(&self) -> &MapTerrain {
        &self.terrain
    }

    /// The definition registries.
    pub fn definitions(&self) -> &GameDefinitions {
        &self.definitions
    }

    /// Per-cell occupants and building claims.
    pub fn occupied_grid(&self) -> &Grid<OccupiedCell> {
        &self.occupied_grid
    }

    /// Per-cell metal.
    pub fn metal_grid(&self) -> &Grid<u8> {
        &self.metal_grid
    }

    /// All players, indexed by [`PlayerId`].
    pub fn players(&self) -> &[GamePlayerInfo] {
        &self.players
    }

    /// The player `id`.
    pub fn player(&self, id: PlayerId) -> Result<&GamePlayerInfo, SimError> {
        self.players
            .get(id.0 as usize)
            .ok_or(SimError::UnknownPlayer { player: id })
    }

    /// The player `id`, mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut GamePlayerInfo, SimError> {
        self.players
            .get_mut(id.0 as usize)
            .ok_or(SimError::UnknownPlayer { player: id })
    }

    /// All units, in id order.
    pub fn units(&self) -> impl Iterator<Item = (UnitId, &UnitState)> {
        self.units.iter().map(|(id, u)| (*id, u))
    }

    /// The unit `id`.
    pub fn unit(&self, id: UnitId) -> Result<&UnitState, SimError> {
        self.units.get(&id).ok_or(SimError::UnknownUnit { unit: id })
    }

    /// The unit `id`, mutably.
    pub fn unit_mut(&mut self, id: UnitId) -> Result<&mut UnitState, SimError> {
        self.units
            .get_mut(&id)
            .ok_or(SimError::UnknownUnit { unit: id })
    }

    /// True if unit `id` is in the world (possibly dead, not yet swept).
    pub fn unit_exists(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    /// The feature `id`, if present.
    pub fn feature(&self, id: FeatureId) -> Option<&MapFeature> {
        self.features.get(&id)
    }

    /// All projectiles in flight, in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> {
        self.projectiles.iter().map(|(id, p)| (*id, p))
    }

    /// The projectile `id`, if still in flight.
    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    // ── Features and players ───────────────────────────────────────

    /// Place a feature.
    ///
    /// Blocking features claim their footprint, clipped to the map, and
    /// are refused (`None`) if anything already blocks it. Non-blocking
    /// indestructible features carrying metal stamp it into the metal
    /// grid.
    pub fn add_feature(
        &mut self,
        definition: &FeatureDefinition,
        feature: MapFeature,
    ) -> Option<FeatureId> {
        let rect = self.compute_footprint_region(
            feature.position,
            definition.footprint_x,
            definition.footprint_z,
        );
        let blocked_region = self.occupied_grid.clip_region(rect);
        if definition.blocking && self.is_collision_at_region(blocked_region) {
            log::debug!("feature {} at {} blocked", feature.feature_name, feature.position);
            return None;
        }

        let id = FeatureId(self.next_feature_id);
        self.next_feature_id += 1;
        if definition.blocking {
            self.occupied_grid.for_each_mut(blocked_region, |cell| {
                cell.occupied_type = OccupiedType::Feature(id);
            });
        }
        if !definition.blocking && definition.indestructible && definition.metal > 0 {
            let region = self.metal_grid.clip_region(rect);
            self.metal_grid.fill_region(region, definition.metal);
        }

        self.features.insert(id, feature);
        Some(id)
    }

    /// Add a player. Ids are assigned in insertion order from 0.
    pub fn add_player(&mut self, info: GamePlayerInfo) -> PlayerId {
        let id = PlayerId(self.players.len() as u32);
        self.players.push(info);
        id
    }

    // ── Units ──────────────────────────────────────────────────────

    /// Instantiate a unit of `unit_type` without placing it.
    ///
    /// Mobile units face away (a half turn) unless `rotation` is given,
    /// and their pieces are unshaded. Weapon slots naming unregistered
    /// weapons stay empty.
    pub fn create_unit(
        &self,
        unit_type: &str,
        owner: PlayerId,
        position: SimVector,
        rotation: Option<SimAngle>,
    ) -> Result<UnitState, SimError> {
        self.player(owner)?;
        let definition = self.definitions.unit(unit_type)?;
        let model = self.definitions.model(&definition.object_name)?;
        let script = self.definitions.script(unit_type)?;

        let pieces = model
            .pieces
            .iter()
            .map(|piece| {
                let parent = piece.parent.as_ref().and_then(|parent| {
                    model
                        .pieces
                        .iter()
                        .position(|p| p.name.eq_ignore_ascii_case(parent))
                });
                let mut unit_piece = UnitPiece::new(&piece.name, piece.origin, parent);
                unit_piece.shaded = !definition.is_mobile;
                unit_piece
            })
            .collect();

        let mut unit = UnitState::new(
            definition.name.to_uppercase(),
            owner,
            position,
            pieces,
            CobEnvironment::new(script.clone()),
        );
        unit.height = model.height;
        unit.hit_points = definition.max_hit_points;
        unit.max_hit_points = definition.max_hit_points;

        let rotation = match rotation {
            Some(r) => r,
            None if definition.is_mobile => SimAngle::HALF_TURN,
            None => SimAngle::ZERO,
        };
        unit.rotation = rotation;
        unit.previous_rotation = rotation;

        for (slot, weapon) in unit.weapons.iter_mut().zip(&definition.weapons) {
            *slot = weapon
                .as_deref()
                .filter(|name| !name.is_empty() && self.definitions.has_weapon(name))
                .map(|name| UnitWeapon {
                    weapon_type: name.to_uppercase(),
                });
        }

        Ok(unit)
    }

    /// Create and place a unit, then run its `Create` script.
    ///
    /// Floating and hovering units are lifted to sea level. Returns
    /// `Ok(None)` if the footprint is blocked.
    pub fn try_spawn_unit(
        &mut self,
        unit_type: &str,
        owner: PlayerId,
        position: SimVector,
        rotation: Option<SimAngle>,
    ) -> Result<Option<UnitId>, SimError> {
        let mut unit = self.create_unit(unit_type, owner, position, rotation)?;
        let definition = self.definitions.unit(unit_type)?;
        if definition.floater || definition.can_hover {
            unit.position.y = unit.position.y.max(self.terrain.sea_level());
            unit.previous_position.y = unit.position.y;
        }

        let Some(id) = self.try_add_unit(unit)? else {
            log::debug!("spawn of {unit_type} at {position} blocked");
            return Ok(None);
        };

        self.start_unit_script(id, "Create", [])?;
        self.events.push(GameEvent::UnitSpawned { unit_id: id });
        log::debug!("spawned {unit_type} as unit {id} for player {owner}");
        Ok(Some(id))
    }

    /// Place an instantiated unit if its footprint is clear.
    ///
    /// Mobile units claim every footprint cell as their own. Buildings
    /// stamp their yard map instead, so some cells stay passable.
    pub fn try_add_unit(&mut self, unit: UnitState) -> Result<Option<UnitId>, SimError> {
        let definition = self.definitions.unit(&unit.unit_type)?;
        let rect =
            self.compute_collision_footprint(unit.position, &definition.movement_collision_info)?;
        if self.is_collision_at(rect) {
            return Ok(None);
        }
        let Some(region) = self.occupied_grid.try_to_region(rect) else {
            return Ok(None);
        };
        let yard_map = if definition.is_mobile {
            None
        } else {
            Some(
                definition
                    .yard_map
                    .as_ref()
                    .ok_or_else(|| SimError::MissingYardMap {
                        unit_type: unit.unit_type.clone(),
                    })?,
            )
        };

        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        let open = unit.yard_open;
        self.units.insert(id, unit);

        match yard_map {
            None => self.occupied_grid.for_each_mut(region, |cell| {
                cell.occupied_type = OccupiedType::Unit(id);
            }),
            Some(yard_map) => {
                self.occupied_grid
                    .for_each2_mut(region.x, region.y, yard_map, |cell, yard_cell| {
                        cell.building_cell = Some(BuildingOccupiedCell {
                            unit: id,
                            passable: yard_cell.is_passable(open),
                        });
                    })
            }
        }

        Ok(Some(id))
    }

    /// Release every cell claimed by `unit` and drop it from the world.
    pub(crate) fn remove_unit(&mut self, id: UnitId) -> Option<UnitState> {
        let unit = self.units.remove(&id)?;
        self.occupied_grid
            .for_each_mut(self.occupied_grid.full_region(), |cell| {
                if cell.occupied_type == OccupiedType::Unit(id) {
                    cell.occupied_type = OccupiedType::None;
                }
                if matches!(cell.building_cell, Some(b) if b.unit == id) {
                    cell.building_cell = None;
                }
            });
        self.path_requests.retain(|r| r.unit_id != id);
        Some(unit)
    }

    // ── Footprints and collision ───────────────────────────────────

    /// Cells covered by a `footprint_x × footprint_z` footprint centred
    /// on `position`. May lie partly off the map.
    pub fn compute_footprint_region(
        &self,
        position: SimVector,
        footprint_x: u32,
        footprint_z: u32,
    ) -> DiscreteRect {
        let half_x = (footprint_x as i32 * MapTerrain::HEIGHT_TILE_WIDTH) / 2;
        let half_z = (footprint_z as i32 * MapTerrain::HEIGHT_TILE_HEIGHT) / 2;
        let top_left = SimVector::new(
            position.x - SimScalar::from_int(half_x),
            position.y,
            position.z - SimScalar::from_int(half_z),
        );
        let (x, y) = self.terrain.world_to_heightmap_coordinate_nearest(top_left);
        DiscreteRect::new(x as i32, y as i32, footprint_x, footprint_z)
    }

    /// Footprint for a unit with `info` standing at `position`.
    pub fn compute_collision_footprint(
        &self,
        position: SimVector,
        info: &MovementCollisionInfo,
    ) -> Result<DiscreteRect, SimError> {
        let (x, z) = self.definitions.footprint_xz(info)?;
        Ok(self.compute_footprint_region(position, x, z))
    }

    /// The current footprint of unit `id`.
    pub fn unit_footprint(&self, id: UnitId) -> Result<DiscreteRect, SimError> {
        let unit = self.unit(id)?;
        let definition = self.definitions.unit(&unit.unit_type)?;
        self.compute_collision_footprint(unit.position, &definition.movement_collision_info)
    }

    /// True if `rect` leaves the map or covers anything blocking.
    pub fn is_collision_at(&self, rect: DiscreteRect) -> bool {
        match self.occupied_grid.try_to_region(rect) {
            Some(region) => self.is_collision_at_region(region),
            None => true,
        }
    }

    /// True if any cell of `region` holds a unit, a feature or an
    /// impassable building cell.
    pub fn is_collision_at_region(&self, region: GridRegion) -> bool {
        self.occupied_grid.any(region, OccupiedCell::is_collision)
    }

    /// Like [`is_collision_at`](Self::is_collision_at), but anything
    /// belonging to `self_id` does not count.
    pub fn is_collision_at_excluding(&self, rect: DiscreteRect, self_id: UnitId) -> bool {
        match self.occupied_grid.try_to_region(rect) {
            Some(region) => self
                .occupied_grid
                .any(region, |cell| cell.is_collision_excluding(self_id)),
            None => true,
        }
    }

    /// True if `yard_map`, placed at `(x, y)` in the given state, would
    /// make a cell impassable while a unit or feature stands on it.
    pub fn is_yard_map_blocked(
        &self,
        x: u32,
        y: u32,
        yard_map: &Grid<YardMapCell>,
        open: bool,
    ) -> bool {
        self.occupied_grid.any2(x, y, yard_map, |cell, yard_cell| {
            !yard_cell.is_passable(open) && cell.occupied_type.is_blocking()
        })
    }

    /// True if anything blocks the ring of cells around `rect`. Cells off
    /// the map count as obstacles.
    pub fn is_adjacent_to_obstacle(&self, rect: DiscreteRect) -> bool {
        let top = DiscreteRect::new(rect.x - 1, rect.y - 1, rect.width + 2, 1);
        // The bottom strip sits `width` rows down, so non-square
        // footprints probe the row below a square one.
        let bottom = DiscreteRect::new(rect.x - 1, rect.y + rect.width as i32, rect.width + 2, 1);
        let left = DiscreteRect::new(rect.x - 1, rect.y, 1, rect.height);
        let right = DiscreteRect::new(rect.x + rect.width as i32, rect.y, 1, rect.height);
        self.is_collision_at(top)
            || self.is_collision_at(bottom)
            || self.is_collision_at(left)
            || self.is_collision_at(right)
    }

    /// True if a unit of `class` could be placed with its top-left cell
    /// at `(x, y)`: the area is clear and the terrain walkable.
    pub fn can_be_built_at(&self, class: &MovementClass, x: u32, y: u32) -> bool {
        let rect = DiscreteRect::new(x as i32, y as i32, class.footprint_x, class.footprint_z);
        !self.is_collision_at(rect) && self.terrain.is_area_walkable(class, rect)
    }

    /// Move a mobile unit's claim from `old_rect` to `new_rect`.
    ///
    /// Both rectangles are checked before either is touched. Old cells
    /// no longer claimed by `unit` are left as they are.
    pub fn move_unit_occupied_area(
        &mut self,
        old_rect: DiscreteRect,
        new_rect: DiscreteRect,
        unit: UnitId,
    ) -> Result<(), SimError> {
        let old_region = self
            .occupied_grid
            .try_to_region(old_rect)
            .ok_or(SimError::FootprintOutOfBounds {
                unit,
                rect: old_rect,
            })?;
        let new_region = self
            .occupied_grid
            .try_to_region(new_rect)
            .ok_or(SimError::FootprintOutOfBounds {
                unit,
                rect: new_rect,
            })?;

        self.occupied_grid.for_each_mut(old_region, |cell| {
            if cell.occupied_type == OccupiedType::Unit(unit) {
                cell.occupied_type = OccupiedType::None;
            }
        });
        self.occupied_grid.for_each_mut(new_region, |cell| {
            cell.occupied_type = OccupiedType::Unit(unit);
        });
        Ok(())
    }

    /// Relocate a mobile unit if its footprint at `position` is clear of
    /// everything but itself. Buildings never move.
    pub fn try_move_unit(&mut self, id: UnitId, position: SimVector) -> Result<bool, SimError> {
        let unit = self.unit(id)?;
        let definition = self.definitions.unit(&unit.unit_type)?;
        if !definition.is_mobile {
            return Ok(false);
        }
        let info = &definition.movement_collision_info;
        let old_rect = self.compute_collision_footprint(unit.position, info)?;
        let new_rect = self.compute_collision_footprint(position, info)?;
        if self.is_collision_at_excluding(new_rect, id) {
            return Ok(false);
        }

        self.move_unit_occupied_area(old_rect, new_rect, id)?;
        self.unit_mut(id)?.position = position;
        Ok(true)
    }

    /// Open or close a building's yard.
    ///
    /// Refused (returning `false`, nothing changed) if a unit or feature
    /// stands on a cell the new state would make impassable.
    pub fn try_set_yard_open(&mut self, id: UnitId, open: bool) -> Result<bool, SimError> {
        let rect = self.unit_footprint(id)?;
        let unit_type = &self.unit(id)?.unit_type;
        let definition = self.definitions.unit(unit_type)?;
        let yard_map = definition
            .yard_map
            .as_ref()
            .ok_or_else(|| SimError::MissingYardMap {
                unit_type: unit_type.clone(),
            })?;
        let region = self
            .occupied_grid
            .try_to_region(rect)
            .ok_or(SimError::FootprintOutOfBounds { unit: id, rect })?;

        if self.is_yard_map_blocked(region.x, region.y, yard_map, open) {
            return Ok(false);
        }

        self.occupied_grid
            .for_each2_mut(region.x, region.y, yard_map, |cell, yard_cell| {
                cell.building_cell = Some(BuildingOccupiedCell {
                    unit: id,
                    passable: yard_cell.is_passable(open),
                });
            });
        self.unit_mut(id)?.yard_open = open;
        Ok(true)
    }

    // ── Orders and pathfinding ─────────────────────────────────────

    /// Queue unit `id` for a path, replacing any request it already has.
    ///
    /// The unit always lands at the back of the queue.
    pub fn request_path(&mut self, id: UnitId) {
        let before = self.path_requests.len();
        self.path_requests.retain(|r| r.unit_id != id);
        if self.path_requests.len() != before {
            log::debug!("unit {id} re-requested a path");
        }
        self.path_requests.push_back(PathRequest { unit_id: id });
    }

    /// Take the oldest path request.
    pub fn pop_path_request(&mut self) -> Option<PathRequest> {
        self.path_requests.pop_front()
    }

    /// Pending path requests, oldest first.
    pub fn path_requests(&self) -> &VecDeque<PathRequest> {
        &self.path_requests
    }

    /// Ask every unit standing on unit `id`'s footprint to move off it.
    pub fn emit_bugger_off(&mut self, id: UnitId) -> Result<(), SimError> {
        let rect = self.unit_footprint(id)?;
        let region = self
            .occupied_grid
            .try_to_region(rect)
            .ok_or(SimError::FootprintOutOfBounds { unit: id, rect })?;

        let mut occupants = Vec::new();
        self.occupied_grid.for_each(region, |cell| {
            if let Some(unit) = cell.occupied_type.unit() {
                occupants.push(unit);
            }
        });
        for unit in occupants {
            self.tell_to_bugger_off(unit, rect)?;
        }
        Ok(())
    }

    /// Order unit `id` out of `rect`, unless it is already busy.
    pub fn tell_to_bugger_off(&mut self, id: UnitId, rect: DiscreteRect) -> Result<(), SimError> {
        let unit = self.unit_mut(id)?;
        if unit.orders.is_empty() {
            unit.add_order(UnitOrder::BuggerOff { rect });
        }
        Ok(())
    }

    // ── Economy ────────────────────────────────────────────────────

    /// Record resource deltas for unit `id` against its owner.
    ///
    /// Returns `false` if the owner is stalled on a consumed resource.
    pub fn add_resource_delta(
        &mut self,
        id: UnitId,
        energy: Energy,
        metal: Metal,
    ) -> Result<bool, SimError> {
        self.add_resource_delta_with_actual(id, energy, metal, energy, metal)
    }

    /// Record resource deltas where the amount booked (`actual_*`)
    /// differs from the amount that decides acceptance (`apparent_*`).
    pub fn add_resource_delta_with_actual(
        &mut self,
        id: UnitId,
        apparent_energy: Energy,
        apparent_metal: Metal,
        actual_energy: Energy,
        actual_metal: Metal,
    ) -> Result<bool, SimError> {
        let unit = self
            .units
            .get_mut(&id)
            .ok_or(SimError::UnknownUnit { unit: id })?;
        let owner = unit.owner;
        let player = self
            .players
            .get_mut(owner.0 as usize)
            .ok_or(SimError::UnknownPlayer { player: owner })?;

        unit.add_energy_delta(apparent_energy);
        unit.add_metal_delta(apparent_metal);
        Ok(player.add_resource_delta(
            apparent_energy,
            apparent_metal,
            actual_energy,
            actual_metal,
        ))
    }

    /// Whether the game is over, and who won.
    pub fn compute_win_status(&self) -> WinStatus {
        let mut alive = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| p.status == GamePlayerStatus::Alive)
            .map(|(i, _)| PlayerId(i as u32));
        match (alive.next(), alive.next()) {
            (None, _) => WinStatus::Draw,
            (Some(winner), None) => WinStatus::Won(winner),
            (Some(_), Some(_)) => WinStatus::Undecided,
        }
    }

    // ── Projectiles ────────────────────────────────────────────────

    /// Build a projectile fired from `position` along unit vector
    /// `direction` at a target `distance_to_target` away.
    ///
    /// Timed weapons expire after their timer, shifted by a random
    /// amount within `random_decay`. Untimed line-of-sight weapons expire
    /// one tick after covering the target distance.
    pub fn create_projectile_from_weapon(
        &mut self,
        owner: PlayerId,
        weapon_type: &str,
        position: SimVector,
        direction: SimVector,
        distance_to_target: SimScalar,
    ) -> Result<Projectile, SimError> {
        let weapon = self.definitions.weapon(weapon_type)?;
        let now = self.game_time;

        let die_on_frame = match weapon.weapon_timer {
            Some(timer) => {
                let decay = weapon.random_decay.0;
                let roll = self.rng.random_range(0..=decay);
                Some(now + timer - GameTime(decay / 2) + GameTime(roll))
            }
            None if weapon.physics_type == ProjectilePhysicsType::LineOfSight => {
                let ticks = (distance_to_target / weapon.velocity).to_int().max(0) as u32;
                Some(now + GameTime(ticks + 1))
            }
            None => None,
        };

        Ok(Projectile {
            weapon_type: weapon_type.to_uppercase(),
            owner,
            position,
            previous_position: position,
            origin: position,
            velocity: direction * weapon.velocity,
            gravity: weapon.physics_type == ProjectilePhysicsType::Ballistic,
            damage: weapon.damage.clone(),
            damage_radius: weapon.damage_radius,
            created_at: now,
            die_on_frame,
            ground_bounce: weapon.ground_bounce,
            last_smoke: now,
        })
    }

    /// Fire `weapon` and put the projectile in flight.
    pub fn spawn_projectile(
        &mut self,
        owner: PlayerId,
        weapon: &UnitWeapon,
        position: SimVector,
        direction: SimVector,
        distance_to_target: SimScalar,
    ) -> Result<ProjectileId, SimError> {
        let projectile = self.create_projectile_from_weapon(
            owner,
            &weapon.weapon_type,
            position,
            direction,
            distance_to_target,
        )?;
        Ok(self.insert_projectile(projectile))
    }

    /// Put an already-built projectile in flight.
    pub fn insert_projectile(&mut self, projectile: Projectile) -> ProjectileId {
        let id = ProjectileId(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.insert(id, projectile);
        id
    }

    // ── Tick ───────────────────────────────────────────────────────

    /// Advance the world by one tick.
    ///
    /// Runs every unit's scripts in id order, advances piece animation
    /// and projectiles, expires projectiles and removes dead units.
    pub fn tick(&mut self) {
        self.game_time = self.game_time + GameTime(1);

        for unit in self.units.values_mut() {
            unit.previous_position = unit.position;
            unit.previous_rotation = unit.rotation;
        }

        let ids: Vec<UnitId> = self.units.keys().copied().collect();
        for id in ids {
            if let Err(e) = self.run_unit_scripts(id) {
                log::error!("scripts of unit {id} could not run: {e}");
            }
        }

        for unit in self.units.values_mut() {
            unit.update_pieces();
        }

        let now = self.game_time;
        for projectile in self.projectiles.values_mut() {
            projectile.advance();
        }
        self.projectiles.retain(|_, p| !p.is_expired(now));

        let dead: Vec<UnitId> = self
            .units
            .iter()
            .filter(|(_, u)| u.is_dead())
            .map(|(id, _)| *id)
            .collect();
        for id in dead {
            self.remove_unit(id);
            self.events.push(GameEvent::UnitRemoved { unit_id: id });
            log::debug!("removed dead unit {id}");
        }
    }
}
