//! Shared world fixture for the simulation integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use skirmish_cob::CobScript;
use skirmish_core::{PlayerId, SimScalar, SimVector, UnitId};
use skirmish_sim::{
    GamePlayerInfo, GamePlayerType, GameSimulation, MovementClass, MovementCollisionInfo,
    PieceDefinition, SimConfig, UnitDefinition, UnitModelDefinition,
};
use skirmish_space::parse_yard_map;
use skirmish_test_utils::ScriptAssembler;

/// A mobile 2×2 unit.
pub const TANK: &str = "ARMTANK";
/// A 2×2 building whose whole yard opens.
pub const LAB: &str = "ARMLAB";

fn movement(size: u32) -> MovementCollisionInfo {
    MovementCollisionInfo::AdHoc(MovementClass {
        name: String::new(),
        footprint_x: size,
        footprint_z: size,
        min_water_depth: -10000,
        max_water_depth: 10000,
        max_slope: 255,
        max_water_slope: 255,
    })
}

fn piece(name: &str, origin: SimVector, parent: Option<&str>) -> PieceDefinition {
    PieceDefinition {
        name: name.to_string(),
        origin,
        parent: parent.map(str::to_string),
    }
}

fn model() -> UnitModelDefinition {
    UnitModelDefinition {
        height: SimScalar::from_int(16),
        pieces: vec![
            piece("base", SimVector::ZERO, None),
            piece("turret", SimVector::from_ints(0, 8, 0), Some("base")),
            piece("door", SimVector::from_ints(0, 0, 8), Some("base")),
        ],
    }
}

/// A script with no functions.
pub fn empty_script() -> CobScript {
    ScriptAssembler::new().build()
}

/// A flat 32×32 cell map with a tank and a lab type running the given
/// scripts.
pub fn config(tank_script: CobScript, lab_script: CobScript, seed: u64) -> SimConfig {
    let mut config = SimConfig::flat(33, 33, seed).unwrap();
    let defs = &mut config.definitions;
    for (name, mobile, script) in [(TANK, true, tank_script), (LAB, false, lab_script)] {
        defs.add_unit(UnitDefinition {
            name: name.to_string(),
            object_name: name.to_string(),
            is_mobile: mobile,
            floater: false,
            can_hover: false,
            max_hit_points: 200,
            movement_collision_info: movement(2),
            yard_map: (!mobile).then(|| parse_yard_map(2, 2, "cccc").unwrap()),
            weapons: [None, None, None],
        });
        defs.add_model(name, model());
        defs.add_script(name, Arc::new(script));
    }
    config
}

/// [`config`] built into a simulation with two players.
pub fn world(tank_script: CobScript, lab_script: CobScript, seed: u64) -> GameSimulation {
    let mut sim = GameSimulation::new(config(tank_script, lab_script, seed)).unwrap();
    sim.add_player(GamePlayerInfo::new(GamePlayerType::Human, "ARM", 0));
    sim.add_player(GamePlayerInfo::new(GamePlayerType::Computer, "CORE", 1));
    sim
}

/// Spawn a unit that must fit.
pub fn spawn(sim: &mut GameSimulation, unit_type: &str, owner: u32, x: i32, z: i32) -> UnitId {
    sim.try_spawn_unit(unit_type, PlayerId(owner), SimVector::from_ints(x, 0, z), None)
        .unwrap()
        .unwrap()
}

/// Static variable `index` of unit `id`'s script environment.
pub fn static_var(sim: &GameSimulation, id: UnitId, index: u32) -> i32 {
    sim.unit(id)
        .unwrap()
        .cob_env
        .as_ref()
        .unwrap()
        .get_static(index)
        .unwrap()
}

/// Number of live script threads of unit `id`.
pub fn thread_count(sim: &GameSimulation, id: UnitId) -> usize {
    sim.unit(id)
        .unwrap()
        .cob_env
        .as_ref()
        .unwrap()
        .thread_count()
}
