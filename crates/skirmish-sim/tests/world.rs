//! End-to-end placement, yard, economy and outcome behaviour.

mod common;

use common::{empty_script, spawn, world, LAB, TANK};
use skirmish_core::{GameTime, PlayerId, SimAngle, SimVector, UnitId};
use skirmish_sim::{
    Energy, FeatureDefinition, GameEvent, GamePlayerInfo, GamePlayerStatus, GamePlayerType,
    MapFeature, Metal, PathRequest, SimError, WinStatus,
};
use skirmish_space::{DiscreteRect, OccupiedType};

// ── Placement ───────────────────────────────────────────────────────

#[test]
fn spawn_on_occupied_footprint_fails_then_disjoint_succeeds() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let first = spawn(&mut sim, TANK, 0, 0, 0);
    assert_eq!(first, UnitId(1));
    assert!(sim.is_collision_at(DiscreteRect::new(15, 15, 2, 2)));

    // One cell of overlap is enough.
    let blocked = sim.try_spawn_unit(TANK, PlayerId(1), SimVector::from_ints(16, 0, 0), None);
    assert_eq!(blocked, Ok(None));

    let second = spawn(&mut sim, TANK, 1, 32, 0);
    assert_eq!(second, UnitId(2));
    assert_eq!(
        sim.occupied_grid().get(17, 15).unwrap().occupied_type,
        OccupiedType::Unit(second)
    );
    assert_eq!(
        sim.take_events(),
        vec![
            GameEvent::UnitSpawned { unit_id: first },
            GameEvent::UnitSpawned { unit_id: second },
        ]
    );
}

#[test]
fn spawn_off_map_is_a_collision() {
    let mut sim = world(empty_script(), empty_script(), 1);
    assert_eq!(
        sim.try_spawn_unit(TANK, PlayerId(0), SimVector::from_ints(256, 0, 0), None),
        Ok(None)
    );
    assert_eq!(sim.units().count(), 0);
}

#[test]
fn unknown_unit_type_is_an_error() {
    let mut sim = world(empty_script(), empty_script(), 1);
    assert_eq!(
        sim.try_spawn_unit("CORAK", PlayerId(0), SimVector::ZERO, None),
        Err(SimError::UnknownUnitType {
            name: "CORAK".to_string()
        })
    );
}

#[test]
fn moving_unit_releases_old_cells() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let tank = spawn(&mut sim, TANK, 0, 0, 0);
    let other = spawn(&mut sim, TANK, 0, 64, 0);

    assert_eq!(sim.try_move_unit(tank, SimVector::from_ints(48, 0, 0)), Ok(false));
    assert_eq!(sim.try_move_unit(tank, SimVector::from_ints(0, 0, 32)), Ok(true));
    assert!(!sim.is_collision_at(DiscreteRect::new(15, 15, 2, 2)));
    assert!(sim.is_collision_at_excluding(DiscreteRect::new(15, 17, 2, 2), other));
    assert!(!sim.is_collision_at_excluding(DiscreteRect::new(15, 17, 2, 2), tank));
}

fn rock() -> FeatureDefinition {
    FeatureDefinition {
        footprint_x: 2,
        footprint_z: 2,
        blocking: true,
        indestructible: false,
        metal: 0,
    }
}

fn feature_at(x: i32, z: i32) -> MapFeature {
    MapFeature {
        feature_name: "ROCK1".to_string(),
        position: SimVector::from_ints(x, 0, z),
        rotation: SimAngle::ZERO,
    }
}

#[test]
fn blocking_feature_cannot_land_on_a_unit() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let tank = spawn(&mut sim, TANK, 0, 0, 0);

    assert_eq!(sim.add_feature(&rock(), feature_at(0, 0)), None);
    assert_eq!(
        sim.occupied_grid().get(15, 15).unwrap().occupied_type,
        OccupiedType::Unit(tank)
    );

    assert_eq!(sim.try_move_unit(tank, SimVector::from_ints(64, 0, 0)), Ok(true));
    let rock_id = sim.add_feature(&rock(), feature_at(0, 0)).unwrap();
    assert!(sim.is_collision_at(DiscreteRect::new(15, 15, 2, 2)));
    assert_eq!(
        sim.try_spawn_unit(TANK, PlayerId(1), SimVector::ZERO, None),
        Ok(None)
    );
    assert!(sim.feature(rock_id).is_some());
}

#[test]
fn releasing_an_area_keeps_other_claims() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let tank = spawn(&mut sim, TANK, 0, 0, 0);
    let rock_id = sim.add_feature(&rock(), feature_at(32, 0)).unwrap();

    // The old area spans both the tank and the rock.
    sim.move_unit_occupied_area(
        DiscreteRect::new(15, 15, 4, 2),
        DiscreteRect::new(15, 18, 2, 2),
        tank,
    )
    .unwrap();
    assert_eq!(
        sim.occupied_grid().get(17, 15).unwrap().occupied_type,
        OccupiedType::Feature(rock_id)
    );
    assert_eq!(
        sim.occupied_grid().get(15, 15).unwrap().occupied_type,
        OccupiedType::None
    );
}

// ── Yard ────────────────────────────────────────────────────────────

#[test]
fn yard_cannot_close_on_a_unit_until_it_leaves() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let lab = spawn(&mut sim, LAB, 0, 0, 0);
    assert!(sim.is_collision_at(DiscreteRect::new(15, 15, 2, 2)));

    assert_eq!(sim.try_set_yard_open(lab, true), Ok(true));
    assert!(!sim.is_collision_at(DiscreteRect::new(15, 15, 2, 2)));
    let tank = spawn(&mut sim, TANK, 0, 0, 0);

    assert_eq!(sim.try_set_yard_open(lab, false), Ok(false));
    assert!(sim.unit(lab).unwrap().yard_open);
    let cell = sim.occupied_grid().get(15, 15).unwrap();
    assert!(cell.building_cell.unwrap().passable);

    sim.quietly_kill_unit(tank).unwrap();
    sim.tick();
    assert_eq!(sim.try_set_yard_open(lab, false), Ok(true));
    assert!(!sim.unit(lab).unwrap().yard_open);
}

#[test]
fn bugger_off_orders_occupants_out_of_the_yard() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let lab = spawn(&mut sim, LAB, 0, 0, 0);
    sim.set_yard_open(lab, true).unwrap();
    let tank = spawn(&mut sim, TANK, 1, 0, 0);

    sim.set_bugger_off(lab, false).unwrap();
    assert!(sim.unit(tank).unwrap().orders.is_empty());
    sim.set_bugger_off(lab, true).unwrap();
    assert_eq!(sim.unit(tank).unwrap().orders.len(), 1);
}

// ── Pathfinding queue ───────────────────────────────────────────────

#[test]
fn path_requests_keep_only_the_latest_per_unit() {
    let mut sim = world(empty_script(), empty_script(), 1);
    sim.request_path(UnitId(1));
    sim.request_path(UnitId(2));
    sim.request_path(UnitId(1));

    assert_eq!(sim.pop_path_request(), Some(PathRequest { unit_id: UnitId(2) }));
    assert_eq!(sim.pop_path_request(), Some(PathRequest { unit_id: UnitId(1) }));
    assert_eq!(sim.pop_path_request(), None);
}

// ── Economy ─────────────────────────────────────────────────────────

#[test]
fn stalled_player_records_desire_but_grants_nothing() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let tank = spawn(&mut sim, TANK, 0, 0, 0);
    sim.player_mut(PlayerId(0)).unwrap().metal_stalled = true;

    let granted = sim
        .add_resource_delta(tank, Energy::from_int(-2), Metal::from_int(-3))
        .unwrap();
    assert!(!granted);
    let player = sim.player(PlayerId(0)).unwrap();
    assert_eq!(player.desired_metal_consumption_buffer, Metal::from_int(3));
    assert_eq!(player.actual_metal_consumption_buffer, Metal::ZERO);
    assert_eq!(player.actual_energy_consumption_buffer, Energy::ZERO);

    let granted = sim
        .add_resource_delta(tank, Energy::from_int(4), Metal::ZERO)
        .unwrap();
    assert!(granted);
    assert_eq!(
        sim.player(PlayerId(0)).unwrap().energy_production_buffer,
        Energy::from_int(4)
    );
}

#[test]
fn apparent_delta_decides_and_actual_delta_is_booked() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let tank = spawn(&mut sim, TANK, 1, 0, 0);
    let granted = sim
        .add_resource_delta_with_actual(
            tank,
            Energy::from_int(-10),
            Metal::ZERO,
            Energy::from_int(-4),
            Metal::ZERO,
        )
        .unwrap();
    assert!(granted);
    let player = sim.player(PlayerId(1)).unwrap();
    assert_eq!(player.desired_energy_consumption_buffer, Energy::from_int(10));
    assert_eq!(player.actual_energy_consumption_buffer, Energy::from_int(4));
}

// ── Outcome ─────────────────────────────────────────────────────────

#[test]
fn win_status_follows_player_statuses() {
    let mut sim = world(empty_script(), empty_script(), 1);
    sim.add_player(GamePlayerInfo::new(GamePlayerType::Computer, "CORE", 2));
    assert_eq!(sim.compute_win_status(), WinStatus::Undecided);

    sim.player_mut(PlayerId(1)).unwrap().status = GamePlayerStatus::Dead;
    sim.player_mut(PlayerId(2)).unwrap().status = GamePlayerStatus::Dead;
    assert_eq!(sim.compute_win_status(), WinStatus::Won(PlayerId(0)));

    sim.player_mut(PlayerId(0)).unwrap().status = GamePlayerStatus::Dead;
    assert_eq!(sim.compute_win_status(), WinStatus::Draw);
}

#[test]
fn dead_unit_is_swept_on_the_next_tick() {
    let mut sim = world(empty_script(), empty_script(), 1);
    let tank = spawn(&mut sim, TANK, 0, 0, 0);
    sim.request_path(tank);
    sim.quietly_kill_unit(tank).unwrap();
    assert!(sim.unit_exists(tank));

    sim.tick();
    assert_eq!(sim.game_time(), GameTime(1));
    assert!(!sim.unit_exists(tank));
    assert!(sim.path_requests().is_empty());
    assert!(!sim.is_collision_at(DiscreteRect::new(15, 15, 2, 2)));
    assert_eq!(
        sim.unit(tank).unwrap_err(),
        SimError::UnknownUnit { unit: tank }
    );
}
