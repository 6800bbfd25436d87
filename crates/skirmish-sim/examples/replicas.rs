//! Skirmish replicas: two lockstep peers checking each other's fingerprints.
//!
//! Demonstrates:
//!   1. Loading unit definitions, a model and a script into a SimConfig
//!   2. Running two replicas from the same seed
//!   3. Recording a fingerprint per tick in a HashLog
//!   4. Injecting a resource change into one peer and locating the desync
//!
//! Run with:
//!   RUST_LOG=info cargo run --example replicas

use std::sync::Arc;

use skirmish_cob::{CobScript, CobValueId, OpCode};
use skirmish_core::{Axis, GameTime, PlayerId, SimScalar, SimVector, UnitId};
use skirmish_hash::{first_divergence, HashLog};
use skirmish_sim::{
    Energy, GamePlayerInfo, GamePlayerType, GameSimulation, Metal, MovementClass,
    MovementCollisionInfo, PieceDefinition, SimConfig, UnitDefinition, UnitModelDefinition,
};
use skirmish_test_utils::ScriptAssembler;

// ─── Parameters ─────────────────────────────────────────────────

const SEED: u64 = 0x5EED;
const TICKS: u32 = 60;
const PERTURB_AT: GameTime = GameTime(42);
const UNIT: &str = "ARMFLASH";

// ─── Content ────────────────────────────────────────────────────
//
// One mobile unit type whose script turns its turret every other tick
// and picks a random standing fire order each time round the loop.

fn script() -> CobScript {
    let mut asm = ScriptAssembler::new();
    let turret = asm.piece("turret");
    asm.function("Create");
    asm.label("loop");
    asm.push(1 << 16).push(8192);
    asm.piece_op(OpCode::Turn, turret, Axis::Y);
    asm.push(CobValueId::StandingFireOrders as i32);
    asm.push(0).push(2).op(OpCode::Rand);
    asm.op(OpCode::SetValue);
    asm.sleep(66);
    asm.jump("loop");
    asm.build()
}

fn config() -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = SimConfig::flat(65, 65, SEED)?;
    let defs = &mut config.definitions;
    defs.add_unit(UnitDefinition {
        name: UNIT.to_string(),
        object_name: UNIT.to_string(),
        is_mobile: true,
        floater: false,
        can_hover: false,
        max_hit_points: 190,
        movement_collision_info: MovementCollisionInfo::AdHoc(MovementClass {
            name: "TANKSH2".to_string(),
            footprint_x: 2,
            footprint_z: 2,
            min_water_depth: -10000,
            max_water_depth: 10000,
            max_slope: 18,
            max_water_slope: 255,
        }),
        yard_map: None,
        weapons: [None, None, None],
    });
    defs.add_model(
        UNIT,
        UnitModelDefinition {
            height: SimScalar::from_int(12),
            pieces: vec![
                PieceDefinition {
                    name: "base".to_string(),
                    origin: SimVector::ZERO,
                    parent: None,
                },
                PieceDefinition {
                    name: "turret".to_string(),
                    origin: SimVector::from_ints(0, 6, 0),
                    parent: Some("base".to_string()),
                },
            ],
        },
    );
    defs.add_script(UNIT, Arc::new(script()));
    Ok(config)
}

fn replica() -> Result<(GameSimulation, Vec<UnitId>), Box<dyn std::error::Error>> {
    let mut sim = GameSimulation::new(config()?)?;
    sim.add_player(GamePlayerInfo::new(GamePlayerType::Human, "ARM", 0));
    sim.add_player(GamePlayerInfo::new(GamePlayerType::Computer, "CORE", 1));

    let mut units = Vec::new();
    for (i, owner) in [0, 0, 1, 1].into_iter().enumerate() {
        let x = -96 + 64 * i as i32;
        let position = SimVector::from_ints(x, 0, 0);
        if let Some(id) = sim.try_spawn_unit(UNIT, PlayerId(owner), position, None)? {
            units.push(id);
        }
    }
    Ok((sim, units))
}

// ─── Main ───────────────────────────────────────────────────────

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (mut local, _) = replica()?;
    let (mut remote, remote_units) = replica()?;
    log::info!(
        "two replicas with {} units each, seed {SEED:#x}",
        remote_units.len()
    );

    let mut local_log = HashLog::new();
    let mut remote_log = HashLog::new();
    for _ in 0..TICKS {
        if remote.game_time() + GameTime(1) == PERTURB_AT {
            if let Some(&id) = remote_units.first() {
                remote.add_resource_delta(id, Energy::from_int(1), Metal::ZERO)?;
                log::info!("remote: granted unit {id} one extra energy");
            }
        }

        local.tick();
        remote.tick();
        local_log.record(local.game_time(), local.compute_hash());
        remote_log.record(remote.game_time(), remote.compute_hash());

        if local.game_time().0 % 10 == 0 {
            log::info!(
                "tick {:>3}: local {} remote {}",
                local.game_time().0,
                local.compute_hash(),
                remote.compute_hash()
            );
        }
    }

    match first_divergence(&local_log, &remote_log) {
        Some(divergence) => log::info!("{divergence}"),
        None => log::info!("replicas agree on all {TICKS} ticks"),
    }
    Ok(())
}
