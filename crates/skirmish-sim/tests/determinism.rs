//! Lockstep replicas stay in agreement until their inputs differ.

mod common;

use common::{empty_script, spawn, world, LAB, TANK};
use skirmish_cob::{CobScript, CobValueId, OpCode};
use skirmish_core::{GameTime, UnitId};
use skirmish_hash::{first_divergence, HashLog};
use skirmish_sim::{Energy, GameSimulation, Metal};
use skirmish_test_utils::ScriptAssembler;

const TICKS: u32 = 20;

/// Every tick, set the standing fire orders to a random value.
fn restless_script() -> CobScript {
    let mut asm = ScriptAssembler::new();
    asm.function("Create");
    asm.label("loop");
    asm.push(CobValueId::StandingFireOrders as i32);
    asm.push(0).push(1000).op(OpCode::Rand);
    asm.op(OpCode::SetValue);
    asm.sleep(0);
    asm.jump("loop");
    asm.build()
}

fn replica(seed: u64) -> (GameSimulation, UnitId) {
    let mut sim = world(restless_script(), empty_script(), seed);
    let tank = spawn(&mut sim, TANK, 0, 0, 0);
    spawn(&mut sim, LAB, 1, 64, 64);
    (sim, tank)
}

/// Tick `sim` up to `until`, recording a fingerprint after each tick.
/// `before_tick` runs ahead of every tick with the time it will reach.
fn run(
    sim: &mut GameSimulation,
    log: &mut HashLog,
    until: u32,
    mut before_tick: impl FnMut(&mut GameSimulation, GameTime),
) {
    while sim.game_time() < GameTime(until) {
        before_tick(sim, sim.game_time() + GameTime(1));
        sim.tick();
        log.record(sim.game_time(), sim.compute_hash());
    }
}

// ── Agreement ───────────────────────────────────────────────────────

#[test]
fn same_seed_replicas_agree_every_tick() {
    let (mut a, _) = replica(11);
    let (mut b, _) = replica(11);
    let (mut log_a, mut log_b) = (HashLog::new(), HashLog::new());

    run(&mut a, &mut log_a, TICKS, |_, _| {});
    run(&mut b, &mut log_b, TICKS, |_, _| {});

    assert_eq!(log_a.len(), TICKS as usize);
    assert_eq!(log_a, log_b);
    assert_eq!(first_divergence(&log_a, &log_b), None);
}

#[test]
fn scripts_draw_from_the_simulation_generator() {
    let (mut a, tank_a) = replica(11);
    let (mut b, tank_b) = replica(12);
    let (mut log_a, mut log_b) = (HashLog::new(), HashLog::new());

    run(&mut a, &mut log_a, TICKS, |_, _| {});
    run(&mut b, &mut log_b, TICKS, |_, _| {});

    let orders = |sim: &GameSimulation, id| sim.unit(id).unwrap().fire_orders;
    assert!((0..=1000).contains(&orders(&a, tank_a)));
    assert!((0..=1000).contains(&orders(&b, tank_b)));
    assert!(first_divergence(&log_a, &log_b).is_some());
}

// ── Divergence ──────────────────────────────────────────────────────

#[test]
fn perturbed_replica_diverges_at_the_perturbed_tick() {
    let (mut a, _) = replica(11);
    let (mut b, tank) = replica(11);
    let (mut log_a, mut log_b) = (HashLog::new(), HashLog::new());

    run(&mut a, &mut log_a, TICKS, |_, _| {});
    run(&mut b, &mut log_b, TICKS, |sim, next| {
        if next == GameTime(10) {
            sim.add_resource_delta(tank, Energy::from_int(5), Metal::ZERO)
                .unwrap();
        }
    });

    let divergence = first_divergence(&log_a, &log_b).unwrap();
    assert_eq!(divergence.time, GameTime(10));
    assert_eq!(divergence.local, log_a.get(GameTime(10)).unwrap());
    assert_eq!(log_a.get(GameTime(9)), log_b.get(GameTime(9)));
}
