//! Criterion micro-benchmarks for the script interpreter.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use skirmish_cob::{CobEnvironment, OpCode};
use skirmish_core::{PlayerId, UnitId};
use skirmish_test_utils::{resume_thread, unit_view, MockHost, ScriptAssembler};

const UNIT: UnitId = UnitId(1);

/// A counting loop of `n` iterations: locals, arithmetic and jumps.
fn counting_loop(n: i32) -> ScriptAssembler {
    let mut asm = ScriptAssembler::new();
    asm.statics(1);
    asm.function("Main");
    asm.op(OpCode::CreateLocalVar);
    asm.push(n).op_with(OpCode::PopLocalVar, &[0]);
    asm.label("top");
    asm.op_with(OpCode::PushLocalVar, &[0]);
    asm.jump_if_zero("done");
    asm.op_with(OpCode::PushStatic, &[0]).push(3).op(OpCode::Add);
    asm.op_with(OpCode::PopStatic, &[0]);
    asm.op_with(OpCode::PushLocalVar, &[0]).push(1).op(OpCode::Sub);
    asm.op_with(OpCode::PopLocalVar, &[0]);
    asm.jump("top");
    asm.label("done");
    asm.ret();
    asm
}

/// Benchmark: run a 10K-iteration loop to completion.
fn bench_loop_10k(c: &mut Criterion) {
    let script = Arc::new(counting_loop(10_000).build());
    let mut host = MockHost::new(0);
    host.insert_unit(UNIT, unit_view(PlayerId(0)));

    c.bench_function("cob_loop_10k", |b| {
        b.iter(|| {
            let mut env = CobEnvironment::new(Arc::clone(&script));
            let id = env.create_thread(0, [], 0).ok();
            if let Some(id) = id {
                black_box(resume_thread(&mut host, &mut env, id, UNIT));
            }
            black_box(env.statics()[0]);
        });
    });
}

/// Benchmark: resume 100 sleeping threads once each, as a busy unit does per tick.
fn bench_resume_100_sleepers(c: &mut Criterion) {
    let mut asm = ScriptAssembler::new();
    asm.function("Idle");
    asm.label("top");
    asm.sleep(100);
    asm.jump("top");
    let script = Arc::new(asm.build());
    let mut host = MockHost::new(0);
    host.insert_unit(UNIT, unit_view(PlayerId(0)));

    let mut env = CobEnvironment::new(script);
    for _ in 0..100 {
        let _ = env.create_thread(0, [], 0);
    }

    c.bench_function("cob_resume_100_sleepers", |b| {
        b.iter(|| {
            for id in env.thread_ids() {
                black_box(resume_thread(&mut host, &mut env, id, UNIT));
            }
        });
    });
}

criterion_group!(benches, bench_loop_10k, bench_resume_100_sleepers);
criterion_main!(benches);
