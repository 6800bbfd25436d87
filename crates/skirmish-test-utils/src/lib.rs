//! Test utilities and mock types for Skirmish development.
//!
//! Provides a [`ScriptAssembler`] for writing scripts by hand, a
//! recording [`MockHost`] implementing [`CobHost`], and
//! [`resume_thread`], which drives one thread the way the simulation's
//! tick driver does.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod assembler;

pub use assembler::ScriptAssembler;

use std::collections::{BTreeMap, HashMap};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skirmish_cob::{CobEnvironment, CobExecutionContext, CobStatus, ScriptError, ThreadId};
use skirmish_core::{
    CobHost, PieceEffect, PlayerId, SimAngle, SimScalar, SimVector, UnitId, UnitView,
};

/// A host-side effect requested by a script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    PieceVisible {
        unit: UnitId,
        piece: String,
        visible: bool,
    },
    PieceShaded {
        unit: UnitId,
        piece: String,
        shaded: bool,
    },
    PieceEffect {
        unit: UnitId,
        piece: String,
        effect: PieceEffect,
    },
    Activation(UnitId, bool),
    BuildStance(UnitId, bool),
    YardOpen(UnitId, bool),
    BuggerOff(UnitId, bool),
    StandingMoveOrders(UnitId, i32),
    StandingFireOrders(UnitId, i32),
    Armored(UnitId, bool),
}

/// A plain unit view owned by `owner`, at the origin, at full health.
pub fn unit_view(owner: PlayerId) -> UnitView {
    UnitView {
        position: SimVector::ZERO,
        rotation: SimAngle::ZERO,
        height: SimScalar::from_int(10),
        owner,
        hit_points: 100,
        max_hit_points: 100,
        activated: false,
        in_build_stance: false,
        yard_open: false,
        build_percent_left: 0,
        fire_orders: 0,
        move_orders: 0,
        armored: false,
    }
}

/// Mock implementation of [`CobHost`].
///
/// Units and piece positions are pre-populated by the test. Writes are
/// applied to the stored [`UnitView`] (so scripts can read them back)
/// and appended to a call log for assertions.
pub struct MockHost {
    rng: ChaCha8Rng,
    units: BTreeMap<UnitId, UnitView>,
    pieces: HashMap<(UnitId, String), SimVector>,
    ground_height: SimScalar,
    calls: Vec<HostCall>,
}

impl MockHost {
    /// A host with no units and a flat map at height zero.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            units: BTreeMap::new(),
            pieces: HashMap::new(),
            ground_height: SimScalar::ZERO,
            calls: Vec::new(),
        }
    }

    pub fn insert_unit(&mut self, id: UnitId, view: UnitView) {
        self.units.insert(id, view);
    }

    pub fn remove_unit(&mut self, id: UnitId) {
        self.units.remove(&id);
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitView> {
        self.units.get_mut(&id)
    }

    pub fn set_piece_position(&mut self, unit: UnitId, piece: &str, position: SimVector) {
        self.pieces.insert((unit, piece.to_string()), position);
    }

    pub fn set_ground_height(&mut self, height: SimScalar) {
        self.ground_height = height;
    }

    /// Effects recorded so far.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain the recorded effects.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    fn update(&mut self, unit: UnitId, f: impl FnOnce(&mut UnitView)) {
        if let Some(view) = self.units.get_mut(&unit) {
            f(view);
        }
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CobHost for MockHost {
    fn random_range(&mut self, low: i32, high: i32) -> i32 {
        self.rng.random_range(low..=high)
    }

    fn unit(&self, unit: UnitId) -> Option<UnitView> {
        self.units.get(&unit).cloned()
    }

    fn piece_position(&self, unit: UnitId, piece: &str) -> Option<SimVector> {
        self.pieces.get(&(unit, piece.to_string())).copied()
    }

    fn ground_height(&self, _x: SimScalar, _z: SimScalar) -> SimScalar {
        self.ground_height
    }

    fn min_unit_id(&self) -> u32 {
        self.units.keys().next().map_or(0, |id| id.0)
    }

    fn max_unit_id(&self) -> u32 {
        self.units.keys().next_back().map_or(0, |id| id.0)
    }

    fn set_piece_visible(&mut self, unit: UnitId, piece: &str, visible: bool) {
        self.calls.push(HostCall::PieceVisible {
            unit,
            piece: piece.to_string(),
            visible,
        });
    }

    fn set_piece_shaded(&mut self, unit: UnitId, piece: &str, shaded: bool) {
        self.calls.push(HostCall::PieceShaded {
            unit,
            piece: piece.to_string(),
            shaded,
        });
    }

    fn emit_piece_effect(&mut self, unit: UnitId, piece: &str, effect: PieceEffect) {
        self.calls.push(HostCall::PieceEffect {
            unit,
            piece: piece.to_string(),
            effect,
        });
    }

    fn set_activation(&mut self, unit: UnitId, active: bool) {
        self.update(unit, |v| v.activated = active);
        self.calls.push(HostCall::Activation(unit, active));
    }

    fn set_build_stance(&mut self, unit: UnitId, value: bool) {
        self.update(unit, |v| v.in_build_stance = value);
        self.calls.push(HostCall::BuildStance(unit, value));
    }

    fn set_yard_open(&mut self, unit: UnitId, open: bool) {
        self.update(unit, |v| v.yard_open = open);
        self.calls.push(HostCall::YardOpen(unit, open));
    }

    fn set_bugger_off(&mut self, unit: UnitId, value: bool) {
        self.calls.push(HostCall::BuggerOff(unit, value));
    }

    fn set_standing_move_orders(&mut self, unit: UnitId, value: i32) {
        self.update(unit, |v| v.move_orders = value);
        self.calls.push(HostCall::StandingMoveOrders(unit, value));
    }

    fn set_standing_fire_orders(&mut self, unit: UnitId, value: i32) {
        self.update(unit, |v| v.fire_orders = value);
        self.calls.push(HostCall::StandingFireOrders(unit, value));
    }

    fn set_armored(&mut self, unit: UnitId, value: bool) {
        self.update(unit, |v| v.armored = value);
        self.calls.push(HostCall::Armored(unit, value));
    }
}

/// Detach thread `id`, run it once, and put it back unless it finished.
///
/// Returns `None` if the thread does not exist (it finished or was
/// killed by a signal).
pub fn resume_thread(
    host: &mut dyn CobHost,
    env: &mut CobEnvironment,
    id: ThreadId,
    unit: UnitId,
) -> Option<Result<CobStatus, ScriptError>> {
    let mut thread = env.take_thread(id)?;
    let result = CobExecutionContext::new(host, env, &mut thread, unit).execute();
    if matches!(result, Ok(status) if status != CobStatus::Finished) {
        env.restore_thread(id, thread);
    }
    Some(result)
}
