//! The script driver: runs unit script threads against the simulation.
//!
//! Each unit's [`CobEnvironment`] is detached from the unit while its
//! threads run, so the interpreter can borrow the simulation mutably
//! through [`SimScriptHost`] at the same time. Threads are resumed in
//! [`ThreadId`] order; threads started during the run first execute on
//! the next tick.

use rand::Rng;
use skirmish_cob::{
    BlockedStatus, CobEnvironment, CobExecutionContext, CobScript, CobStatus, CobThread, Locals,
    MotionCommand, MotionKind, ScriptError, ThreadId, ThreadState,
};
use skirmish_core::{
    CobHost, GameTime, PieceEffect, SimScalar, SimVector, UnitId, UnitView,
};

use crate::error::SimError;
use crate::event::GameEvent;
use crate::piece::UnitPiece;
use crate::simulation::GameSimulation;
use crate::unit::UnitState;

/// [`CobHost`] over a live simulation.
pub struct SimScriptHost<'a> {
    sim: &'a mut GameSimulation,
}

impl<'a> SimScriptHost<'a> {
    /// Expose `sim` to the interpreter.
    pub fn new(sim: &'a mut GameSimulation) -> Self {
        Self { sim }
    }
}

fn report(operation: &str, result: Result<(), SimError>) {
    if let Err(e) = result {
        log::warn!("script {operation} ignored: {e}");
    }
}

impl CobHost for SimScriptHost<'_> {
    fn random_range(&mut self, low: i32, high: i32) -> i32 {
        self.sim.rng.random_range(low..=high)
    }

    fn unit(&self, unit: UnitId) -> Option<UnitView> {
        self.sim.units.get(&unit).map(UnitState::view)
    }

    fn piece_position(&self, unit: UnitId, piece: &str) -> Option<SimVector> {
        self.sim.get_unit_piece_position(unit, piece).ok()
    }

    fn ground_height(&self, x: SimScalar, z: SimScalar) -> SimScalar {
        self.sim.terrain.get_height_at(x, z)
    }

    fn min_unit_id(&self) -> u32 {
        self.sim.units.keys().next().map_or(0, |id| id.0)
    }

    fn max_unit_id(&self) -> u32 {
        self.sim.next_unit_id - 1
    }

    fn set_piece_visible(&mut self, unit: UnitId, piece: &str, visible: bool) {
        let result = if visible {
            self.sim.show_object(unit, piece)
        } else {
            self.sim.hide_object(unit, piece)
        };
        report("show/hide", result);
    }

    fn set_piece_shaded(&mut self, unit: UnitId, piece: &str, shaded: bool) {
        let result = if shaded {
            self.sim.enable_shading(unit, piece)
        } else {
            self.sim.disable_shading(unit, piece)
        };
        report("shade", result);
    }

    fn emit_piece_effect(&mut self, unit: UnitId, piece: &str, effect: PieceEffect) {
        self.sim.events.push(GameEvent::PieceEffect {
            unit_id: unit,
            piece: piece.to_string(),
            effect,
        });
    }

    fn set_activation(&mut self, unit: UnitId, active: bool) {
        let result = if active {
            self.sim.activate_unit(unit)
        } else {
            self.sim.deactivate_unit(unit)
        };
        report("activation", result);
    }

    fn set_build_stance(&mut self, unit: UnitId, value: bool) {
        report("build stance", self.sim.set_build_stance(unit, value));
    }

    fn set_yard_open(&mut self, unit: UnitId, open: bool) {
        report("yard", self.sim.set_yard_open(unit, open));
    }

    fn set_bugger_off(&mut self, unit: UnitId, value: bool) {
        report("bugger off", self.sim.set_bugger_off(unit, value));
    }

    fn set_standing_move_orders(&mut self, unit: UnitId, value: i32) {
        report(
            "move orders",
            self.sim.unit_mut(unit).map(|u| u.move_orders = value),
        );
    }

    fn set_standing_fire_orders(&mut self, unit: UnitId, value: i32) {
        report(
            "fire orders",
            self.sim.unit_mut(unit).map(|u| u.fire_orders = value),
        );
    }

    fn set_armored(&mut self, unit: UnitId, value: bool) {
        report("armored", self.sim.unit_mut(unit).map(|u| u.armored = value));
    }
}

impl GameSimulation {
    /// Start the script function `name` on unit `id`.
    ///
    /// Returns `Ok(None)` if the script has no such function. The thread
    /// first runs on the next tick.
    pub fn start_unit_script(
        &mut self,
        id: UnitId,
        name: &str,
        params: impl IntoIterator<Item = i32>,
    ) -> Result<Option<ThreadId>, SimError> {
        let unit = self.unit_mut(id)?;
        let Some(env) = unit.cob_env.as_mut() else {
            log::warn!("unit {id} started `{name}` while its scripts were running");
            return Ok(None);
        };
        Ok(env.create_thread_by_name(name, params))
    }

    /// Run the script function `name` on unit `id` to completion now and
    /// return its return locals.
    ///
    /// `Ok(None)` if the function does not exist, suspends (the thread is
    /// discarded), or faults.
    pub fn run_script_query(
        &mut self,
        id: UnitId,
        name: &str,
        params: impl IntoIterator<Item = i32>,
    ) -> Result<Option<Locals>, SimError> {
        let Some(mut env) = self.unit_mut(id)?.cob_env.take() else {
            return Ok(None);
        };
        let locals = match env.create_thread_by_name(name, params) {
            Some(thread_id) => match env.take_thread(thread_id) {
                Some(mut thread) => match self.resume_thread(id, &mut env, &mut thread) {
                    Ok(None) => Some(thread.return_locals),
                    Ok(Some(state)) => {
                        log::debug!("query `{name}` on unit {id} suspended ({state:?})");
                        None
                    }
                    Err(e) => {
                        log::error!("query `{name}` on unit {id} faulted: {e}");
                        None
                    }
                },
                None => None,
            },
            None => None,
        };
        self.reattach_env(id, env);
        Ok(locals)
    }

    /// Resume every ready script thread of unit `id`.
    ///
    /// A faulting thread is logged and removed; the others still run.
    pub fn run_unit_scripts(&mut self, id: UnitId) -> Result<(), SimError> {
        let Some(mut env) = self.unit_mut(id)?.cob_env.take() else {
            return Ok(());
        };

        for thread_id in env.thread_ids() {
            // Killed by a signal from an earlier thread this tick.
            let Some(mut thread) = env.take_thread(thread_id) else {
                continue;
            };
            match self.is_thread_ready(id, env.script(), thread.state) {
                Ok(false) => {
                    env.restore_thread(thread_id, thread);
                    continue;
                }
                Ok(true) => {}
                Err(e) => {
                    log::error!("unit {id} thread {thread_id} ({}) faulted: {e}", thread.name);
                    continue;
                }
            }

            thread.state = ThreadState::Ready;
            match self.resume_thread(id, &mut env, &mut thread) {
                Ok(Some(state)) => {
                    log::trace!("unit {id} thread {thread_id} suspended: {state:?}");
                    thread.state = state;
                    env.restore_thread(thread_id, thread);
                }
                Ok(None) => log::debug!("unit {id} thread {thread_id} ({}) finished", thread.name),
                Err(e) => {
                    log::error!("unit {id} thread {thread_id} ({}) faulted: {e}", thread.name)
                }
            }
        }

        self.reattach_env(id, env);
        Ok(())
    }

    fn reattach_env(&mut self, id: UnitId, env: CobEnvironment) {
        if let Some(unit) = self.units.get_mut(&id) {
            unit.cob_env = Some(env);
        }
    }

    /// Run `thread` until it finishes (`None`) or suspends (its new
    /// state). Motion commands are applied as they arrive.
    fn resume_thread(
        &mut self,
        id: UnitId,
        env: &mut CobEnvironment,
        thread: &mut CobThread,
    ) -> Result<Option<ThreadState>, ScriptError> {
        loop {
            let status = {
                let mut host = SimScriptHost::new(self);
                CobExecutionContext::new(&mut host, env, thread, id).execute()?
            };
            match status {
                CobStatus::Finished => return Ok(None),
                CobStatus::Motion(command) => self.apply_motion(id, env.script(), command)?,
                CobStatus::Blocked(BlockedStatus::Move { object, axis }) => {
                    return Ok(Some(ThreadState::WaitingForMove { object, axis }))
                }
                CobStatus::Blocked(BlockedStatus::Turn { object, axis }) => {
                    return Ok(Some(ThreadState::WaitingForTurn { object, axis }))
                }
                CobStatus::Sleeping { duration } => {
                    let wake_at = self.game_time + GameTime(duration.to_ticks());
                    return Ok(Some(ThreadState::Sleeping { wake_at }));
                }
            }
        }
    }

    fn is_thread_ready(
        &self,
        id: UnitId,
        script: &CobScript,
        state: ThreadState,
    ) -> Result<bool, ScriptError> {
        match state {
            ThreadState::Ready => Ok(true),
            ThreadState::Sleeping { wake_at } => Ok(self.game_time >= wake_at),
            ThreadState::WaitingForMove { object, axis } => {
                Ok(!self.is_piece_busy(id, script, object, |p| p.is_moving(axis))?)
            }
            ThreadState::WaitingForTurn { object, axis } => {
                Ok(!self.is_piece_busy(id, script, object, |p| p.is_turning(axis))?)
            }
        }
    }

    fn is_piece_busy(
        &self,
        id: UnitId,
        script: &CobScript,
        object: u32,
        busy: impl Fn(&UnitPiece) -> bool,
    ) -> Result<bool, ScriptError> {
        let name = script
            .piece_name(object)
            .ok_or(ScriptError::UnknownPiece { index: object })?;
        match self.units.get(&id).and_then(|u| u.find_piece(name)) {
            Some(piece) => Ok(busy(piece)),
            None => {
                log::warn!("unit {id} waits on missing piece `{name}`");
                Ok(false)
            }
        }
    }

    fn apply_motion(
        &mut self,
        id: UnitId,
        script: &CobScript,
        command: MotionCommand,
    ) -> Result<(), ScriptError> {
        let name = script
            .piece_name(command.object)
            .ok_or(ScriptError::UnknownPiece {
                index: command.object,
            })?;
        let axis = command.axis;
        let result = match command.kind {
            MotionKind::Move { position, speed } => {
                self.move_object(id, name, axis, position.to_world(), speed.per_tick())
            }
            MotionKind::MoveNow { position } => {
                self.move_object_now(id, name, axis, position.to_world())
            }
            MotionKind::Turn { angle, speed } => {
                self.turn_object(id, name, axis, angle.to_sim(), speed.per_tick())
            }
            MotionKind::TurnNow { angle } => self.turn_object_now(id, name, axis, angle.to_sim()),
            MotionKind::Spin {
                target_speed,
                acceleration,
            } => self.spin_object(
                id,
                name,
                axis,
                target_speed.per_tick(),
                acceleration.per_tick(),
            ),
            MotionKind::StopSpin { deceleration } => {
                self.stop_spin_object(id, name, axis, deceleration.per_tick())
            }
        };
        if let Err(e) = result {
            log::warn!("motion on unit {id} ignored: {e}");
        }
        Ok(())
    }
}
