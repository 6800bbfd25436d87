//! The fetch-decode-execute loop.

use skirmish_core::{
    math, Axis, CobHost, PieceEffect, SimAngle, SimScalar, SimVector, UnitId, UnitView,
};

use crate::environment::CobEnvironment;
use crate::error::ScriptError;
use crate::opcode::OpCode;
use crate::status::{BlockedStatus, CobStatus, MotionCommand, MotionKind};
use crate::thread::{CobFunctionFrame, CobThread};
use crate::units::{
    pack_coords, unpack_coords, CobAngle, CobAngularSpeed, CobPosition, CobSleepDuration,
    CobSpeed,
};
use crate::value_id::CobValueId;
use crate::{COB_FALSE, COB_TRUE};

fn cob_bool(b: bool) -> i32 {
    if b {
        COB_TRUE
    } else {
        COB_FALSE
    }
}

/// Everything one thread needs to run: the host simulation, the unit's
/// environment, the (detached) thread itself and the unit's id.
///
/// Construct one per resumption; it holds no state of its own.
pub struct CobExecutionContext<'a> {
    host: &'a mut dyn CobHost,
    env: &'a mut CobEnvironment,
    thread: &'a mut CobThread,
    unit_id: UnitId,
}

impl<'a> CobExecutionContext<'a> {
    /// Bind a thread of `unit_id` for execution.
    ///
    /// `thread` must not be stored in `env` while it runs.
    pub fn new(
        host: &'a mut dyn CobHost,
        env: &'a mut CobEnvironment,
        thread: &'a mut CobThread,
        unit_id: UnitId,
    ) -> Self {
        Self {
            host,
            env,
            thread,
            unit_id,
        }
    }

    /// Run the thread until it finishes or must suspend.
    ///
    /// Motion, wait and sleep opcodes return immediately with the
    /// instruction pointer already past them, so the next call continues
    /// with the following instruction.
    pub fn execute(&mut self) -> Result<CobStatus, ScriptError> {
        while !self.thread.is_finished() {
            let address = self.instruction_pointer();
            let word = self.next_instruction()?;
            let op = OpCode::try_from(word)
                .map_err(|word| ScriptError::UnknownOpcode { word, address })?;

            match op {
                OpCode::Rand => self.random_number(),

                OpCode::Add => self.binary(i32::wrapping_add),
                OpCode::Sub => self.binary(i32::wrapping_sub),
                OpCode::Mul => self.binary(i32::wrapping_mul),
                OpCode::Div => self.binary(|a, b| if b == 0 { 0 } else { a.wrapping_div(b) }),

                OpCode::SetLess => self.binary(|a, b| cob_bool(a < b)),
                OpCode::SetLessOrEqual => self.binary(|a, b| cob_bool(a <= b)),
                OpCode::SetEqual => self.binary(|a, b| cob_bool(a == b)),
                OpCode::SetNotEqual => self.binary(|a, b| cob_bool(a != b)),
                OpCode::SetGreater => self.binary(|a, b| cob_bool(a > b)),
                OpCode::SetGreaterOrEqual => self.binary(|a, b| cob_bool(a >= b)),

                OpCode::Jump => {
                    let target = self.next_instruction()?;
                    self.jump_to(target);
                }
                OpCode::JumpIfZero => {
                    let target = self.next_instruction()?;
                    if self.thread.pop() == 0 {
                        self.jump_to(target);
                    }
                }

                OpCode::LogicalAnd => self.binary(|a, b| cob_bool(a != 0 && b != 0)),
                OpCode::LogicalOr => self.binary(|a, b| cob_bool(a != 0 || b != 0)),
                OpCode::LogicalXor => self.binary(|a, b| cob_bool((a != 0) != (b != 0))),
                OpCode::LogicalNot => {
                    let v = self.thread.pop();
                    self.thread.push(cob_bool(v == 0));
                }

                OpCode::BitwiseAnd => self.binary(|a, b| a & b),
                OpCode::BitwiseOr => self.binary(|a, b| a | b),
                OpCode::BitwiseXor => self.binary(|a, b| a ^ b),
                OpCode::BitwiseNot => {
                    let v = self.thread.pop();
                    self.thread.push(!v);
                }

                OpCode::Move => {
                    let (object, axis) = self.next_object_and_axis()?;
                    let position = CobPosition(self.thread.pop());
                    let speed = CobSpeed(self.thread.pop());
                    return Ok(motion(object, axis, MotionKind::Move { position, speed }));
                }
                OpCode::MoveNow => {
                    let (object, axis) = self.next_object_and_axis()?;
                    let position = CobPosition(self.thread.pop());
                    return Ok(motion(object, axis, MotionKind::MoveNow { position }));
                }
                OpCode::Turn => {
                    let (object, axis) = self.next_object_and_axis()?;
                    let angle = CobAngle(self.thread.pop());
                    let speed = CobAngularSpeed(self.thread.pop());
                    return Ok(motion(object, axis, MotionKind::Turn { angle, speed }));
                }
                OpCode::TurnNow => {
                    let (object, axis) = self.next_object_and_axis()?;
                    let angle = CobAngle(self.thread.pop());
                    return Ok(motion(object, axis, MotionKind::TurnNow { angle }));
                }
                OpCode::Spin => {
                    let (object, axis) = self.next_object_and_axis()?;
                    let target_speed = CobAngularSpeed(self.thread.pop());
                    let acceleration = CobAngularSpeed(self.thread.pop());
                    return Ok(motion(
                        object,
                        axis,
                        MotionKind::Spin {
                            target_speed,
                            acceleration,
                        },
                    ));
                }
                OpCode::StopSpin => {
                    let (object, axis) = self.next_object_and_axis()?;
                    let deceleration = CobAngularSpeed(self.thread.pop());
                    return Ok(motion(object, axis, MotionKind::StopSpin { deceleration }));
                }

                OpCode::Explode => {
                    let piece = self.next_piece_name()?;
                    let explosion_type = self.thread.pop();
                    self.host.emit_piece_effect(
                        self.unit_id,
                        &piece,
                        PieceEffect::Explode { explosion_type },
                    );
                }
                OpCode::EmitSfx => {
                    let piece = self.next_piece_name()?;
                    let sfx_type = self.thread.pop();
                    self.host
                        .emit_piece_effect(self.unit_id, &piece, PieceEffect::Smoke { sfx_type });
                }
                OpCode::Show => {
                    let piece = self.next_piece_name()?;
                    self.host.set_piece_visible(self.unit_id, &piece, true);
                }
                OpCode::Hide => {
                    let piece = self.next_piece_name()?;
                    self.host.set_piece_visible(self.unit_id, &piece, false);
                }
                OpCode::Shade => {
                    let piece = self.next_piece_name()?;
                    self.host.set_piece_shaded(self.unit_id, &piece, true);
                }
                OpCode::DontShade => {
                    let piece = self.next_piece_name()?;
                    self.host.set_piece_shaded(self.unit_id, &piece, false);
                }
                OpCode::Cache | OpCode::DontCache => {
                    // Piece caching is a renderer hint with no simulation effect.
                    self.next_instruction()?;
                }
                OpCode::AttachUnit => {
                    let _piece = self.thread.pop();
                    let _unit = self.thread.pop();
                }
                OpCode::DropUnit => {
                    let _unit = self.thread.pop();
                }

                OpCode::WaitForMove => {
                    let (object, axis) = self.next_object_and_axis()?;
                    return Ok(CobStatus::Blocked(BlockedStatus::Move { object, axis }));
                }
                OpCode::WaitForTurn => {
                    let (object, axis) = self.next_object_and_axis()?;
                    return Ok(CobStatus::Blocked(BlockedStatus::Turn { object, axis }));
                }
                OpCode::Sleep => {
                    let duration = CobSleepDuration(self.thread.pop());
                    return Ok(CobStatus::Sleeping { duration });
                }

                OpCode::CallScript => self.call_script()?,
                OpCode::Return => self.return_from_script(),
                OpCode::StartScript => self.start_script()?,

                OpCode::Signal => {
                    let signal = self.thread.pop() as u32;
                    // The running thread is detached, so it cannot kill itself.
                    self.env.send_signal(signal, None);
                }
                OpCode::SetSignalMask => {
                    self.thread.signal_mask = self.thread.pop() as u32;
                }

                OpCode::CreateLocalVar => {
                    if let Some(frame) = self.thread.frame_mut() {
                        if frame.local_count == frame.locals.len() {
                            frame.locals.push(0);
                        }
                        frame.local_count += 1;
                    }
                }
                OpCode::PushConstant => {
                    let constant = self.next_instruction()?;
                    self.thread.push(constant as i32);
                }
                OpCode::PushLocalVar => {
                    let index = self.next_instruction()?;
                    let value = *self.local_slot(index)?;
                    self.thread.push(value);
                }
                OpCode::PopLocalVar => {
                    let index = self.next_instruction()?;
                    let value = self.thread.pop();
                    *self.local_slot(index)? = value;
                }
                OpCode::PushStatic => {
                    let index = self.next_instruction()?;
                    let value = self.env.get_static(index)?;
                    self.thread.push(value);
                }
                OpCode::PopStatic => {
                    let index = self.next_instruction()?;
                    let value = self.thread.pop();
                    self.env.set_static(index, value)?;
                }
                OpCode::PopStack => {
                    self.thread.pop();
                }

                OpCode::GetValue => {
                    let value_id = self.thread.pop();
                    let value = self.get_value(value_id, 0, 0)?;
                    self.thread.push(value);
                }
                OpCode::GetValueWithArgs => {
                    let _arg4 = self.thread.pop();
                    let _arg3 = self.thread.pop();
                    let arg2 = self.thread.pop();
                    let arg1 = self.thread.pop();
                    let value_id = self.thread.pop();
                    let value = self.get_value(value_id, arg1, arg2)?;
                    self.thread.push(value);
                }
                OpCode::SetValue => {
                    let value = self.thread.pop();
                    let value_id = self.thread.pop();
                    self.set_value(value_id, value)?;
                }
            }
        }

        Ok(CobStatus::Finished)
    }

    // ── Instruction stream ──────────────────────────────────────

    fn instruction_pointer(&self) -> usize {
        self.thread.frame().map_or(0, |f| f.instruction_index)
    }

    fn next_instruction(&mut self) -> Result<u32, ScriptError> {
        let instructions = &self.env.script().instructions;
        let frame = self
            .thread
            .frame_mut()
            .ok_or(ScriptError::InstructionOutOfRange { address: 0 })?;
        let address = frame.instruction_index;
        let word = *instructions
            .get(address)
            .ok_or(ScriptError::InstructionOutOfRange { address })?;
        frame.instruction_index += 1;
        Ok(word)
    }

    fn next_object_and_axis(&mut self) -> Result<(u32, Axis), ScriptError> {
        let object = self.next_instruction()?;
        let word = self.next_instruction()?;
        let axis = Axis::from_word(word).ok_or(ScriptError::InvalidAxis { word })?;
        Ok((object, axis))
    }

    fn next_piece_name(&mut self) -> Result<String, ScriptError> {
        let object = self.next_instruction()?;
        self.piece_name(object)
    }

    fn piece_name(&self, object: u32) -> Result<String, ScriptError> {
        self.env
            .script()
            .piece_name(object)
            .map(str::to_owned)
            .ok_or(ScriptError::UnknownPiece { index: object })
    }

    fn jump_to(&mut self, target: u32) {
        if let Some(frame) = self.thread.frame_mut() {
            frame.instruction_index = target as usize;
        }
    }

    // ── Operand helpers ─────────────────────────────────────────

    fn binary(&mut self, op: impl FnOnce(i32, i32) -> i32) {
        let b = self.thread.pop();
        let a = self.thread.pop();
        self.thread.push(op(a, b));
    }

    fn random_number(&mut self) {
        let high = self.thread.pop();
        let low = self.thread.pop();
        let value = self.host.random_range(low.min(high), low.max(high));
        self.thread.push(value);
    }

    fn local_slot(&mut self, index: u32) -> Result<&mut i32, ScriptError> {
        let frame = self
            .thread
            .frame_mut()
            .ok_or(ScriptError::LocalOutOfRange { index, count: 0 })?;
        let count = frame.locals.len();
        frame
            .locals
            .get_mut(index as usize)
            .ok_or(ScriptError::LocalOutOfRange { index, count })
    }

    fn pop_params(&mut self, count: u32) -> Vec<i32> {
        (0..count).map(|_| self.thread.pop()).collect()
    }

    // ── Calls ───────────────────────────────────────────────────

    fn call_script(&mut self) -> Result<(), ScriptError> {
        let function = self.next_instruction()?;
        let param_count = self.next_instruction()?;
        let params = self.pop_params(param_count);
        let address = self
            .env
            .script()
            .function(function)
            .ok_or(ScriptError::UnknownFunction { index: function })?
            .address;
        self.thread
            .call_stack
            .push(CobFunctionFrame::new(address, params));
        Ok(())
    }

    fn return_from_script(&mut self) {
        self.thread.return_value = self.thread.pop();
        if let Some(frame) = self.thread.call_stack.pop() {
            self.thread.return_locals = frame.locals;
        }
    }

    fn start_script(&mut self) -> Result<(), ScriptError> {
        let function = self.next_instruction()?;
        let param_count = self.next_instruction()?;
        let params = self.pop_params(param_count);
        self.env
            .create_thread(function, params, self.thread.signal_mask)?;
        Ok(())
    }

    // ── Linked values ───────────────────────────────────────────

    fn own_unit(&self) -> Result<UnitView, ScriptError> {
        self.host.unit(self.unit_id).ok_or(ScriptError::MissingUnit {
            unit: self.unit_id.0,
        })
    }

    fn target_unit(&self, id: i32) -> Option<UnitView> {
        self.host.unit(UnitId(id as u32))
    }

    fn piece_world_position(&self, object: i32) -> Result<SimVector, ScriptError> {
        let name = self.piece_name(object as u32)?;
        self.host
            .piece_position(self.unit_id, &name)
            .ok_or(ScriptError::MissingPiece { name })
    }

    fn get_value(&mut self, value_id: i32, arg1: i32, arg2: i32) -> Result<i32, ScriptError> {
        let value =
            CobValueId::from_id(value_id).ok_or(ScriptError::UnknownValueId { id: value_id })?;
        let result = match value {
            CobValueId::Activation => cob_bool(self.own_unit()?.activated),
            CobValueId::StandingMoveOrders => self.own_unit()?.move_orders,
            CobValueId::StandingFireOrders => self.own_unit()?.fire_orders,
            CobValueId::Health => {
                let unit = self.own_unit()?;
                if unit.max_hit_points == 0 {
                    0
                } else {
                    (unit.hit_points as u64 * 100 / unit.max_hit_points as u64) as i32
                }
            }
            CobValueId::InBuildStance => cob_bool(self.own_unit()?.in_build_stance),
            CobValueId::Busy => COB_FALSE,
            CobValueId::PieceXZ => {
                let pos = self.piece_world_position(arg1)?;
                pack_coords(pos.x, pos.z)
            }
            CobValueId::PieceY => self.piece_world_position(arg1)?.y.raw(),
            CobValueId::UnitXZ => self
                .target_unit(arg1)
                .map_or(0, |u| pack_coords(u.position.x, u.position.z)),
            CobValueId::UnitY => self.target_unit(arg1).map_or(0, |u| u.position.y.raw()),
            CobValueId::UnitHeight => self.target_unit(arg1).map_or(0, |u| u.height.raw()),
            CobValueId::XZAtan => {
                let (x, z) = unpack_coords(arg1);
                let unit = self.own_unit()?;
                // Scripts measure headings from -Z; unit rotation 0 faces +Z.
                let facing = unit.rotation - SimAngle::HALF_TURN;
                CobAngle::from_sim(math::atan2(x, z) - facing).0
            }
            CobValueId::XZHypot => {
                let (x, z) = unpack_coords(arg1);
                CobPosition::from_world(math::hypot(x, z)).0
            }
            CobValueId::Atan => {
                let angle = math::atan2(SimScalar::from_raw(arg1), SimScalar::from_raw(arg2));
                CobAngle::from_sim(angle).0
            }
            CobValueId::Hypot => {
                let a = CobPosition(arg1).to_world();
                let b = CobPosition(arg2).to_world();
                CobPosition::from_world(math::hypot(a, b)).0
            }
            CobValueId::GroundHeight => {
                let (x, z) = unpack_coords(arg1);
                self.host.ground_height(x, z).raw()
            }
            CobValueId::BuildPercentLeft => self.own_unit()?.build_percent_left as i32,
            CobValueId::YardOpen => cob_bool(self.own_unit()?.yard_open),
            CobValueId::BuggerOff => COB_FALSE,
            CobValueId::Armored => cob_bool(self.own_unit()?.armored),
            CobValueId::VeteranLevel => 0,
            // Every replica runs every unit; state may not depend on the machine.
            CobValueId::UnitIsOnThisComp => COB_TRUE,
            CobValueId::MinId => self.host.min_unit_id() as i32,
            CobValueId::MaxId => self.host.max_unit_id() as i32,
            CobValueId::MyId => self.unit_id.0 as i32,
            CobValueId::UnitTeam => self.target_unit(arg1).map_or(0, |u| u.owner.0 as i32),
            CobValueId::UnitBuildPercentLeft => self
                .target_unit(arg1)
                .map_or(0, |u| u.build_percent_left as i32),
            CobValueId::UnitAllied => {
                let owner = self.own_unit()?.owner;
                self.target_unit(arg1)
                    .map_or(0, |u| cob_bool(u.owner == owner))
            }
        };
        Ok(result)
    }

    fn set_value(&mut self, value_id: i32, value: i32) -> Result<(), ScriptError> {
        let id =
            CobValueId::from_id(value_id).ok_or(ScriptError::UnknownValueId { id: value_id })?;
        let unit = self.unit_id;
        match id {
            CobValueId::Activation => self.host.set_activation(unit, value != 0),
            CobValueId::StandingMoveOrders => self.host.set_standing_move_orders(unit, value),
            CobValueId::StandingFireOrders => self.host.set_standing_fire_orders(unit, value),
            CobValueId::InBuildStance => self.host.set_build_stance(unit, value != 0),
            CobValueId::Busy => {}
            CobValueId::YardOpen => self.host.set_yard_open(unit, value != 0),
            CobValueId::BuggerOff => self.host.set_bugger_off(unit, value != 0),
            CobValueId::Armored => self.host.set_armored(unit, value != 0),
            other => return Err(ScriptError::ReadOnlyValue { value: other }),
        }
        Ok(())
    }
}

fn motion(object: u32, axis: Axis, kind: MotionKind) -> CobStatus {
    CobStatus::Motion(MotionCommand { object, axis, kind })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{CobFunctionInfo, CobScript};
    use proptest::prelude::*;
    use skirmish_core::PlayerId;
    use std::sync::Arc;

    // ── Test host ───────────────────────────────────────────────

    #[derive(Default)]
    struct StubHost {
        units: Vec<(UnitId, UnitView)>,
        visible: Vec<(String, bool)>,
        activations: Vec<bool>,
    }

    fn view(owner: u32) -> UnitView {
        UnitView {
            position: SimVector::from_ints(10, 2, -4),
            rotation: SimAngle::HALF_TURN,
            height: SimScalar::from_int(3),
            owner: PlayerId(owner),
            hit_points: 50,
            max_hit_points: 200,
            activated: true,
            in_build_stance: false,
            yard_open: false,
            build_percent_left: 0,
            fire_orders: 0,
            move_orders: 0,
            armored: false,
        }
    }

    impl CobHost for StubHost {
        fn random_range(&mut self, low: i32, _high: i32) -> i32 {
            low
        }
        fn unit(&self, unit: UnitId) -> Option<UnitView> {
            self.units
                .iter()
                .find(|(id, _)| *id == unit)
                .map(|(_, v)| v.clone())
        }
        fn piece_position(&self, _unit: UnitId, piece: &str) -> Option<SimVector> {
            (piece == "turret").then(|| SimVector::from_ints(1, 5, 2))
        }
        fn ground_height(&self, _x: SimScalar, _z: SimScalar) -> SimScalar {
            SimScalar::from_int(7)
        }
        fn min_unit_id(&self) -> u32 {
            1
        }
        fn max_unit_id(&self) -> u32 {
            9
        }
        fn set_piece_visible(&mut self, _unit: UnitId, piece: &str, visible: bool) {
            self.visible.push((piece.to_string(), visible));
        }
        fn set_piece_shaded(&mut self, _unit: UnitId, _piece: &str, _shaded: bool) {}
        fn emit_piece_effect(&mut self, _unit: UnitId, _piece: &str, _effect: PieceEffect) {}
        fn set_activation(&mut self, _unit: UnitId, active: bool) {
            self.activations.push(active);
        }
        fn set_build_stance(&mut self, _unit: UnitId, _value: bool) {}
        fn set_yard_open(&mut self, _unit: UnitId, _open: bool) {}
        fn set_bugger_off(&mut self, _unit: UnitId, _value: bool) {}
        fn set_standing_move_orders(&mut self, _unit: UnitId, _value: i32) {}
        fn set_standing_fire_orders(&mut self, _unit: UnitId, _value: i32) {}
        fn set_armored(&mut self, _unit: UnitId, _value: bool) {}
    }

    const ME: UnitId = UnitId(1);

    fn host() -> StubHost {
        StubHost {
            units: vec![(ME, view(0)), (UnitId(2), view(1))],
            ..Default::default()
        }
    }

    fn env_with(instructions: Vec<u32>) -> CobEnvironment {
        CobEnvironment::new(Arc::new(CobScript {
            instructions,
            functions: vec![CobFunctionInfo {
                name: "Main".to_string(),
                address: 0,
            }],
            pieces: vec!["base".to_string(), "turret".to_string()],
            static_variable_count: 1,
        }))
    }

    fn push(c: i32) -> [u32; 2] {
        [OpCode::PushConstant.word(), c as u32]
    }

    fn program(parts: &[&[u32]]) -> Vec<u32> {
        parts.iter().flat_map(|p| p.iter().copied()).collect()
    }

    fn run(
        host: &mut StubHost,
        instructions: Vec<u32>,
    ) -> (Result<CobStatus, ScriptError>, CobThread, CobEnvironment) {
        let mut env = env_with(instructions);
        let mut thread = CobThread::new("Main", 0, [], 0);
        let status = CobExecutionContext::new(host, &mut env, &mut thread, ME).execute();
        (status, thread, env)
    }

    /// Run `body` followed by a zero sleep so the stack survives.
    fn eval(body: &[&[u32]]) -> Vec<i32> {
        let mut words = program(body);
        words.extend(push(0));
        words.push(OpCode::Sleep.word());
        let (status, thread, _) = run(&mut host(), words);
        assert!(matches!(status, Ok(CobStatus::Sleeping { .. })));
        thread.stack
    }

    // ── Arithmetic and logic ────────────────────────────────────

    #[test]
    fn binary_ops_pop_b_then_a() {
        assert_eq!(eval(&[&push(7), &push(3), &[OpCode::Sub.word()]]), vec![4]);
        assert_eq!(eval(&[&push(7), &push(2), &[OpCode::Div.word()]]), vec![3]);
        assert_eq!(eval(&[&push(-7), &push(2), &[OpCode::Div.word()]]), vec![-3]);
        assert_eq!(eval(&[&push(1), &push(2), &[OpCode::SetLess.word()]]), vec![1]);
        assert_eq!(eval(&[&push(2), &push(1), &[OpCode::SetLess.word()]]), vec![0]);
    }

    #[test]
    fn division_by_zero_yields_zero() {
        assert_eq!(eval(&[&push(9), &push(0), &[OpCode::Div.word()]]), vec![0]);
        assert_eq!(
            eval(&[&push(i32::MIN), &push(-1), &[OpCode::Div.word()]]),
            vec![i32::MIN]
        );
    }

    #[test]
    fn logic_coerces_to_booleans() {
        assert_eq!(eval(&[&push(5), &push(3), &[OpCode::LogicalAnd.word()]]), vec![1]);
        assert_eq!(eval(&[&push(5), &push(3), &[OpCode::LogicalXor.word()]]), vec![0]);
        assert_eq!(eval(&[&push(0), &[OpCode::LogicalNot.word()]]), vec![1]);
        assert_eq!(eval(&[&push(0), &[OpCode::BitwiseNot.word()]]), vec![-1]);
    }

    #[test]
    fn empty_stack_pops_zero() {
        assert_eq!(eval(&[&[OpCode::Add.word()]]), vec![0]);
        assert_eq!(eval(&[&[OpCode::PopStack.word()], &push(4)]), vec![4]);
    }

    #[test]
    fn rand_passes_ordered_bounds() {
        assert_eq!(eval(&[&push(9), &push(3), &[OpCode::Rand.word()]]), vec![3]);
    }

    // ── Control flow ────────────────────────────────────────────

    #[test]
    fn jump_if_zero_only_jumps_on_zero() {
        // 0: push v; 2: jz 6; 4: push 1; 6: push 0; 8: sleep
        let body = |v: i32| {
            program(&[
                &push(v),
                &[OpCode::JumpIfZero.word(), 6],
                &push(1),
                &push(0),
                &[OpCode::Sleep.word()],
            ])
        };
        let (_, t, _) = run(&mut host(), body(0));
        assert!(t.stack.is_empty());
        let (_, t, _) = run(&mut host(), body(5));
        assert_eq!(t.stack, vec![1]);
    }

    #[test]
    fn running_off_the_end_faults() {
        let (status, _, _) = run(&mut host(), program(&[&push(1)]));
        assert_eq!(
            status,
            Err(ScriptError::InstructionOutOfRange { address: 2 })
        );
    }

    #[test]
    fn return_finishes_thread() {
        let (status, t, _) = run(&mut host(), program(&[&push(42), &[OpCode::Return.word()]]));
        assert_eq!(status, Ok(CobStatus::Finished));
        assert!(t.is_finished());
        assert_eq!(t.return_value, 42);
    }

    #[test]
    fn unknown_opcode_faults() {
        let (status, _, _) = run(&mut host(), vec![0x1234]);
        assert_eq!(
            status,
            Err(ScriptError::UnknownOpcode {
                word: 0x1234,
                address: 0
            })
        );
    }

    // ── Suspension ──────────────────────────────────────────────

    #[test]
    fn move_pops_position_then_speed() {
        let (status, t, _) = run(
            &mut host(),
            program(&[&push(100), &push(200), &[OpCode::Move.word(), 1, 2]]),
        );
        assert_eq!(
            status,
            Ok(CobStatus::Motion(MotionCommand {
                object: 1,
                axis: Axis::Z,
                kind: MotionKind::Move {
                    position: CobPosition(200),
                    speed: CobSpeed(100),
                },
            }))
        );
        assert_eq!(t.frame().unwrap().instruction_index, 7);
    }

    #[test]
    fn invalid_axis_faults() {
        let (status, _, _) = run(&mut host(), vec![OpCode::WaitForTurn.word(), 0, 3]);
        assert_eq!(status, Err(ScriptError::InvalidAxis { word: 3 }));
    }

    #[test]
    fn wait_blocks_on_piece() {
        let (status, _, _) = run(&mut host(), vec![OpCode::WaitForMove.word(), 0, 1]);
        assert_eq!(
            status,
            Ok(CobStatus::Blocked(BlockedStatus::Move {
                object: 0,
                axis: Axis::Y
            }))
        );
    }

    // ── Variables ───────────────────────────────────────────────

    #[test]
    fn create_local_grows_once_per_declaration() {
        let (_, t, _) = run(
            &mut host(),
            program(&[
                &[OpCode::CreateLocalVar.word()],
                &[OpCode::CreateLocalVar.word()],
                &[OpCode::CreateLocalVar.word()],
                &push(0),
                &[OpCode::Sleep.word()],
            ]),
        );
        let frame = t.frame().unwrap();
        assert_eq!(frame.locals.len(), 3);
        assert_eq!(frame.local_count, 3);
    }

    #[test]
    fn locals_and_statics_round_trip() {
        let stack = eval(&[
            &[OpCode::CreateLocalVar.word()],
            &push(11),
            &[OpCode::PopLocalVar.word(), 0],
            &push(12),
            &[OpCode::PopStatic.word(), 0],
            &[OpCode::PushLocalVar.word(), 0],
            &[OpCode::PushStatic.word(), 0],
        ]);
        assert_eq!(stack, vec![11, 12]);
    }

    #[test]
    fn bad_local_index_faults() {
        let (status, _, _) = run(&mut host(), vec![OpCode::PushLocalVar.word(), 4]);
        assert_eq!(
            status,
            Err(ScriptError::LocalOutOfRange { index: 4, count: 0 })
        );
    }

    // ── Linked values ───────────────────────────────────────────

    fn get(id: CobValueId) -> Vec<u32> {
        program(&[&push(id.id()), &[OpCode::GetValue.word()]])
    }

    fn get_with(id: CobValueId, arg1: i32) -> Vec<u32> {
        program(&[
            &push(id.id()),
            &push(arg1),
            &push(0),
            &push(0),
            &push(0),
            &[OpCode::GetValueWithArgs.word()],
        ])
    }

    #[test]
    fn health_is_a_percentage() {
        assert_eq!(eval(&[&get(CobValueId::Health)]), vec![25]);
    }

    #[test]
    fn unit_queries_use_first_argument() {
        assert_eq!(eval(&[&get_with(CobValueId::UnitTeam, 2)]), vec![1]);
        assert_eq!(eval(&[&get_with(CobValueId::UnitAllied, 2)]), vec![0]);
        assert_eq!(eval(&[&get_with(CobValueId::UnitAllied, 1)]), vec![1]);
        assert_eq!(eval(&[&get_with(CobValueId::UnitXZ, 99)]), vec![0]);
        assert_eq!(
            eval(&[&get_with(CobValueId::UnitXZ, 2)]),
            vec![(10 << 16) | (-4i32 & 0xffff)]
        );
    }

    #[test]
    fn piece_queries_resolve_names() {
        assert_eq!(
            eval(&[&get_with(CobValueId::PieceY, 1)]),
            vec![SimScalar::from_int(5).raw()]
        );
        let (status, _, _) = run(&mut host(), get_with(CobValueId::PieceY, 0));
        assert_eq!(
            status,
            Err(ScriptError::MissingPiece {
                name: "base".to_string()
            })
        );
        let (status, _, _) = run(&mut host(), get_with(CobValueId::PieceXZ, 5));
        assert_eq!(status, Err(ScriptError::UnknownPiece { index: 5 }));
    }

    #[test]
    fn xz_atan_is_relative_to_facing() {
        // Rotation is a half turn, so the correction is zero.
        let stack = eval(&[&get_with(CobValueId::XZAtan, 1 << 16)]);
        assert!((stack[0] - 16384).abs() <= 1);
    }

    #[test]
    fn constant_values() {
        assert_eq!(eval(&[&get(CobValueId::UnitIsOnThisComp)]), vec![1]);
        assert_eq!(eval(&[&get(CobValueId::MyId)]), vec![1]);
        assert_eq!(eval(&[&get(CobValueId::MaxId)]), vec![9]);
        assert_eq!(
            eval(&[&get_with(CobValueId::GroundHeight, 0)]),
            vec![SimScalar::from_int(7).raw()]
        );
    }

    #[test]
    fn unknown_and_read_only_values_fault() {
        let (status, _, _) = run(
            &mut host(),
            program(&[&push(999), &[OpCode::GetValue.word()]]),
        );
        assert_eq!(status, Err(ScriptError::UnknownValueId { id: 999 }));

        let (status, _, _) = run(
            &mut host(),
            program(&[&push(CobValueId::Health.id()), &push(1), &[OpCode::SetValue.word()]]),
        );
        assert_eq!(
            status,
            Err(ScriptError::ReadOnlyValue {
                value: CobValueId::Health
            })
        );
    }

    #[test]
    fn set_value_reaches_host() {
        let mut h = host();
        let (status, _, _) = run(
            &mut h,
            program(&[
                &push(CobValueId::Activation.id()),
                &push(0),
                &[OpCode::SetValue.word()],
                &[OpCode::Show.word(), 1],
                &[OpCode::Return.word()],
            ]),
        );
        assert_eq!(status, Ok(CobStatus::Finished));
        assert_eq!(h.activations, vec![false]);
        assert_eq!(h.visible, vec![("turret".to_string(), true)]);
    }

    // ── Properties ──────────────────────────────────────────────

    fn apply(a: i32, b: i32, op: OpCode) -> Vec<i32> {
        eval(&[&push(a), &push(b), &[op.word()]])
    }

    proptest! {
        #[test]
        fn arithmetic_wraps_like_twos_complement(a in any::<i32>(), b in any::<i32>()) {
            prop_assert_eq!(apply(a, b, OpCode::Add), vec![a.wrapping_add(b)]);
            prop_assert_eq!(apply(a, b, OpCode::Sub), vec![a.wrapping_sub(b)]);
            prop_assert_eq!(apply(a, b, OpCode::Mul), vec![a.wrapping_mul(b)]);
            let quotient = if b == 0 { 0 } else { a.wrapping_div(b) };
            prop_assert_eq!(apply(a, b, OpCode::Div), vec![quotient]);
        }

        #[test]
        fn comparisons_push_exactly_zero_or_one(
            a in any::<i32>(),
            b in prop_oneof![any::<i32>(), Just(0), Just(i32::MIN), Just(i32::MAX)],
        ) {
            let cases = [
                (OpCode::SetLess, a < b),
                (OpCode::SetLessOrEqual, a <= b),
                (OpCode::SetGreater, a > b),
                (OpCode::SetGreaterOrEqual, a >= b),
                (OpCode::SetEqual, a == b),
                (OpCode::SetNotEqual, a != b),
            ];
            for (op, expected) in cases {
                let stack = apply(a, b, op);
                prop_assert_eq!(stack.len(), 1);
                prop_assert!(stack[0] == 0 || stack[0] == 1);
                prop_assert_eq!(stack[0], i32::from(expected));
            }
            prop_assert_eq!(apply(a, a, OpCode::SetEqual), vec![1]);
        }

        #[test]
        fn jump_if_zero_jumps_iff_popped_value_is_zero(
            v in prop_oneof![any::<i32>(), Just(0)],
        ) {
            // 0: push v; 2: jz 6; 4: push 1; 6: push 0; 8: sleep
            let words = program(&[
                &push(v),
                &[OpCode::JumpIfZero.word(), 6],
                &push(1),
                &push(0),
                &[OpCode::Sleep.word()],
            ]);
            let (status, t, _) = run(&mut host(), words);
            prop_assert!(matches!(status, Ok(CobStatus::Sleeping { .. })), "expected Ok(CobStatus::Sleeping)");
            let expected: Vec<i32> = if v == 0 { vec![] } else { vec![1] };
            prop_assert_eq!(t.stack, expected);
        }
    }
}
