//! Piece animation and unit flags, as driven by scripts and the scene.

use skirmish_core::{Axis, SimAngle, SimScalar, SimVector, UnitId};

use crate::error::SimError;
use crate::event::GameEvent;
use crate::piece::UnitPiece;
use crate::simulation::GameSimulation;

impl GameSimulation {
    fn piece_mut(&mut self, unit: UnitId, name: &str) -> Result<&mut UnitPiece, SimError> {
        self.unit_mut(unit)?
            .find_piece_mut(name)
            .ok_or_else(|| SimError::UnknownPiece {
                unit,
                name: name.to_string(),
            })
    }

    fn piece(&self, unit: UnitId, name: &str) -> Result<&UnitPiece, SimError> {
        self.unit(unit)?
            .find_piece(name)
            .ok_or_else(|| SimError::UnknownPiece {
                unit,
                name: name.to_string(),
            })
    }

    // ── Pieces ─────────────────────────────────────────────────────

    /// Make a piece visible.
    pub fn show_object(&mut self, unit: UnitId, name: &str) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.visible = true;
        Ok(())
    }

    /// Hide a piece.
    pub fn hide_object(&mut self, unit: UnitId, name: &str) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.visible = false;
        Ok(())
    }

    /// Light a piece.
    pub fn enable_shading(&mut self, unit: UnitId, name: &str) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.shaded = true;
        Ok(())
    }

    /// Stop lighting a piece.
    pub fn disable_shading(&mut self, unit: UnitId, name: &str) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.shaded = false;
        Ok(())
    }

    /// Start translating a piece along `axis` toward `position`.
    pub fn move_object(
        &mut self,
        unit: UnitId,
        name: &str,
        axis: Axis,
        position: SimScalar,
        speed: SimScalar,
    ) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.move_to(axis, position, speed);
        Ok(())
    }

    /// Translate a piece along `axis` to `position` at once.
    pub fn move_object_now(
        &mut self,
        unit: UnitId,
        name: &str,
        axis: Axis,
        position: SimScalar,
    ) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.move_now(axis, position);
        Ok(())
    }

    /// Start rotating a piece about `axis` toward `angle`.
    pub fn turn_object(
        &mut self,
        unit: UnitId,
        name: &str,
        axis: Axis,
        angle: SimAngle,
        speed: i32,
    ) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.turn_to(axis, angle, speed);
        Ok(())
    }

    /// Rotate a piece about `axis` to `angle` at once.
    pub fn turn_object_now(
        &mut self,
        unit: UnitId,
        name: &str,
        axis: Axis,
        angle: SimAngle,
    ) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.turn_now(axis, angle);
        Ok(())
    }

    /// Spin a piece about `axis`.
    pub fn spin_object(
        &mut self,
        unit: UnitId,
        name: &str,
        axis: Axis,
        speed: i32,
        acceleration: i32,
    ) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.spin(axis, speed, acceleration);
        Ok(())
    }

    /// Wind down a piece's spin about `axis`.
    pub fn stop_spin_object(
        &mut self,
        unit: UnitId,
        name: &str,
        axis: Axis,
        deceleration: i32,
    ) -> Result<(), SimError> {
        self.piece_mut(unit, name)?.stop_spin(axis, deceleration);
        Ok(())
    }

    /// True while a piece is translating along `axis`.
    pub fn is_piece_moving(&self, unit: UnitId, name: &str, axis: Axis) -> Result<bool, SimError> {
        Ok(self.piece(unit, name)?.is_moving(axis))
    }

    /// True while a piece is turning (or winding down a spin) about `axis`.
    pub fn is_piece_turning(
        &self,
        unit: UnitId,
        name: &str,
        axis: Axis,
    ) -> Result<bool, SimError> {
        Ok(self.piece(unit, name)?.is_turning(axis))
    }

    /// World position of a named piece.
    pub fn get_unit_piece_position(&self, unit: UnitId, name: &str) -> Result<SimVector, SimError> {
        let state = self.unit(unit)?;
        state
            .find_piece_index(name)
            .and_then(|i| state.piece_world_position(i))
            .ok_or_else(|| SimError::UnknownPiece {
                unit,
                name: name.to_string(),
            })
    }

    // ── Unit flags ─────────────────────────────────────────────────

    /// Turn a unit on.
    pub fn activate_unit(&mut self, unit: UnitId) -> Result<(), SimError> {
        self.unit_mut(unit)?.activate();
        self.events.push(GameEvent::UnitActivated { unit_id: unit });
        Ok(())
    }

    /// Turn a unit off.
    pub fn deactivate_unit(&mut self, unit: UnitId) -> Result<(), SimError> {
        self.unit_mut(unit)?.deactivate();
        self.events.push(GameEvent::UnitDeactivated { unit_id: unit });
        Ok(())
    }

    /// Enter or leave the build stance.
    pub fn set_build_stance(&mut self, unit: UnitId, value: bool) -> Result<(), SimError> {
        self.unit_mut(unit)?.in_build_stance = value;
        Ok(())
    }

    /// Open or close a building's yard, unless something is in the way.
    pub fn set_yard_open(&mut self, unit: UnitId, open: bool) -> Result<(), SimError> {
        if !self.try_set_yard_open(unit, open)? {
            log::debug!("yard of unit {unit} blocked, staying open={}", !open);
        }
        Ok(())
    }

    /// Clear units off a building's footprint. `false` is a no-op.
    pub fn set_bugger_off(&mut self, unit: UnitId, value: bool) -> Result<(), SimError> {
        if value {
            self.emit_bugger_off(unit)?;
        }
        Ok(())
    }

    /// Kill a unit without a wreck or an explosion.
    pub fn quietly_kill_unit(&mut self, unit: UnitId) -> Result<(), SimError> {
        self.unit_mut(unit)?.mark_as_dead_no_corpse();
        Ok(())
    }

    // ── Events ─────────────────────────────────────────────────────

    /// Drain every event recorded since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded since the last [`take_events`](Self::take_events).
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}
