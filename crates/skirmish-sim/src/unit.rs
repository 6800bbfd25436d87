//! Per-unit simulation state.

use std::collections::VecDeque;

use skirmish_cob::CobEnvironment;
use skirmish_core::{PlayerId, SimAngle, SimScalar, SimVector, UnitView};

use crate::order::UnitOrder;
use crate::piece::UnitPiece;
use crate::player::{Energy, Metal};

/// Whether a unit is still in play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifeState {
    /// In play.
    #[default]
    Alive,
    /// Killed; removed at the end of the tick.
    Dead,
}

/// A weapon mounted in one of a unit's slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitWeapon {
    /// Weapon type, upper-cased.
    pub weapon_type: String,
}

/// Standing fire orders value for "fire at will".
pub const FIRE_AT_WILL: i32 = 2;

/// Standing move orders value for "maneuver".
pub const MANEUVER: i32 = 1;

/// The authoritative state of one unit.
#[derive(Clone, Debug)]
pub struct UnitState {
    /// Unit type, upper-cased.
    pub unit_type: String,
    /// Owning player.
    pub owner: PlayerId,

    /// World position of the unit origin.
    pub position: SimVector,
    /// Position at the start of the tick.
    pub previous_position: SimVector,
    /// Heading about Y.
    pub rotation: SimAngle,
    /// Heading at the start of the tick.
    pub previous_rotation: SimAngle,
    /// Model height.
    pub height: SimScalar,

    /// Current hit points.
    pub hit_points: u32,
    /// Maximum hit points.
    pub max_hit_points: u32,
    /// Alive or dead.
    pub life_state: LifeState,

    /// Animated model pieces, in model order.
    pub pieces: Vec<UnitPiece>,
    /// Pending orders; the front is current.
    pub orders: VecDeque<UnitOrder>,
    /// Weapon slots.
    pub weapons: [Option<UnitWeapon>; 3],

    /// Activated (on).
    pub activated: bool,
    /// In build stance.
    pub in_build_stance: bool,
    /// Yard (doors) open.
    pub yard_open: bool,
    /// Remaining build progress, percent.
    pub build_percent_left: u32,
    /// Standing fire orders.
    pub fire_orders: i32,
    /// Standing move orders.
    pub move_orders: i32,
    /// Armored (taking reduced damage).
    pub armored: bool,

    /// Energy produced this period.
    pub energy_production_buffer: Energy,
    /// Metal produced this period.
    pub metal_production_buffer: Metal,
    /// Energy consumed last period.
    pub previous_energy_consumption_buffer: Energy,
    /// Metal consumed last period.
    pub previous_metal_consumption_buffer: Metal,
    /// Energy consumed this period.
    pub energy_consumption_buffer: Energy,
    /// Metal consumed this period.
    pub metal_consumption_buffer: Metal,

    /// Script statics and threads. `None` only while the script driver
    /// has it detached.
    pub cob_env: Option<CobEnvironment>,
}

impl UnitState {
    /// A live, fully built unit with no orders.
    pub fn new(
        unit_type: impl Into<String>,
        owner: PlayerId,
        position: SimVector,
        pieces: Vec<UnitPiece>,
        cob_env: CobEnvironment,
    ) -> Self {
        Self {
            unit_type: unit_type.into(),
            owner,
            position,
            previous_position: position,
            rotation: SimAngle::ZERO,
            previous_rotation: SimAngle::ZERO,
            height: SimScalar::ZERO,
            hit_points: 0,
            max_hit_points: 0,
            life_state: LifeState::Alive,
            pieces,
            orders: VecDeque::new(),
            weapons: [None, None, None],
            activated: false,
            in_build_stance: false,
            yard_open: false,
            build_percent_left: 0,
            fire_orders: FIRE_AT_WILL,
            move_orders: MANEUVER,
            armored: false,
            energy_production_buffer: Energy::ZERO,
            metal_production_buffer: Metal::ZERO,
            previous_energy_consumption_buffer: Energy::ZERO,
            previous_metal_consumption_buffer: Metal::ZERO,
            energy_consumption_buffer: Energy::ZERO,
            metal_consumption_buffer: Metal::ZERO,
            cob_env: Some(cob_env),
        }
    }

    /// Index of the piece called `name`, ignoring case.
    pub fn find_piece_index(&self, name: &str) -> Option<usize> {
        self.pieces
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// The piece called `name`, ignoring case.
    pub fn find_piece(&self, name: &str) -> Option<&UnitPiece> {
        self.find_piece_index(name).map(|i| &self.pieces[i])
    }

    /// The piece called `name`, ignoring case, mutably.
    pub fn find_piece_mut(&mut self, name: &str) -> Option<&mut UnitPiece> {
        let i = self.find_piece_index(name)?;
        self.pieces.get_mut(i)
    }

    /// Position of piece `index` relative to the unit origin, before the
    /// unit's own rotation.
    pub fn piece_local_position(&self, index: usize) -> Option<SimVector> {
        let mut point = SimVector::ZERO;
        let mut current = Some(index);
        // Model hierarchies are shallow; the bound guards against cycles.
        for _ in 0..=self.pieces.len() {
            let Some(i) = current else {
                return Some(point);
            };
            let piece = self.pieces.get(i)?;
            point = piece.to_parent_frame(point);
            current = piece.parent;
        }
        None
    }

    /// World position of piece `index`.
    pub fn piece_world_position(&self, index: usize) -> Option<SimVector> {
        let local = self.piece_local_position(index)?;
        let rotated = if self.rotation == SimAngle::ZERO {
            local
        } else {
            local.rotate_y(self.rotation)
        };
        Some(rotated + self.position)
    }

    /// Book an energy delta against this unit's own buffers.
    pub fn add_energy_delta(&mut self, delta: Energy) {
        if delta.is_negative() {
            self.energy_consumption_buffer -= delta;
        } else {
            self.energy_production_buffer += delta;
        }
    }

    /// Book a metal delta against this unit's own buffers.
    pub fn add_metal_delta(&mut self, delta: Metal) {
        if delta.is_negative() {
            self.metal_consumption_buffer -= delta;
        } else {
            self.metal_production_buffer += delta;
        }
    }

    /// Start a new accounting period.
    pub fn reset_resource_buffers(&mut self) {
        self.previous_energy_consumption_buffer = self.energy_consumption_buffer;
        self.previous_metal_consumption_buffer = self.metal_consumption_buffer;
        self.energy_consumption_buffer = Energy::ZERO;
        self.metal_consumption_buffer = Metal::ZERO;
        self.energy_production_buffer = Energy::ZERO;
        self.metal_production_buffer = Metal::ZERO;
    }

    /// Kill the unit without leaving a wreck.
    pub fn mark_as_dead_no_corpse(&mut self) {
        self.life_state = LifeState::Dead;
    }

    /// True once the unit has been killed.
    pub fn is_dead(&self) -> bool {
        self.life_state == LifeState::Dead
    }

    /// Turn the unit on.
    pub fn activate(&mut self) {
        self.activated = true;
    }

    /// Turn the unit off.
    pub fn deactivate(&mut self) {
        self.activated = false;
    }

    /// Queue an order behind any existing ones.
    pub fn add_order(&mut self, order: UnitOrder) {
        self.orders.push_back(order);
    }

    /// Advance every piece animation by one tick.
    pub fn update_pieces(&mut self) {
        for piece in &mut self.pieces {
            piece.update();
        }
    }

    /// The script-visible snapshot of this unit.
    pub fn view(&self) -> UnitView {
        UnitView {
            position: self.position,
            rotation: self.rotation,
            height: self.height,
            owner: self.owner,
            hit_points: self.hit_points,
            max_hit_points: self.max_hit_points,
            activated: self.activated,
            in_build_stance: self.in_build_stance,
            yard_open: self.yard_open,
            build_percent_left: self.build_percent_left,
            fire_orders: self.fire_orders,
            move_orders: self.move_orders,
            armored: self.armored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use skirmish_cob::CobScript;
    use skirmish_core::Axis;
    use skirmish_space::DiscreteRect;

    fn unit(pieces: Vec<UnitPiece>) -> UnitState {
        let script = Arc::new(CobScript {
            instructions: vec![],
            functions: vec![],
            pieces: vec![],
            static_variable_count: 0,
        });
        UnitState::new(
            "ARMSOLAR",
            PlayerId(0),
            SimVector::from_ints(100, 0, 50),
            pieces,
            CobEnvironment::new(script),
        )
    }

    #[test]
    fn resource_deltas_split_by_sign() {
        let mut u = unit(vec![]);
        u.add_energy_delta(Energy::from_int(20));
        u.add_energy_delta(Energy::from_int(-5));
        u.add_metal_delta(Metal::from_int(-1));
        assert_eq!(u.energy_production_buffer, Energy::from_int(20));
        assert_eq!(u.energy_consumption_buffer, Energy::from_int(5));
        assert_eq!(u.metal_consumption_buffer, Metal::from_int(1));

        u.reset_resource_buffers();
        assert_eq!(u.previous_energy_consumption_buffer, Energy::from_int(5));
        assert_eq!(u.energy_consumption_buffer, Energy::ZERO);
        assert_eq!(u.energy_production_buffer, Energy::ZERO);
    }

    #[test]
    fn pieces_are_found_case_insensitively() {
        let u = unit(vec![
            UnitPiece::new("base", SimVector::ZERO, None),
            UnitPiece::new("Turret", SimVector::ZERO, Some(0)),
        ]);
        assert_eq!(u.find_piece_index("turret"), Some(1));
        assert!(u.find_piece("barrel").is_none());
    }

    #[test]
    fn piece_position_walks_the_hierarchy() {
        let mut u = unit(vec![
            UnitPiece::new("base", SimVector::from_ints(0, 5, 0), None),
            UnitPiece::new("turret", SimVector::from_ints(0, 3, 2), Some(0)),
        ]);
        u.pieces[0].move_now(Axis::Y, SimScalar::from_int(1));
        assert_eq!(u.piece_local_position(1), Some(SimVector::from_ints(0, 9, 2)));
        assert_eq!(
            u.piece_world_position(1),
            Some(SimVector::from_ints(100, 9, 52))
        );
    }

    #[test]
    fn cyclic_hierarchy_has_no_position() {
        let u = unit(vec![
            UnitPiece::new("a", SimVector::ZERO, Some(1)),
            UnitPiece::new("b", SimVector::ZERO, Some(0)),
        ]);
        assert_eq!(u.piece_local_position(0), None);
    }

    #[test]
    fn orders_and_life_state() {
        let mut u = unit(vec![]);
        u.add_order(UnitOrder::BuggerOff {
            rect: DiscreteRect::new(0, 0, 2, 2),
        });
        assert_eq!(u.orders.len(), 1);
        assert!(!u.is_dead());
        u.mark_as_dead_no_corpse();
        assert!(u.is_dead());
    }
}
