//! Unit pieces and their scripted animation.
//!
//! Scripts move and rotate pieces along three axes. Every operation is
//! stored per axis and advanced once per tick by [`UnitPiece::update`].
//! Linear speeds are world units per tick; angular speeds are angle units
//! per tick.

use skirmish_core::{math, Axis, SimAngle, SimScalar, SimVector};

/// A translation in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceMoveOperation {
    /// Final offset along the axis.
    pub target: SimScalar,
    /// Distance covered per tick.
    pub speed: SimScalar,
}

/// A rotation in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceTurnOperation {
    /// Rotate to `target` along the shortest arc.
    Turn {
        /// Final angle.
        target: SimAngle,
        /// Angle units per tick.
        speed: i32,
    },
    /// Rotate indefinitely, ramping toward `target_speed`.
    Spin {
        /// Current angular speed.
        current_speed: i32,
        /// Steady-state angular speed.
        target_speed: i32,
        /// Speed change per tick; zero reaches `target_speed` at once.
        acceleration: i32,
    },
    /// Wind a spin down to rest.
    StopSpin {
        /// Current angular speed.
        current_speed: i32,
        /// Speed change per tick; zero stops at once.
        deceleration: i32,
    },
}

impl PieceTurnOperation {
    fn current_speed(&self) -> i32 {
        match *self {
            PieceTurnOperation::Turn { .. } => 0,
            PieceTurnOperation::Spin { current_speed, .. }
            | PieceTurnOperation::StopSpin { current_speed, .. } => current_speed,
        }
    }
}

fn approach(current: i32, target: i32, step: i32) -> i32 {
    if step <= 0 {
        return target;
    }
    if current < target {
        current.saturating_add(step).min(target)
    } else {
        current.saturating_sub(step).max(target)
    }
}

/// The animated state of one model piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitPiece {
    /// Piece name.
    pub name: String,
    /// Offset from the parent piece, from the model.
    pub origin: SimVector,
    /// Index of the parent piece in the unit's piece list.
    pub parent: Option<usize>,
    /// Scripted translation, per axis.
    pub translation: [SimScalar; 3],
    /// Scripted rotation, per axis.
    pub rotation: [SimAngle; 3],
    /// Drawn.
    pub visible: bool,
    /// Lit.
    pub shaded: bool,
    /// Translation in progress, per axis.
    pub move_operations: [Option<PieceMoveOperation>; 3],
    /// Rotation in progress, per axis.
    pub turn_operations: [Option<PieceTurnOperation>; 3],
}

impl UnitPiece {
    /// A visible, shaded piece at rest.
    pub fn new(name: impl Into<String>, origin: SimVector, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            origin,
            parent,
            translation: [SimScalar::ZERO; 3],
            rotation: [SimAngle::ZERO; 3],
            visible: true,
            shaded: true,
            move_operations: [None; 3],
            turn_operations: [None; 3],
        }
    }

    /// Start translating toward `target`. A zero speed jumps there.
    pub fn move_to(&mut self, axis: Axis, target: SimScalar, speed: SimScalar) {
        if speed <= SimScalar::ZERO {
            self.move_now(axis, target);
            return;
        }
        self.move_operations[axis.index()] = Some(PieceMoveOperation { target, speed });
    }

    /// Jump to `target`, cancelling any translation in progress.
    pub fn move_now(&mut self, axis: Axis, target: SimScalar) {
        self.translation[axis.index()] = target;
        self.move_operations[axis.index()] = None;
    }

    /// Start rotating toward `target`. A zero speed jumps there.
    pub fn turn_to(&mut self, axis: Axis, target: SimAngle, speed: i32) {
        if speed <= 0 {
            self.turn_now(axis, target);
            return;
        }
        self.turn_operations[axis.index()] = Some(PieceTurnOperation::Turn {
            target,
            speed,
        });
    }

    /// Jump to `target`, cancelling any rotation in progress.
    pub fn turn_now(&mut self, axis: Axis, target: SimAngle) {
        self.rotation[axis.index()] = target;
        self.turn_operations[axis.index()] = None;
    }

    /// Spin up toward `target_speed`, keeping any current spin speed.
    pub fn spin(&mut self, axis: Axis, target_speed: i32, acceleration: i32) {
        let slot = &mut self.turn_operations[axis.index()];
        let current_speed = slot.map_or(0, |op| op.current_speed());
        *slot = Some(PieceTurnOperation::Spin {
            current_speed,
            target_speed,
            acceleration: acceleration.abs(),
        });
    }

    /// Spin down to rest. Has no effect unless the piece is spinning.
    pub fn stop_spin(&mut self, axis: Axis, deceleration: i32) {
        let slot = &mut self.turn_operations[axis.index()];
        if let Some(op) = slot {
            let current_speed = op.current_speed();
            *slot = Some(PieceTurnOperation::StopSpin {
                current_speed,
                deceleration: deceleration.abs(),
            });
        }
    }

    /// True while a translation along `axis` is in progress.
    pub fn is_moving(&self, axis: Axis) -> bool {
        self.move_operations[axis.index()].is_some()
    }

    /// True while a turn or stop-spin about `axis` is in progress.
    ///
    /// A steady spin never completes, so it does not count.
    pub fn is_turning(&self, axis: Axis) -> bool {
        matches!(
            self.turn_operations[axis.index()],
            Some(PieceTurnOperation::Turn { .. } | PieceTurnOperation::StopSpin { .. })
        )
    }

    /// Advance every operation by one tick.
    pub fn update(&mut self) {
        for axis in Axis::ALL {
            self.update_move(axis);
            self.update_turn(axis);
        }
    }

    fn update_move(&mut self, axis: Axis) {
        let i = axis.index();
        let Some(op) = self.move_operations[i] else {
            return;
        };
        let current = self.translation[i];
        let remaining = op.target - current;
        if remaining.abs() <= op.speed {
            self.move_now(axis, op.target);
        } else if remaining > SimScalar::ZERO {
            self.translation[i] = current + op.speed;
        } else {
            self.translation[i] = current - op.speed;
        }
    }

    fn update_turn(&mut self, axis: Axis) {
        let i = axis.index();
        let Some(op) = self.turn_operations[i] else {
            return;
        };
        match op {
            PieceTurnOperation::Turn { target, speed } => {
                let remaining = (target - self.rotation[i]).signed();
                if remaining.abs() <= speed {
                    self.turn_now(axis, target);
                } else {
                    self.rotation[i] = self.rotation[i].offset(speed * remaining.signum());
                }
            }
            PieceTurnOperation::Spin {
                current_speed,
                target_speed,
                acceleration,
            } => {
                let speed = approach(current_speed, target_speed, acceleration);
                self.rotation[i] = self.rotation[i].offset(speed);
                self.turn_operations[i] = Some(PieceTurnOperation::Spin {
                    current_speed: speed,
                    target_speed,
                    acceleration,
                });
            }
            PieceTurnOperation::StopSpin {
                current_speed,
                deceleration,
            } => {
                let speed = approach(current_speed, 0, deceleration);
                self.rotation[i] = self.rotation[i].offset(speed);
                self.turn_operations[i] = if speed == 0 {
                    None
                } else {
                    Some(PieceTurnOperation::StopSpin {
                        current_speed: speed,
                        deceleration,
                    })
                };
            }
        }
    }

    /// Transform a point from this piece's frame into its parent's.
    ///
    /// Rotations apply Z, then X, then Y.
    pub fn to_parent_frame(&self, point: SimVector) -> SimVector {
        let [rx, ry, rz] = self.rotation;
        let p = rotate_z(point, rz);
        let p = rotate_x(p, rx);
        let p = rotate_y(p, ry);
        p + self.origin
            + SimVector::new(self.translation[0], self.translation[1], self.translation[2])
    }
}

// Zero angles skip the trig so unrotated pieces stay exact.

fn rotate_y(v: SimVector, angle: SimAngle) -> SimVector {
    if angle == SimAngle::ZERO {
        return v;
    }
    v.rotate_y(angle)
}

fn rotate_x(v: SimVector, angle: SimAngle) -> SimVector {
    if angle == SimAngle::ZERO {
        return v;
    }
    let (sin, cos) = math::sin_cos(angle);
    SimVector::new(v.x, v.y * cos - v.z * sin, v.y * sin + v.z * cos)
}

fn rotate_z(v: SimVector, angle: SimAngle) -> SimVector {
    if angle == SimAngle::ZERO {
        return v;
    }
    let (sin, cos) = math::sin_cos(angle);
    SimVector::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}
