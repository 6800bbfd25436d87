//! Why an interpreter invocation stopped.

use skirmish_core::Axis;

use crate::units::{CobAngle, CobAngularSpeed, CobPosition, CobSleepDuration, CobSpeed};

/// The result of one [`execute`](crate::CobExecutionContext::execute) call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CobStatus {
    /// The thread's call stack is empty.
    Finished,
    /// The driver must apply a piece motion, then resume the thread.
    Motion(MotionCommand),
    /// The thread waits for a piece motion to complete.
    Blocked(BlockedStatus),
    /// The thread sleeps.
    Sleeping {
        /// How long.
        duration: CobSleepDuration,
    },
}

/// A piece motion requested by a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionCommand {
    /// Piece index into the script's piece table.
    pub object: u32,
    /// Axis of the motion.
    pub axis: Axis,
    /// What to do.
    pub kind: MotionKind,
}

/// The kinds of piece motion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionKind {
    /// Translate toward `position` at `speed`.
    Move {
        /// Target offset along the axis.
        position: CobPosition,
        /// Speed.
        speed: CobSpeed,
    },
    /// Translate to `position` immediately.
    MoveNow {
        /// Target offset along the axis.
        position: CobPosition,
    },
    /// Rotate toward `angle` at `speed`.
    Turn {
        /// Target angle about the axis.
        angle: CobAngle,
        /// Angular speed.
        speed: CobAngularSpeed,
    },
    /// Rotate to `angle` immediately.
    TurnNow {
        /// Target angle about the axis.
        angle: CobAngle,
    },
    /// Spin up toward `target_speed`.
    Spin {
        /// Steady-state angular speed.
        target_speed: CobAngularSpeed,
        /// Angular acceleration; zero means reach full speed at once.
        acceleration: CobAngularSpeed,
    },
    /// Spin down to rest.
    StopSpin {
        /// Angular deceleration; zero means stop at once.
        deceleration: CobAngularSpeed,
    },
}

/// What a blocked thread waits for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockedStatus {
    /// A move of `object` along `axis` to finish.
    Move {
        /// Piece index.
        object: u32,
        /// Axis.
        axis: Axis,
    },
    /// A turn of `object` about `axis` to finish.
    Turn {
        /// Piece index.
        object: u32,
        /// Axis.
        axis: Axis,
    },
}
