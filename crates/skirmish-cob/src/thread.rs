//! Script threads and call frames.

use std::fmt;

use skirmish_core::{Axis, GameTime};
use smallvec::SmallVec;

/// Local variable storage for one frame.
///
/// Most script functions declare only a handful of locals.
pub type Locals = SmallVec<[i32; 8]>;

/// Identifies a thread within one unit's environment.
///
/// Allocated monotonically; iteration in id order is creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadId(pub u32);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ThreadId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// One active function call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CobFunctionFrame {
    /// Index of the next instruction to execute.
    pub instruction_index: usize,
    /// Parameters followed by declared locals.
    pub locals: Locals,
    /// Number of `CREATE_LOCAL_VAR` instructions executed in this frame.
    ///
    /// Parameters occupy the first slots of `locals`, and scripts declare
    /// them again with `CREATE_LOCAL_VAR`, so `locals` only grows once
    /// this count catches up with its length.
    pub local_count: usize,
}

impl CobFunctionFrame {
    /// A frame entering the function at `address` with `params` bound to
    /// the first locals.
    pub fn new(address: usize, params: impl IntoIterator<Item = i32>) -> Self {
        Self {
            instruction_index: address,
            locals: params.into_iter().collect(),
            local_count: 0,
        }
    }
}

/// Scheduling state the driver keeps for a suspended thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThreadState {
    /// Resume on the next opportunity.
    #[default]
    Ready,
    /// Resume once game time reaches `wake_at`.
    Sleeping {
        /// Earliest tick to resume on.
        wake_at: GameTime,
    },
    /// Resume once the piece stops moving along the axis.
    WaitingForMove {
        /// Piece index.
        object: u32,
        /// Axis.
        axis: Axis,
    },
    /// Resume once the piece stops turning about the axis.
    WaitingForTurn {
        /// Piece index.
        object: u32,
        /// Axis.
        axis: Axis,
    },
}

/// A resumable execution of a script function.
///
/// A thread is finished exactly when its call stack is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CobThread {
    /// Name of the function the thread was started with.
    pub name: String,
    /// Operand stack; the top is the last element.
    pub stack: Vec<i32>,
    /// Call stack; the current frame is the last element.
    pub call_stack: Vec<CobFunctionFrame>,
    /// Signals that kill this thread.
    pub signal_mask: u32,
    /// Value passed to the most recent `RETURN`.
    pub return_value: i32,
    /// Locals of the most recently returned frame.
    pub return_locals: Locals,
    /// Driver scheduling state.
    pub state: ThreadState,
}

impl CobThread {
    /// A thread about to enter the function at `address`.
    pub fn new(
        name: impl Into<String>,
        address: usize,
        params: impl IntoIterator<Item = i32>,
        signal_mask: u32,
    ) -> Self {
        Self {
            name: name.into(),
            stack: Vec::new(),
            call_stack: vec![CobFunctionFrame::new(address, params)],
            signal_mask,
            return_value: 0,
            return_locals: Locals::new(),
            state: ThreadState::Ready,
        }
    }

    /// True once the call stack is empty.
    pub fn is_finished(&self) -> bool {
        self.call_stack.is_empty()
    }

    /// Push onto the operand stack.
    pub fn push(&mut self, value: i32) {
        self.stack.push(value);
    }

    /// Pop from the operand stack. An empty stack yields 0.
    pub fn pop(&mut self) -> i32 {
        self.stack.pop().unwrap_or(0)
    }

    /// The current frame.
    pub fn frame(&self) -> Option<&CobFunctionFrame> {
        self.call_stack.last()
    }

    /// The current frame, mutably.
    pub fn frame_mut(&mut self) -> Option<&mut CobFunctionFrame> {
        self.call_stack.last_mut()
    }
}
