//! Resumable bytecode interpreter for Skirmish unit scripts.
//!
//! Unit behaviour (piece animation, activation, weapon aiming) is driven
//! by compiled COB scripts. Each unit owns a [`CobEnvironment`] holding
//! its static variables and script threads. A thread is plain data: an
//! operand stack and a call stack of frames. The tick driver resumes a
//! thread by building a [`CobExecutionContext`] around it and calling
//! [`CobExecutionContext::execute`], which runs until the thread
//! finishes or must suspend, and reports why as a [`CobStatus`].
//!
//! The interpreter never touches the simulation directly; reads and
//! writes go through the [`CobHost`](skirmish_core::CobHost) trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod environment;
pub mod error;
pub mod opcode;
pub mod script;
pub mod status;
pub mod thread;
pub mod units;
pub mod value_id;

pub use context::CobExecutionContext;
pub use environment::CobEnvironment;
pub use error::ScriptError;
pub use opcode::OpCode;
pub use script::{CobFunctionInfo, CobScript};
pub use status::{BlockedStatus, CobStatus, MotionCommand, MotionKind};
pub use thread::{CobFunctionFrame, CobThread, Locals, ThreadId, ThreadState};
pub use units::{CobAngle, CobAngularSpeed, CobPosition, CobSleepDuration, CobSpeed};
pub use value_id::CobValueId;

/// The value scripts use for boolean true.
pub const COB_TRUE: i32 = 1;

/// The value scripts use for boolean false.
pub const COB_FALSE: i32 = 0;
