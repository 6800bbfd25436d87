//! The closed COB instruction set.

use std::fmt;

/// A decoded instruction word.
///
/// Discriminants are the instruction words emitted by the script
/// compiler. Words that follow an opcode in the stream (object, axis,
/// constant, jump target, function index, argument count) are operands,
/// not opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum OpCode {
    /// Suspend with a move of `object` along `axis`.
    Move = 0x1000_1000,
    /// Suspend with a turn of `object` about `axis`.
    Turn = 0x1000_2000,
    /// Suspend with a spin of `object` about `axis`.
    Spin = 0x1000_3000,
    /// Suspend with a spin stop of `object` about `axis`.
    StopSpin = 0x1000_4000,
    /// Show a piece.
    Show = 0x1000_5000,
    /// Hide a piece.
    Hide = 0x1000_6000,
    /// Cache a piece (no effect).
    Cache = 0x1000_7000,
    /// Stop caching a piece (no effect).
    DontCache = 0x1000_8000,
    /// Suspend with an instant move.
    MoveNow = 0x1000_B000,
    /// Suspend with an instant turn.
    TurnNow = 0x1000_C000,
    /// Enable lighting on a piece.
    Shade = 0x1000_D000,
    /// Disable lighting on a piece.
    DontShade = 0x1000_E000,
    /// Emit a particle effect from a piece.
    EmitSfx = 0x1000_F000,
    /// Suspend until a turn completes.
    WaitForTurn = 0x1001_1000,
    /// Suspend until a move completes.
    WaitForMove = 0x1001_2000,
    /// Suspend for a number of milliseconds.
    Sleep = 0x1001_3000,
    /// Push the next instruction word.
    PushConstant = 0x1002_1001,
    /// Push a local variable.
    PushLocalVar = 0x1002_1002,
    /// Push a static variable.
    PushStatic = 0x1002_1004,
    /// Declare a local variable.
    CreateLocalVar = 0x1002_2000,
    /// Pop into a local variable.
    PopLocalVar = 0x1002_3002,
    /// Pop into a static variable.
    PopStatic = 0x1002_3004,
    /// Discard the top of the stack.
    PopStack = 0x1002_4000,
    /// Integer addition.
    Add = 0x1003_1000,
    /// Integer subtraction.
    Sub = 0x1003_2000,
    /// Integer multiplication.
    Mul = 0x1003_3000,
    /// Integer division.
    Div = 0x1003_4000,
    /// Bitwise and.
    BitwiseAnd = 0x1003_5000,
    /// Bitwise or.
    BitwiseOr = 0x1003_6000,
    /// Bitwise xor.
    BitwiseXor = 0x1003_7000,
    /// Bitwise complement.
    BitwiseNot = 0x1003_8000,
    /// Uniform random integer.
    Rand = 0x1004_1000,
    /// Read a linked value.
    GetValue = 0x1004_2000,
    /// Read a linked value with four arguments.
    GetValueWithArgs = 0x1004_3000,
    /// `a < b`.
    SetLess = 0x1005_1000,
    /// `a <= b`.
    SetLessOrEqual = 0x1005_2000,
    /// `a > b`.
    SetGreater = 0x1005_3000,
    /// `a >= b`.
    SetGreaterOrEqual = 0x1005_4000,
    /// `a == b`.
    SetEqual = 0x1005_5000,
    /// `a != b`.
    SetNotEqual = 0x1005_6000,
    /// Boolean and.
    LogicalAnd = 0x1005_7000,
    /// Boolean or.
    LogicalOr = 0x1005_8000,
    /// Boolean xor.
    LogicalXor = 0x1005_9000,
    /// Boolean not.
    LogicalNot = 0x1005_A000,
    /// Start a new thread.
    StartScript = 0x1006_1000,
    /// Call a function on this thread.
    CallScript = 0x1006_2000,
    /// Unconditional jump.
    Jump = 0x1006_4000,
    /// Return from the current function.
    Return = 0x1006_5000,
    /// Jump if the popped value is zero.
    JumpIfZero = 0x1006_6000,
    /// Kill other threads whose mask matches.
    Signal = 0x1006_7000,
    /// Set this thread's signal mask.
    SetSignalMask = 0x1006_8000,
    /// Blow a piece off the model.
    Explode = 0x1007_1000,
    /// Write a linked value.
    SetValue = 0x1008_2000,
    /// Attach a unit to a piece (transports).
    AttachUnit = 0x1008_3000,
    /// Detach a unit (transports).
    DropUnit = 0x1008_4000,
}

impl OpCode {
    /// Every opcode, for table-driven tests and tooling.
    pub const ALL: [OpCode; 55] = [
        OpCode::Move,
        OpCode::Turn,
        OpCode::Spin,
        OpCode::StopSpin,
        OpCode::Show,
        OpCode::Hide,
        OpCode::Cache,
        OpCode::DontCache,
        OpCode::MoveNow,
        OpCode::TurnNow,
        OpCode::Shade,
        OpCode::DontShade,
        OpCode::EmitSfx,
        OpCode::WaitForTurn,
        OpCode::WaitForMove,
        OpCode::Sleep,
        OpCode::PushConstant,
        OpCode::PushLocalVar,
        OpCode::PushStatic,
        OpCode::CreateLocalVar,
        OpCode::PopLocalVar,
        OpCode::PopStatic,
        OpCode::PopStack,
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mul,
        OpCode::Div,
        OpCode::BitwiseAnd,
        OpCode::BitwiseOr,
        OpCode::BitwiseXor,
        OpCode::BitwiseNot,
        OpCode::Rand,
        OpCode::GetValue,
        OpCode::GetValueWithArgs,
        OpCode::SetLess,
        OpCode::SetLessOrEqual,
        OpCode::SetGreater,
        OpCode::SetGreaterOrEqual,
        OpCode::SetEqual,
        OpCode::SetNotEqual,
        OpCode::LogicalAnd,
        OpCode::LogicalOr,
        OpCode::LogicalXor,
        OpCode::LogicalNot,
        OpCode::StartScript,
        OpCode::CallScript,
        OpCode::Jump,
        OpCode::Return,
        OpCode::JumpIfZero,
        OpCode::Signal,
        OpCode::SetSignalMask,
        OpCode::Explode,
        OpCode::SetValue,
        OpCode::AttachUnit,
        OpCode::DropUnit,
    ];

    /// The instruction word for this opcode.
    pub const fn word(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for OpCode {
    type Error = u32;

    /// Decode an instruction word, returning it unchanged on failure.
    fn try_from(word: u32) -> Result<Self, u32> {
        OpCode::ALL
            .iter()
            .copied()
            .find(|op| op.word() == word)
            .ok_or(word)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_round_trip() {
        for op in OpCode::ALL {
            assert_eq!(OpCode::try_from(op.word()), Ok(op));
        }
    }

    #[test]
    fn words_are_distinct() {
        let mut words: Vec<u32> = OpCode::ALL.iter().map(|op| op.word()).collect();
        words.sort_unstable();
        words.dedup();
        assert_eq!(words.len(), OpCode::ALL.len());
    }

    #[test]
    fn unknown_word_is_returned() {
        assert_eq!(OpCode::try_from(0xdead_beef), Err(0xdead_beef));
        assert_eq!(OpCode::try_from(0), Err(0));
    }
}
