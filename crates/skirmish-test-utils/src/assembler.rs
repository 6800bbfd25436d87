//! A tiny assembler for hand-written test scripts.

use std::collections::HashMap;

use skirmish_cob::{CobFunctionInfo, CobScript, OpCode};
use skirmish_core::Axis;

/// Builds a [`CobScript`] instruction by instruction.
///
/// Jumps may name labels defined later; they are resolved by
/// [`build`](ScriptAssembler::build).
///
/// ```ignore
/// let mut asm = ScriptAssembler::new();
/// asm.function("Create");
/// asm.push(3).push(4).op(OpCode::Add).op(OpCode::Return);
/// let script = asm.build();
/// ```
#[derive(Default)]
pub struct ScriptAssembler {
    instructions: Vec<u32>,
    functions: Vec<CobFunctionInfo>,
    pieces: Vec<String>,
    static_variable_count: usize,
    labels: HashMap<String, usize>,
    fixups: Vec<(usize, String)>,
}

impl ScriptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a piece and return its object index.
    pub fn piece(&mut self, name: &str) -> u32 {
        self.pieces.push(name.to_string());
        (self.pieces.len() - 1) as u32
    }

    /// Reserve `count` static variables.
    pub fn statics(&mut self, count: usize) -> &mut Self {
        self.static_variable_count = count;
        self
    }

    /// Start a function at the current address and return its index.
    pub fn function(&mut self, name: &str) -> u32 {
        self.functions.push(CobFunctionInfo {
            name: name.to_string(),
            address: self.instructions.len(),
        });
        (self.functions.len() - 1) as u32
    }

    /// Current instruction address.
    pub fn address(&self) -> usize {
        self.instructions.len()
    }

    /// Append a bare opcode.
    pub fn op(&mut self, op: OpCode) -> &mut Self {
        self.instructions.push(op.word());
        self
    }

    /// Append an opcode followed by inline operand words.
    pub fn op_with(&mut self, op: OpCode, operands: &[u32]) -> &mut Self {
        self.op(op);
        self.instructions.extend_from_slice(operands);
        self
    }

    /// Append a raw word.
    pub fn word(&mut self, word: u32) -> &mut Self {
        self.instructions.push(word);
        self
    }

    pub fn push(&mut self, value: i32) -> &mut Self {
        self.op_with(OpCode::PushConstant, &[value as u32])
    }

    /// Append a piece opcode (`MOVE`, `TURN`, `WAIT_FOR_MOVE` ...).
    pub fn piece_op(&mut self, op: OpCode, object: u32, axis: Axis) -> &mut Self {
        self.op_with(op, &[object, axis.index() as u32])
    }

    /// Mark the current address as `name`.
    pub fn label(&mut self, name: &str) -> &mut Self {
        self.labels.insert(name.to_string(), self.instructions.len());
        self
    }

    pub fn jump(&mut self, label: &str) -> &mut Self {
        self.op(OpCode::Jump);
        self.operand_label(label)
    }

    pub fn jump_if_zero(&mut self, label: &str) -> &mut Self {
        self.op(OpCode::JumpIfZero);
        self.operand_label(label)
    }

    /// `CALL_SCRIPT function argc`; arguments must already be pushed.
    pub fn call(&mut self, function: u32, argc: u32) -> &mut Self {
        self.op_with(OpCode::CallScript, &[function, argc])
    }

    /// `START_SCRIPT function argc`; arguments must already be pushed.
    pub fn start(&mut self, function: u32, argc: u32) -> &mut Self {
        self.op_with(OpCode::StartScript, &[function, argc])
    }

    /// `SLEEP` for `ms` milliseconds.
    pub fn sleep(&mut self, ms: i32) -> &mut Self {
        self.push(ms).op(OpCode::Sleep)
    }

    /// `RETURN 0`.
    pub fn ret(&mut self) -> &mut Self {
        self.push(0).op(OpCode::Return)
    }

    fn operand_label(&mut self, label: &str) -> &mut Self {
        self.fixups
            .push((self.instructions.len(), label.to_string()));
        self.instructions.push(0);
        self
    }

    /// Resolve labels and produce the script.
    ///
    /// # Panics
    ///
    /// Panics if a jump names a label that was never defined.
    pub fn build(&self) -> CobScript {
        let mut instructions = self.instructions.clone();
        for (at, label) in &self.fixups {
            let Some(target) = self.labels.get(label) else {
                panic!("undefined label `{label}`");
            };
            instructions[*at] = *target as u32;
        }
        CobScript {
            instructions,
            functions: self.functions.clone(),
            pieces: self.pieces.clone(),
            static_variable_count: self.static_variable_count,
        }
    }
}
