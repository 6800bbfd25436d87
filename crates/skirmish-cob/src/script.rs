//! Compiled scripts.

/// An entry in a script's function table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CobFunctionInfo {
    /// Function name, as declared in the script source.
    pub name: String,
    /// Index of the function's first instruction.
    pub address: usize,
}

/// A compiled unit script, shared read-only by every unit of a type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CobScript {
    /// The instruction stream.
    pub instructions: Vec<u32>,
    /// Function table, indexed by the operands of `CALL_SCRIPT` and
    /// `START_SCRIPT`.
    pub functions: Vec<CobFunctionInfo>,
    /// Piece names, indexed by the object operand of piece opcodes.
    pub pieces: Vec<String>,
    /// Number of static variables each environment allocates.
    pub static_variable_count: usize,
}

impl CobScript {
    /// Index of the function called `name`, ignoring ASCII case.
    pub fn find_function(&self, name: &str) -> Option<u32> {
        self.functions
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
            .map(|i| i as u32)
    }

    /// The function at `index`.
    pub fn function(&self, index: u32) -> Option<&CobFunctionInfo> {
        self.functions.get(index as usize)
    }

    /// The piece name at `index`.
    pub fn piece_name(&self, index: u32) -> Option<&str> {
        self.pieces.get(index as usize).map(String::as_str)
    }
}
