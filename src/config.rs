//! Execution options of the [Emulator](crate::emulator::Emulator).

/// What to do with an instruction byte missing from the opcode table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UnknownOpcodePolicy {
    /// Log a warning and advance the program counter by one byte.
    Skip,

    /// Stop with [ExecutionError::UnknownOpcode](crate::error::ExecutionError::UnknownOpcode).
    Fail,
}

impl Default for UnknownOpcodePolicy {
    fn default() -> UnknownOpcodePolicy {
        UnknownOpcodePolicy::Skip
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub unknown_opcode: UnknownOpcodePolicy,

    /// Upper bound for the number of executed instructions. `None` runs until the program halts
    /// or fails.
    pub max_cycles: Option<u64>,
}

impl Config {
    /// Configuration that rejects unknown opcodes instead of skipping them.
    pub fn strict() -> Config {
        Config {
            unknown_opcode: UnknownOpcodePolicy::Fail,
            ..Config::default()
        }
    }

    pub fn with_max_cycles(mut self, cycles: u64) -> Config {
        self.max_cycles = Some(cycles);
        self
    }
}
