//! [Emulator] for executing LS-8 programs.

use std::fmt;

use itertools::Itertools;
use slog::{debug, o, trace, warn, Discard, Logger};

use crate::alu;
use crate::config::{Config, UnknownOpcodePolicy};
use crate::error::{ExecutionError, LoadError};
use crate::instruction::{instruction_length, is_alu, Instruction, OpCode};
use crate::memory::{Memory, Ram};
use crate::registers::{Registers, STACK_POINTER};

/// Interface to the output device.
pub trait InputOutput {
    /// Called when a PRN instruction is executed.
    ///
    /// # Parameters
    /// - `value`: The value of the register specified in the instruction.
    fn print(&mut self, value: u8);
}

/// An IO handler for testing purposes.
///
/// Appends printed values to an output buffer.
#[derive(Debug, Default)]
pub struct TestIo {
    output_buffer: Vec<u8>,
}

impl TestIo {
    pub fn new() -> TestIo {
        TestIo {
            output_buffer: Vec::new(),
        }
    }

    pub fn output(&self) -> &[u8] {
        &self.output_buffer[..]
    }

    pub fn into_output(self) -> Vec<u8> {
        self.output_buffer
    }
}

impl InputOutput for TestIo {
    fn print(&mut self, value: u8) {
        self.output_buffer.push(value);
    }
}

impl InputOutput for &mut TestIo {
    fn print(&mut self, value: u8) {
        self.output_buffer.push(value);
    }
}

/// An IO handler that prints every value as a decimal number on its own line of the standard
/// output.
pub struct StdIo;

impl InputOutput for StdIo {
    fn print(&mut self, value: u8) {
        println!("{}", value);
    }
}

/// Read-only copy of the processor state, taken before executing an instruction.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub pc: usize,
    pub registers: [u8; 8],

    /// The bytes at `pc`, `pc + 1` and `pc + 2`. `None` for addresses outside the memory.
    pub bytes: [Option<u8>; 3],
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = self.bytes.iter()
            .map(|byte| match byte {
                Some(byte) => format!("{:02X}", byte),
                None => "--".to_string(),
            })
            .join(" ");

        let registers = self.registers.iter()
            .map(|r| format!("{:02X}", r))
            .join(" ");

        write!(f, "TRACE: {:02X} | {} | {}", self.pc, bytes, registers)
    }
}

/// The emulator contains all neccessary context for executing an LS-8 program
/// and the interface for doing output.
pub struct Emulator<Mem, IO> {
    /// The memory of the emulated machine.
    /// Contains all the instructions and data required by the program.
    pub memory: Mem,

    /// The work registers, including the stack pointer.
    pub registers: Registers,

    /// The Program Counter stores the address of the next instruction to be executed.
    pub pc: usize,

    /// Interface for doing output.
    pub io: IO,

    /// True if the execution has been halted.
    pub halted: bool,

    /// Number of instructions executed so far, skipped bytes included.
    pub cycles: u64,

    config: Config,
    logger: Logger,
}

impl<IO> Emulator<Ram, IO> where IO: InputOutput {
    /// Create a new emulator with `image` loaded at address zero.
    ///
    /// # Errors
    /// [LoadError::ImageTooLarge] if the image does not fit in the memory.
    pub fn from_image(image: &[u8], io: IO) -> Result<Emulator<Ram, IO>, LoadError> {
        Ok(Emulator::new(Ram::from_image(image)?, io))
    }
}

impl<Mem, IO> Emulator<Mem, IO> where Mem: Memory, IO: InputOutput {
    /// Create a new emulator.
    ///
    /// # Parameters
    /// - `memory`: A [Memory] object which has the program.
    /// - `io`: An [IO handler](InputOutput).
    ///
    /// # Returns
    /// A new [Emulator] instance with the program counter at zero.
    pub fn new(memory: Mem, io: IO) -> Emulator<Mem, IO> {
        Emulator::with_logger(memory, io, Logger::root(Discard, o!()))
    }

    pub fn with_logger<L>(memory: Mem, io: IO, logger: L) -> Emulator<Mem, IO>
    where
        L: Into<Option<Logger>>,
    {
        let logger = logger
            .into()
            .unwrap_or(Logger::root(Discard, o!()));

        Emulator {
            memory,
            registers: Registers::new(),
            pc: 0,
            io,
            halted: false,
            cycles: 0,
            config: Config::default(),
            logger,
        }
    }

    pub fn with_config(mut self, config: Config) -> Emulator<Mem, IO> {
        self.config = config;
        self
    }

    pub fn set_logger(&mut self, logger: Logger) {
        self.logger = logger;
    }

    /// Decodes the instruction at the address pointed by the Program Counter.
    ///
    /// # Returns
    /// The instruction and its operands, or `None` if the byte is missing from the opcode table.
    ///
    /// # Errors
    /// [ExecutionError::InvalidAddress] if the instruction or one of its operands lies outside
    /// the memory.
    pub fn get_current_instruction(&self) -> Result<Option<Instruction>, ExecutionError> {
        let byte = self.memory.read(self.pc)?;

        let opcode = match OpCode::from_byte(byte) {
            Some(opcode) => opcode,
            None => return Ok(None),
        };

        let operands = (1..instruction_length(byte))
            .map(|offset| self.memory.read(self.pc + offset))
            .collect::<Result<Vec<u8>, _>>()?;

        Ok(Some(Instruction { opcode, operands }))
    }

    /// Copies the registers, the program counter and the bytes at the program counter.
    pub fn snapshot(&self) -> Snapshot {
        let mut registers = [0; 8];
        registers.copy_from_slice(self.registers.as_slice());

        let mut bytes = [None; 3];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = self.memory.read(self.pc + offset).ok();
        }

        Snapshot {
            pc: self.pc,
            registers,
            bytes,
        }
    }

    /// Execute the instruction.
    ///
    /// Does not touch the program counter. A failing instruction leaves the registers and the
    /// memory unchanged.
    ///
    /// # Errors
    /// Returns an error if the instruction names an invalid register or the ALU does not
    /// implement the operation.
    pub fn emulate_instruction(&mut self, ins: &Instruction) -> Result<(), ExecutionError> {
        match ins.opcode {
            OpCode::LoadImmediate => {
                self.registers.set(ins.operand(0), ins.operand(1))?;
            },

            OpCode::Print => {
                let value = self.registers.get(ins.operand(0))?;
                self.io.print(value);
            },

            OpCode::Push => {
                // The stack pointer is decremented before the source register is read, so
                // pushing R7 stores the new stack top.
                let register = self.registers.validate(ins.operand(0))?;
                let top = self.registers.sp().wrapping_sub(1);
                let value = match register {
                    STACK_POINTER => top,
                    register => self.registers.get(register)?,
                };
                self.memory.write(top as usize, value)?;
                self.registers.push_sp();
            },

            OpCode::Pop => {
                let register = self.registers.validate(ins.operand(0))?;
                let value = self.memory.read(self.registers.sp() as usize)?;
                self.registers.set(register, value)?;
                self.registers.pop_sp();
            },

            OpCode::Alu(operation) => {
                let a = self.registers.get(ins.operand(0))?;
                let b = self.registers.get(ins.operand(1))?;
                let result = alu::apply(operation, a, b)?;
                self.registers.set(ins.operand(0), result)?;
            },

            OpCode::Halt => {
                debug!(self.logger, "halt"; "pc" => self.pc, "cycles" => self.cycles);
                self.halted = true;
            },
        }

        Ok(())
    }

    /// Fetches the next instruction, executes it and advances the program counter past it.
    ///
    /// # Errors
    /// Returns the first fatal error. The program counter is not advanced in that case.
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        if self.halted {
            return Ok(());
        }

        if let Some(limit) = self.config.max_cycles {
            if self.cycles >= limit {
                return Err(ExecutionError::CycleLimitExceeded { limit });
            }
        }

        let byte = self.memory.read(self.pc)?;

        match self.get_current_instruction()? {
            Some(ins) => {
                trace!(self.logger, "execute"; "pc" => self.pc, "instruction" => %ins, "alu" => is_alu(byte));
                self.emulate_instruction(&ins)?;
                self.pc += instruction_length(byte);
            },
            None => match self.config.unknown_opcode {
                UnknownOpcodePolicy::Fail => {
                    return Err(ExecutionError::UnknownOpcode {
                        opcode: byte,
                        address: self.pc,
                    });
                },
                UnknownOpcodePolicy::Skip => {
                    warn!(self.logger, "skipping unknown opcode"; "pc" => self.pc, "opcode" => byte);
                    self.pc += 1;
                },
            },
        }

        self.cycles += 1;

        Ok(())
    }

    /// Executes the program until it halts the execution or an error occurs.
    ///
    /// # Errors
    /// Returns the error that terminated the execution.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        while !self.halted {
            self.step()?;
        }

        Ok(())
    }
}
