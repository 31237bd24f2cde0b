//! types for representing instructions and their parts

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

use crate::alu::AluOp;

/// Instructions of the LS-8 instruction architecture.
///
/// The top two bits of an instruction byte give the number of operand bytes following it. Bit
/// five is set for the instructions executed by the [ALU](crate::alu).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Stops the execution. (`HLT`)
    Halt,

    /// Stores a literal value into a register. (`LDI`)
    LoadImmediate,

    /// Prints the decimal value of a register. (`PRN`)
    Print,

    /// Pushes the value of a register onto the stack. (`PUSH`)
    Push,

    /// Pops the topmost value of the stack into a register. (`POP`)
    Pop,

    /// Combines the values of two registers and stores the result in the first one.
    Alu(AluOp),
}

/// Kind of the byte following an instruction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OperandKind {
    /// An index of a register.
    Register,

    /// A literal byte.
    Immediate,
}

lazy_static! {
    /// Every instruction understood by the emulator, keyed by its encoding.
    static ref OPCODE_TABLE: HashMap<u8, OpCode> = OpCode::ALL
        .iter()
        .map(|opcode| (opcode.as_byte(), *opcode))
        .collect();
}

impl OpCode {
    /// All instructions the emulator can execute.
    pub const ALL: [OpCode; 7] = [
        OpCode::Halt,
        OpCode::LoadImmediate,
        OpCode::Print,
        OpCode::Push,
        OpCode::Pop,
        OpCode::Alu(AluOp::Add),
        OpCode::Alu(AluOp::Multiply),
    ];

    pub fn as_byte(&self) -> u8 {
        match self {
            OpCode::Halt => 0b0000_0001,
            OpCode::LoadImmediate => 0b1000_0010,
            OpCode::Print => 0b0100_0111,
            OpCode::Push => 0b0100_0101,
            OpCode::Pop => 0b0100_0110,

            OpCode::Alu(AluOp::Add) => 0b1010_0000,
            OpCode::Alu(AluOp::Subtract) => 0b1010_0001,
            OpCode::Alu(AluOp::Multiply) => 0b1010_0010,
            OpCode::Alu(AluOp::Divide) => 0b1010_0011,
            OpCode::Alu(AluOp::And) => 0b1010_1000,
            OpCode::Alu(AluOp::Or) => 0b1010_1010,
            OpCode::Alu(AluOp::Xor) => 0b1010_1011,
        }
    }

    /// Looks up `byte` in the opcode table.
    ///
    /// Returns `None` for bytes that do not encode an instruction this emulator executes.
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        OPCODE_TABLE.get(&byte).copied()
    }

    /// The assembler mnemonic of the instruction.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpCode::Halt => "HLT",
            OpCode::LoadImmediate => "LDI",
            OpCode::Print => "PRN",
            OpCode::Push => "PUSH",
            OpCode::Pop => "POP",
            OpCode::Alu(AluOp::Add) => "ADD",
            OpCode::Alu(AluOp::Subtract) => "SUB",
            OpCode::Alu(AluOp::Multiply) => "MUL",
            OpCode::Alu(AluOp::Divide) => "DIV",
            OpCode::Alu(AluOp::And) => "AND",
            OpCode::Alu(AluOp::Or) => "OR",
            OpCode::Alu(AluOp::Xor) => "XOR",
        }
    }

    /// Finds the executable instruction with the mnemonic `name`, ignoring case.
    pub fn from_mnemonic(name: &str) -> Option<OpCode> {
        OpCode::ALL
            .iter()
            .find(|opcode| opcode.mnemonic().eq_ignore_ascii_case(name))
            .copied()
    }

    /// The operands the instruction expects, in order.
    pub fn operands(&self) -> &'static [OperandKind] {
        use OperandKind::*;

        match self {
            OpCode::Halt => &[],
            OpCode::LoadImmediate => &[Register, Immediate],
            OpCode::Print | OpCode::Push | OpCode::Pop => &[Register],
            OpCode::Alu(_) => &[Register, Register],
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Number of operand bytes following the instruction byte `byte`.
pub fn operand_count(byte: u8) -> usize {
    (byte >> 6) as usize
}

/// Total number of bytes taken by the instruction starting with `byte`.
pub fn instruction_length(byte: u8) -> usize {
    operand_count(byte) + 1
}

/// True if `byte` belongs to the ALU instruction group.
pub fn is_alu(byte: u8) -> bool {
    byte & 0b0010_0000 != 0
}

/// A decoded instruction together with its operand bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub opcode: OpCode,
    pub operands: Vec<u8>,
}

impl Instruction {
    pub fn new(opcode: OpCode, operands: &[u8]) -> Instruction {
        Instruction {
            opcode,
            operands: operands.to_vec(),
        }
    }

    /// Returns the operand in position `index`, or zero if the instruction has no such operand.
    pub fn operand(&self, index: usize) -> u8 {
        self.operands.get(index).copied().unwrap_or(0)
    }

    /// Encodes the instruction into its bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.opcode.as_byte()];
        bytes.extend_from_slice(&self.operands);
        bytes
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.opcode)?;

        let kinds = self.opcode.operands().iter();

        for (i, (kind, value)) in kinds.zip(&self.operands).enumerate() {
            let sep = if i == 0 { " " } else { ", " };

            match kind {
                OperandKind::Register => write!(f, "{}R{}", sep, value)?,
                OperandKind::Immediate => write!(f, "{}{}", sep, value)?,
            }
        }

        Ok(())
    }
}
