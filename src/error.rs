//! Error types for loading, assembling and executing LS-8 programs.

use std::fmt::{self, Display};
use nom::error::ErrorKind;
use itertools::Itertools;

/// A fatal error raised by the [Emulator](crate::emulator::Emulator).
///
/// None of these are recoverable, the emulator is not expected to resume after returning one.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// A memory access outside of the 256 addressable cells.
    InvalidAddress {
        address: usize,
    },

    /// A register index outside of `R0`-`R7`.
    InvalidRegister {
        index: u8,
    },

    /// The ALU was asked to perform an operation it does not implement.
    UnsupportedAluOperation {
        operation: crate::alu::AluOp,
    },

    /// An instruction byte missing from the opcode table, raised only with
    /// [UnknownOpcodePolicy::Fail](crate::config::UnknownOpcodePolicy::Fail).
    UnknownOpcode {
        opcode: u8,
        address: usize,
    },

    /// The program ran for longer than the configured cycle budget.
    CycleLimitExceeded {
        limit: u64,
    },
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionError::InvalidAddress { address } =>
                write!(f, "invalid address: 0x{:x}", address),
            ExecutionError::InvalidRegister { index } =>
                write!(f, "invalid register: {}", index),
            ExecutionError::UnsupportedAluOperation { operation } =>
                write!(f, "unsupported ALU operation: {}", operation),
            ExecutionError::UnknownOpcode { opcode, address } =>
                write!(f, "unknown opcode 0b{:08b} at address 0x{:02x}", opcode, address),
            ExecutionError::CycleLimitExceeded { limit } =>
                write!(f, "program did not halt within {} cycles", limit),
        }
    }
}

impl std::error::Error for ExecutionError {}

#[derive(Debug, Clone, PartialEq)]
enum InnerError {
    Context(&'static str),
    Nom(ErrorKind),
}

impl fmt::Display for InnerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InnerError::Context(ctx) => write!(f, "invalid {}", ctx),
            InnerError::Nom(_err) => write!(f, "unexpected input"),
        }
    }
}

/// Error produced while parsing a program image.
///
/// Contains the line of the image the error occurred on, the reason of the error and the
/// unconsumed input of that line.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// The 1-based line number of the error location.
    pub line: usize,
    stack: Vec<(String, InnerError)>,
}

impl ParseError {
    pub(crate) fn at_line(mut self, line: usize) -> ParseError {
        self.line = line;
        self
    }

    /// The part of the line that could not be parsed.
    pub fn rest(&self) -> &str {
        self.stack
            .first()
            .map(|(rest, _)| rest.as_str())
            .unwrap_or("")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = self.stack.iter()
            .rev()
            .map(|(_, kind)| kind)
            .join(": ");

        let rest: String = self.rest().chars().take(20).collect();

        write!(f, "at line {}: {}, at '{}'", self.line, reason, rest)
    }
}

impl std::error::Error for ParseError {}

impl nom::error::ParseError<&str> for ParseError {
    fn from_error_kind(input: &str, kind: ErrorKind) -> Self {
        ParseError {
            line: 0,
            stack: vec![(input.to_string(), InnerError::Nom(kind))],
        }
    }

    fn append(input: &str, kind: ErrorKind, mut other: Self) -> Self {
        other.stack.push((input.to_string(), InnerError::Nom(kind)));
        other
    }

    fn add_context(input: &str, ctx: &'static str, mut other: Self) -> Self {
        other.stack.push((input.to_string(), InnerError::Context(ctx)));
        other
    }
}

/// Reason of an [AssembleError].
#[derive(Debug, Clone, PartialEq)]
pub enum AssembleErrorKind {
    /// The mnemonic does not name any instruction. Contains the closest known mnemonic, if any
    /// is close enough to be a likely typo.
    UnknownMnemonic {
        mnemonic: String,
        suggestion: Option<&'static str>,
    },

    /// A token that cannot appear at this position.
    UnexpectedToken {
        token: String,
    },

    /// The instruction was given the wrong number of operands.
    OperandCount {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },

    /// A register operand was expected.
    ExpectedRegister {
        found: String,
    },

    /// A literal that is malformed or does not fit in a byte.
    InvalidLiteral {
        literal: String,
    },
}

/// Error produced by the [assembler](crate::asm).
#[derive(Debug, Clone, PartialEq)]
pub struct AssembleError {
    /// The 1-based line number of the offending instruction.
    pub line: usize,
    pub kind: AssembleErrorKind,
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at line {}: ", self.line)?;

        match &self.kind {
            AssembleErrorKind::UnknownMnemonic { mnemonic, suggestion: Some(suggestion) } =>
                write!(f, "unknown instruction '{}', did you mean '{}'?", mnemonic, suggestion),
            AssembleErrorKind::UnknownMnemonic { mnemonic, suggestion: None } =>
                write!(f, "unknown instruction '{}'", mnemonic),
            AssembleErrorKind::UnexpectedToken { token } =>
                write!(f, "unexpected token '{}'", token),
            AssembleErrorKind::OperandCount { mnemonic, expected, found } =>
                write!(f, "{} takes {} operand(s), found {}", mnemonic, expected, found),
            AssembleErrorKind::ExpectedRegister { found } =>
                write!(f, "expected a register, found '{}'", found),
            AssembleErrorKind::InvalidLiteral { literal } =>
                write!(f, "invalid byte literal '{}'", literal),
        }
    }
}

impl std::error::Error for AssembleError {}

/// Error raised before execution begins, while locating and loading a program.
#[derive(Debug)]
pub enum LoadError {
    /// No program file was supplied.
    MissingProgramArgument,

    /// The named program file does not exist.
    ProgramFileNotFound {
        path: String,
    },

    /// Any other failure while reading the program file.
    Io(std::io::Error),

    /// The program image is malformed.
    Parse(ParseError),

    /// The assembly source is malformed.
    Assemble(AssembleError),

    /// The program does not fit in memory.
    ImageTooLarge {
        size: usize,
    },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::MissingProgramArgument =>
                write!(f, "no program file given"),
            LoadError::ProgramFileNotFound { path } =>
                write!(f, "{}: file was not found", path),
            LoadError::Io(err) => write!(f, "IO error: {}", err),
            LoadError::Parse(err) => write!(f, "parse error {}", err),
            LoadError::Assemble(err) => write!(f, "assembly error {}", err),
            LoadError::ImageTooLarge { size } =>
                write!(f, "program is {} bytes long but memory only holds {}", size, crate::memory::MEMORY_SIZE),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Parse(err) => Some(err),
            LoadError::Assemble(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> LoadError {
        LoadError::Parse(e)
    }
}

impl From<AssembleError> for LoadError {
    fn from(e: AssembleError) -> LoadError {
        LoadError::Assemble(e)
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> LoadError {
        LoadError::Io(e)
    }
}
