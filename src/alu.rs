//! The arithmetic-logic unit.
//!
//! Register values are plain bytes, so every operation wraps modulo 256. There is no flags
//! register to report overflow.

use std::fmt;

use crate::error::ExecutionError;

/// Operations of the LS-8 ALU instruction group.
///
/// Only [AluOp::Add] and [AluOp::Multiply] are implemented by [apply], the rest are
/// rejected with [ExecutionError::UnsupportedAluOperation].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    And,
    Or,
    Xor,
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            AluOp::Add => "ADD",
            AluOp::Subtract => "SUB",
            AluOp::Multiply => "MUL",
            AluOp::Divide => "DIV",
            AluOp::And => "AND",
            AluOp::Or => "OR",
            AluOp::Xor => "XOR",
        })
    }
}

/// Performs `operation` on the values of two registers and returns the value to be written back
/// into the first register.
pub fn apply(operation: AluOp, a: u8, b: u8) -> Result<u8, ExecutionError> {
    match operation {
        AluOp::Add => Ok(a.wrapping_add(b)),
        AluOp::Multiply => Ok(a.wrapping_mul(b)),
        operation => Err(ExecutionError::UnsupportedAluOperation { operation }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_wraps() {
        assert_eq!(apply(AluOp::Add, 3, 4), Ok(7));
        assert_eq!(apply(AluOp::Add, 250, 10), Ok(4));
    }

    #[test]
    fn test_multiply_wraps() {
        assert_eq!(apply(AluOp::Multiply, 8, 9), Ok(72));
        assert_eq!(apply(AluOp::Multiply, 16, 16), Ok(0));
        assert_eq!(apply(AluOp::Multiply, 200, 3), Ok(88));
    }

    #[test]
    fn test_unsupported_operations() {
        for op in &[AluOp::Subtract, AluOp::Divide, AluOp::And, AluOp::Or, AluOp::Xor] {
            assert_eq!(
                apply(*op, 1, 1),
                Err(ExecutionError::UnsupportedAluOperation { operation: *op }),
            );
        }
    }
}
