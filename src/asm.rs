//! A small assembler for the LS-8 mnemonics.
//!
//! ```text
//! ; multiply two numbers
//! LDI R0, 8
//! LDI R1, 0x09
//! MUL R0, R1
//! PRN R0      # prints 72
//! HLT
//! ```
//!
//! Every line holds at most one instruction. Operands are registers `R0`-`R7` or byte literals
//! in decimal, hexadecimal (`0x`) or binary (`0b`) notation. Comments start with `;` or `#`.

use logos::{Lexer, Logos};

use crate::error::{AssembleError, AssembleErrorKind};
use crate::instruction::{instruction_length, Instruction, OpCode, OperandKind};

/// Tokens of the assembly source.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token<'a> {
    #[error]
    #[regex(r"[ \t\r\f]+", logos::skip)]
    #[regex(r"[;#][^\n]*", logos::skip)]
    Error,

    /// A mnemonic or a register name.
    #[regex("[A-Za-z_][A-Za-z0-9_]*", Lexer::slice)]
    Word(&'a str),

    /// A number literal, validated by the parser.
    #[regex("[0-9][0-9A-Za-z_]*", Lexer::slice)]
    Number(&'a str),

    #[token(",")]
    Separator,

    #[token("\n")]
    Newline,
}

/// Mnemonics at most this many edits away from a known one get a suggestion.
const SUGGESTION_DISTANCE: usize = 2;

fn suggest(mnemonic: &str) -> Option<&'static str> {
    let mnemonic = mnemonic.to_uppercase();

    OpCode::ALL
        .iter()
        .map(|opcode| (edit_distance::edit_distance(&mnemonic, opcode.mnemonic()), opcode.mnemonic()))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, mnemonic)| mnemonic)
}

fn parse_literal(literal: &str) -> Option<u8> {
    let literal = literal.replace('_', "");

    if let Some(hex) = literal.strip_prefix("0x") {
        u8::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = literal.strip_prefix("0b") {
        u8::from_str_radix(bin, 2).ok()
    } else {
        literal.parse().ok()
    }
}

fn parse_register(word: &str) -> Option<u8> {
    let mut chars = word.chars();

    match (chars.next(), chars.next(), chars.next()) {
        (Some('R'), Some(digit), None) | (Some('r'), Some(digit), None) =>
            digit.to_digit(8).map(|d| d as u8),
        _ => None,
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Word(word) => word.to_string(),
        Token::Number(number) => number.to_string(),
        Token::Separator => ",".to_string(),
        Token::Newline => "end of line".to_string(),
        Token::Error => "invalid character".to_string(),
    }
}

/// Assembles a single line that has been split into tokens.
fn assemble_line(line: usize, tokens: &[Token]) -> Result<Option<Instruction>, AssembleError> {
    let error = |kind| AssembleError { line, kind };

    let (mnemonic, rest) = match tokens.split_first() {
        None => return Ok(None),
        Some((Token::Word(mnemonic), rest)) => (*mnemonic, rest),
        Some((token, _)) => return Err(error(AssembleErrorKind::UnexpectedToken {
            token: describe(token),
        })),
    };

    let opcode = OpCode::from_mnemonic(mnemonic)
        .ok_or_else(|| error(AssembleErrorKind::UnknownMnemonic {
            mnemonic: mnemonic.to_string(),
            suggestion: suggest(mnemonic),
        }))?;

    let mut operands = Vec::new();
    let mut expect_operand = !rest.is_empty();

    for token in rest {
        match (expect_operand, token) {
            (true, Token::Word(_)) | (true, Token::Number(_)) => {
                operands.push(token);
                expect_operand = false;
            },
            (false, Token::Separator) => expect_operand = true,
            (_, token) => return Err(error(AssembleErrorKind::UnexpectedToken {
                token: describe(token),
            })),
        }
    }

    if expect_operand {
        return Err(error(AssembleErrorKind::UnexpectedToken {
            token: describe(&Token::Newline),
        }));
    }

    let kinds = opcode.operands();

    if kinds.len() != operands.len() {
        return Err(error(AssembleErrorKind::OperandCount {
            mnemonic: opcode.mnemonic(),
            expected: kinds.len(),
            found: operands.len(),
        }));
    }

    let bytes = kinds.iter()
        .zip(operands)
        .map(|(kind, token)| match (kind, token) {
            (OperandKind::Register, Token::Word(word)) => parse_register(word)
                .ok_or_else(|| error(AssembleErrorKind::ExpectedRegister { found: word.to_string() })),
            (OperandKind::Register, token) =>
                Err(error(AssembleErrorKind::ExpectedRegister { found: describe(token) })),
            (OperandKind::Immediate, Token::Number(literal)) => parse_literal(literal)
                .ok_or_else(|| error(AssembleErrorKind::InvalidLiteral { literal: literal.to_string() })),
            (OperandKind::Immediate, token) =>
                Err(error(AssembleErrorKind::InvalidLiteral { literal: describe(token) })),
        })
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(Some(Instruction { opcode, operands: bytes }))
}

/// Assembles `source` into a program image.
///
/// # Errors
/// The first [AssembleError] encountered.
pub fn assemble(source: &str) -> Result<Vec<u8>, AssembleError> {
    let mut image = Vec::new();
    let mut line = 1;
    let mut tokens = Vec::new();

    for token in Token::lexer(source).chain(std::iter::once(Token::Newline)) {
        if token != Token::Newline {
            tokens.push(token);
            continue;
        }

        if let Some(ins) = assemble_line(line, &tokens)? {
            image.extend(ins.to_bytes());
        }

        tokens.clear();
        line += 1;
    }

    Ok(image)
}

/// Renders a program image as assembly source, one instruction per line.
///
/// Bytes that do not decode to an instruction, or an instruction cut short by the end of the
/// image, are written as `; 0x..` comments.
pub fn disassemble(image: &[u8]) -> String {
    let mut out = String::new();
    let mut address = 0;

    while address < image.len() {
        let byte = image[address];
        let end = address + instruction_length(byte);

        match OpCode::from_byte(byte) {
            Some(opcode) if end <= image.len() => {
                let ins = Instruction::new(opcode, &image[address + 1..end]);
                out.push_str(&format!("{}\n", ins));
                address = end;
            },
            _ => {
                out.push_str(&format!("; 0x{:02x}\n", byte));
                address += 1;
            },
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_mult() {
        let image = assemble(r#"
            ; mult.asm
            LDI R0, 8
            LDI R1, 0x09
            MUL R0, R1
            PRN R0      # 72
            HLT
        "#).unwrap();

        assert_eq!(image, vec![
            0x82, 0, 8,
            0x82, 1, 9,
            0xA2, 0, 1,
            0x47, 0,
            0x01,
        ]);
    }

    #[test]
    fn test_literals_and_case() {
        let image = assemble("ldi r7, 0b1111_0100\npush R7\npop r2\n").unwrap();

        assert_eq!(image, vec![0x82, 7, 0xF4, 0x45, 7, 0x46, 2]);
    }

    #[test]
    fn test_unknown_mnemonic() {
        let err = assemble("LDI R0, 1\nPSUH R0\n").unwrap_err();

        assert_eq!(err.line, 2);
        assert_eq!(err.kind, AssembleErrorKind::UnknownMnemonic {
            mnemonic: "PSUH".to_string(),
            suggestion: Some("PUSH"),
        });

        let err = assemble("CALL R0").unwrap_err();
        assert_eq!(err.kind, AssembleErrorKind::UnknownMnemonic {
            mnemonic: "CALL".to_string(),
            suggestion: None,
        });
    }

    #[test]
    fn test_operand_errors() {
        let err = assemble("PRN").unwrap_err();
        assert_eq!(err.kind, AssembleErrorKind::OperandCount { mnemonic: "PRN", expected: 1, found: 0 });

        let err = assemble("LDI R8, 1").unwrap_err();
        assert_eq!(err.kind, AssembleErrorKind::ExpectedRegister { found: "R8".to_string() });

        let err = assemble("LDI R0, 256").unwrap_err();
        assert_eq!(err.kind, AssembleErrorKind::InvalidLiteral { literal: "256".to_string() });

        let err = assemble("MUL R0,").unwrap_err();
        assert_eq!(err.kind, AssembleErrorKind::UnexpectedToken { token: "end of line".to_string() });

        let err = assemble("MUL R0 R1").unwrap_err();
        assert_eq!(err.kind, AssembleErrorKind::UnexpectedToken { token: "R1".to_string() });
    }

    #[test]
    fn test_disassemble() {
        let text = disassemble(&[0x82, 0, 8, 0x00, 0x47, 0, 0x01, 0x82, 5]);

        assert_eq!(text, "LDI R0, 8\n; 0x00\nPRN R0\nHLT\n; 0x82\n; 0x05\n");
    }
}
