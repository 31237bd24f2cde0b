//! Reading `.ls8` program images.
//!
//! An image holds one byte per line written as a binary literal, optionally followed by a
//! comment starting with `#`:
//!
//! ```text
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! Surrounding whitespace, blank lines and lines with nothing but a comment are ignored.

use std::fs;
use std::io;
use std::path::Path;

use nom::{
    IResult,
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::{all_consuming, map, map_res, opt, rest},
    error::{context, ErrorKind, ParseError as _},
    sequence::{preceded, tuple},
};

use crate::asm;
use crate::error::{LoadError, ParseError};

type Result<'a, T> = IResult<&'a str, T, ParseError>;

const SPACE_CHARACTERS: &'static str = " \t\r";

fn sp(input: &str) -> Result<&str> {
    take_while(|c| SPACE_CHARACTERS.contains(c))(input)
}

fn take_binary_byte(input: &str) -> Result<u8> {
    context(
        "binary literal",
        map_res(
            take_while1(|c: char| c.is_digit(2)),
            |s| u8::from_str_radix(s, 2),
        ),
    )(input)
}

fn comment(input: &str) -> Result<&str> {
    preceded(char('#'), rest)(input)
}

fn parse_line(input: &str) -> Result<Option<u8>> {
    all_consuming(
        map(
            tuple((sp, opt(take_binary_byte), sp, opt(comment))),
            |(_, byte, _, _)| byte,
        ),
    )(input)
}

/// Parses the text of a program image into the bytes to be loaded at address zero.
///
/// # Errors
/// A [ParseError] pointing at the first malformed line.
pub fn parse_image(input: &str) -> std::result::Result<Vec<u8>, ParseError> {
    let mut image = Vec::new();

    for (index, line) in input.lines().enumerate() {
        match parse_line(line) {
            Ok((_, Some(byte))) => image.push(byte),
            Ok((_, None)) => (),
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) =>
                return Err(err.at_line(index + 1)),
            Err(nom::Err::Incomplete(_)) =>
                return Err(ParseError::from_error_kind(line, ErrorKind::Complete).at_line(index + 1)),
        }
    }

    Ok(image)
}

/// Reads the program in `path`.
///
/// Files with the `.asm` extension are [assembled](crate::asm::assemble), everything else is
/// parsed as a program image.
///
/// # Errors
/// [LoadError::ProgramFileNotFound] if the file does not exist, otherwise the first IO, parse or
/// assembly error.
pub fn read_program<P: AsRef<Path>>(path: P) -> std::result::Result<Vec<u8>, LoadError> {
    let path = path.as_ref();

    let source = fs::read_to_string(path)
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => LoadError::ProgramFileNotFound {
                path: path.display().to_string(),
            },
            _ => LoadError::Io(err),
        })?;

    let image = match path.extension().and_then(|ext| ext.to_str()) {
        Some("asm") => asm::assemble(&source)?,
        _ => parse_image(&source)?,
    };

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_print8() {
        let image = parse_image(r#"
# print8.ls8
10000010 # LDI R0,8
00000000
00001000
01000111 # PRN R0
00000000
00000001 # HLT
"#).unwrap();

        assert_eq!(image, vec![0x82, 0, 8, 0x47, 0, 0x01]);
    }

    #[test]
    fn test_whitespace_and_comments() {
        let image = parse_image("  \t10100010   \r\n\n#only a comment\n   # indented comment\n00000001#no space\n").unwrap();

        assert_eq!(image, vec![0xA2, 0x01]);
    }

    #[test]
    fn test_empty_image() {
        assert_eq!(parse_image(""), Ok(vec![]));
        assert_eq!(parse_image("\n\n# nothing\n"), Ok(vec![]));
    }

    #[test]
    fn test_invalid_lines() {
        let err = parse_image("00000001\n0000000x\n").unwrap_err();
        assert_eq!(err.line, 2);

        let err = parse_image("# header\n\n100000001\n").unwrap_err();
        assert_eq!(err.line, 3);

        let err = parse_image("LDI R0, 8").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.to_string().starts_with("at line 1:"), "{}", err);
    }

    #[test]
    fn test_parse_error_source() {
        use std::error::Error;

        let err = LoadError::from(parse_image("0000000x\n").unwrap_err());
        let source = err.source().expect("parse error as source");
        assert!(source.to_string().starts_with("at line 1:"), "{}", source);
    }

    #[test]
    fn test_missing_file() {
        match read_program("/nonexistent/program.ls8") {
            Err(LoadError::ProgramFileNotFound { path }) => assert_eq!(path, "/nonexistent/program.ls8"),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
