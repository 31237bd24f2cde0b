//! A crate for assembling and emulating the LS-8, an imaginary eight bit processor used for
//! teaching the fetch-decode-execute cycle.
//!
//! Currently this crate provides the functionality to:
//! - Read `.ls8` program images containing LS-8 machine code.
//! - Assemble `.asm` files containing LS-8 mnemonics.
//! - Execute machine code.
//!
//! The processor has 256 bytes of memory, eight byte-sized registers `R0`-`R7` and a stack that
//! grows down from `0xF4`. `R7` is the stack pointer.
//!
//! # Unimplemented stuff
//! - Interrupts and the flags register, and with them `CMP` and the jump instructions
//! - ALU operations other than `ADD` and `MUL`
//!
//! # Example
//! ```
//! use ls8::{
//!     asm,
//!     emulator::{Emulator, StdIo},
//! };
//!
//! fn main() {
//!     // Simple LS-8 program that multiplies 8 and 9 together and prints the answer.
//!     let source = r#"
//!         LDI R0, 8
//!         LDI R1, 9
//!         MUL R0, R1
//!         PRN R0
//!         HLT
//!     "#;
//!
//!     // Assemble the source into machine code.
//!     let image = asm::assemble(source).unwrap();
//!
//!     // Load the machine code into an emulator which uses the standard output.
//!     let mut emulator = Emulator::from_image(&image, StdIo)
//!         .expect("program does not fit in memory");
//!
//!     // Execute the machine code.
//!     emulator.run()
//!         .expect("an error occured while emulating the program");
//! }
//! ```
//!
//! # Executables
//!
//! ## `ls8`
//!
//! Runs a program image or an assembly file and prints the output of every `PRN` instruction.
//!
//! ```text
//! $ ls8 --trace mult.ls8
//! TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4
//! ...
//! 72
//! ```
pub mod alu;
pub mod asm;
pub mod config;
pub mod emulator;
pub mod error;
pub mod image;
pub mod instruction;
pub mod memory;
pub mod registers;
