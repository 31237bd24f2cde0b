//! The register file.

use crate::error::ExecutionError;

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Index of the register used as the stack pointer.
pub const STACK_POINTER: u8 = 7;

/// Initial value of the stack pointer. The stack grows down from here.
pub const STACK_BASE_ADDRESS: u8 = 0xF4;

/// The eight byte-sized work registers `R0`-`R7`. `R7` doubles as the stack pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Registers {
    r: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Registers {
        let mut r = [0; REGISTER_COUNT];
        r[STACK_POINTER as usize] = STACK_BASE_ADDRESS;

        Registers { r }
    }

    /// Returns the value of register `index`.
    ///
    /// # Errors
    /// [ExecutionError::InvalidRegister] if `index` is not in `0..8`.
    pub fn get(&self, index: u8) -> Result<u8, ExecutionError> {
        self.r.get(index as usize)
            .copied()
            .ok_or(ExecutionError::InvalidRegister { index })
    }

    /// Sets the value of register `index`.
    ///
    /// # Errors
    /// [ExecutionError::InvalidRegister] if `index` is not in `0..8`.
    pub fn set(&mut self, index: u8, value: u8) -> Result<(), ExecutionError> {
        match self.r.get_mut(index as usize) {
            Some(register) => {
                *register = value;
                Ok(())
            },
            None => Err(ExecutionError::InvalidRegister { index }),
        }
    }

    /// Checks that `index` names a register.
    pub fn validate(&self, index: u8) -> Result<u8, ExecutionError> {
        self.get(index).map(|_| index)
    }

    pub fn sp(&self) -> u8 {
        self.r[STACK_POINTER as usize]
    }

    /// Decrements the stack pointer and returns the address of the new stack top.
    pub fn push_sp(&mut self) -> u8 {
        let sp = &mut self.r[STACK_POINTER as usize];
        *sp = sp.wrapping_sub(1);
        *sp
    }

    /// Returns the address of the current stack top and increments the stack pointer past it.
    pub fn pop_sp(&mut self) -> u8 {
        let sp = &mut self.r[STACK_POINTER as usize];
        let top = *sp;
        *sp = sp.wrapping_add(1);
        top
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.r[..]
    }
}

impl Default for Registers {
    fn default() -> Registers {
        Registers::new()
    }
}
