//! Byte addressable memory of the LS-8.

use crate::error::{ExecutionError, LoadError};

/// Number of addressable memory cells.
pub const MEMORY_SIZE: usize = 256;

/// Trait for implementing the memory of an LS-8 processor.
///
/// Addresses are `usize` rather than `u8` so that a runaway program counter is reported as an
/// [invalid address](ExecutionError::InvalidAddress) instead of silently wrapping around.
pub trait Memory {
    /// Fetch the byte from the specified address.
    ///
    /// # Errors
    /// [ExecutionError::InvalidAddress] if `address` is outside the memory.
    fn read(&self, address: usize) -> Result<u8, ExecutionError>;

    /// Overwrite the byte in the specified address.
    ///
    /// # Errors
    /// [ExecutionError::InvalidAddress] if `address` is outside the memory. Nothing is written in
    /// that case.
    fn write(&mut self, address: usize, value: u8) -> Result<(), ExecutionError>;
}

/// Flat, zero initialized memory of [MEMORY_SIZE] bytes.
#[derive(Clone)]
pub struct Ram {
    cells: [u8; MEMORY_SIZE],
}

impl Ram {
    pub fn new() -> Ram {
        Ram {
            cells: [0; MEMORY_SIZE],
        }
    }

    /// Creates a memory with `image` copied to the beginning of it.
    ///
    /// # Errors
    /// [LoadError::ImageTooLarge] if the image does not fit in the memory.
    pub fn from_image(image: &[u8]) -> Result<Ram, LoadError> {
        if image.len() > MEMORY_SIZE {
            return Err(LoadError::ImageTooLarge { size: image.len() });
        }

        let mut ram = Ram::new();
        ram.cells[..image.len()].copy_from_slice(image);

        Ok(ram)
    }

    /// Read-only view of the whole memory.
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells[..]
    }
}

impl Default for Ram {
    fn default() -> Ram {
        Ram::new()
    }
}

impl std::fmt::Debug for Ram {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let used = self.cells.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        write!(f, "Ram({:02x?}", &self.cells[..used])?;
        write!(f, " + {} zero bytes)", MEMORY_SIZE - used)
    }
}

impl Memory for Ram {
    fn read(&self, address: usize) -> Result<u8, ExecutionError> {
        self.cells.get(address)
            .copied()
            .ok_or(ExecutionError::InvalidAddress { address })
    }

    fn write(&mut self, address: usize, value: u8) -> Result<(), ExecutionError> {
        match self.cells.get_mut(address) {
            Some(cell) => {
                *cell = value;
                Ok(())
            },
            None => Err(ExecutionError::InvalidAddress { address }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mut ram = Ram::new();

        assert_eq!(ram.read(0), Ok(0));
        ram.write(0, 42).unwrap();
        ram.write(255, 7).unwrap();
        assert_eq!(ram.read(0), Ok(42));
        assert_eq!(ram.read(255), Ok(7));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ram = Ram::new();

        assert_eq!(ram.read(256), Err(ExecutionError::InvalidAddress { address: 256 }));
        assert_eq!(ram.write(300, 1), Err(ExecutionError::InvalidAddress { address: 300 }));
        assert!(ram.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_from_image() {
        let ram = Ram::from_image(&[0x82, 0, 8, 0x01]).unwrap();

        assert_eq!(&ram.as_bytes()[..5], &[0x82, 0, 8, 0x01, 0]);
        assert_eq!(ram.as_bytes().len(), MEMORY_SIZE);

        match Ram::from_image(&[0; MEMORY_SIZE + 1]) {
            Err(LoadError::ImageTooLarge { size }) => assert_eq!(size, MEMORY_SIZE + 1),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }

        assert!(Ram::from_image(&[1; MEMORY_SIZE]).is_ok());
    }
}
