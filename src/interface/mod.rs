//! Bus interface abstraction for the ADXL362 driver.
//!
//! Every exchange with the sensor is one chip-select frame that starts with a
//! command byte:
//!
//! | Exchange        | Bytes                          |
//! |-----------------|--------------------------------|
//! | Write registers | `[0x0A, addr, data...]`        |
//! | Read registers  | `[0x0B, addr, dummy...]`       |
//! | Read FIFO       | `[0x0D, dummy...]`             |

pub mod bitbang;
pub mod gpio;
pub mod spi;

/// Byte clocked out while the device streams data back.
pub const DUMMY_BYTE: u8 = 0x00;

/// Command byte opening every framed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Write one or more consecutive registers.
    WriteRegister = 0x0A,
    /// Read one or more consecutive registers.
    ReadRegister = 0x0B,
    /// Stream bytes out of the FIFO.
    ReadFifo = 0x0D,
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command as u8
    }
}

/// Abstraction over the register access protocol required by the driver.
///
/// Each method is exactly one framed exchange.
pub trait Adxl362Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads multiple consecutive registers into the provided buffer.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes multiple consecutive registers from the provided buffer.
    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Streams `buf.len()` bytes out of the FIFO.
    ///
    /// The command byte is always issued, even for an empty buffer.
    fn read_fifo(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.write_many(register, core::slice::from_ref(&value))
    }

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    /// Writes a 16-bit register pair, low byte first.
    fn write_register16(&mut self, register: u8, value: u16) -> core::result::Result<(), Self::Error> {
        self.write_many(register, &value.to_le_bytes())
    }

    /// Reads a 16-bit register pair, low byte first.
    fn read_register16(&mut self, register: u8) -> core::result::Result<u16, Self::Error> {
        let mut raw = [0u8; 2];
        self.read_many(register, &mut raw)?;
        Ok(u16::from_le_bytes(raw))
    }
}
