//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.
//!
//! The `SpiDevice` transaction owns chip-select, so one transaction is one
//! framed exchange.

use embedded_hal::spi::{Operation, SpiDevice};

use super::{Adxl362Interface, Command};

/// Hardware-SPI interface implementation for the ADXL362 driver.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Adxl362Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let header = [u8::from(Command::ReadRegister), register];
        let mut operations = [Operation::Write(&header), Operation::Read(buf)];
        self.spi.transaction(&mut operations)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let header = [u8::from(Command::WriteRegister), register];
        let mut operations = [Operation::Write(&header), Operation::Write(data)];
        self.spi.transaction(&mut operations)
    }

    fn read_fifo(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        let header = [u8::from(Command::ReadFifo)];
        if buf.is_empty() {
            return self.spi.transaction(&mut [Operation::Write(&header)]);
        }

        let mut operations = [Operation::Write(&header), Operation::Read(buf)];
        self.spi.transaction(&mut operations)
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::Adxl362Interface;
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

    struct MockDevice<'a> {
        expectations: &'a [TransactionExpectation<'a>],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        fn new(expectations: &'a [TransactionExpectation<'a>]) -> Self {
            Self { expectations, index: 0 }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all SPI expectations consumed"
            );
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = Infallible;
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            let (first, rest) = operations.split_first_mut().expect("missing header op");
            match first {
                Operation::Write(data) => assert_eq!(*data, expected.header, "header mismatch"),
                _ => panic!("first operation must be write"),
            }

            match (expected.body, rest.first_mut()) {
                (Body::None, None) => {}
                (Body::Read(response), Some(Operation::Read(buf))) => {
                    assert_eq!(buf.len(), response.len(), "response length mismatch");
                    buf.copy_from_slice(response);
                }
                (Body::Write(payload), Some(Operation::Write(data))) => {
                    assert_eq!(*data, payload, "payload mismatch");
                }
                _ => panic!("operation shape mismatch"),
            }
            assert!(rest.len() <= 1, "at most one body operation per frame");

            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum Body<'a> {
        None,
        Read(&'a [u8]),
        Write(&'a [u8]),
    }

    #[derive(Clone, Copy)]
    struct TransactionExpectation<'a> {
        header: &'a [u8],
        body: Body<'a>,
    }

    #[test]
    fn soft_reset_frame_matches_wire_format() {
        let expectations = [TransactionExpectation {
            header: &[0x0A, 0x1F],
            body: Body::Write(&[0x52]),
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_register(0x1F, 0x52).unwrap();
    }

    #[test]
    fn read_register16_assembles_low_byte_first() {
        let expectations = [TransactionExpectation {
            header: &[0x0B, 0x0E],
            body: Body::Read(&[0x34, 0x12]),
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        assert_eq!(interface.read_register16(0x0E).unwrap(), 0x1234);
    }

    #[test]
    fn write_register16_sends_low_byte_first() {
        let expectations = [TransactionExpectation {
            header: &[0x0A, 0x20],
            body: Body::Write(&[0xFA, 0x01]),
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_register16(0x20, 0x01FA).unwrap();
    }

    #[test]
    fn read_fifo_streams_requested_bytes() {
        let expectations = [TransactionExpectation {
            header: &[0x0D],
            body: Body::Read(&[0x01, 0x02, 0x03]),
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        let mut buffer = [0u8; 3];
        interface.read_fifo(&mut buffer).unwrap();
        assert_eq!(buffer, [0x01, 0x02, 0x03]);
    }

    #[test]
    fn empty_fifo_read_still_sends_command() {
        let expectations = [TransactionExpectation {
            header: &[0x0D],
            body: Body::None,
        }];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.read_fifo(&mut []).unwrap();
    }

    #[test]
    fn read_many_ignores_empty_buffer() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.read_many(0x08, &mut []).unwrap();
    }

    #[test]
    fn write_many_ignores_empty_payload() {
        let expectations: [TransactionExpectation; 0] = [];
        let mock = MockDevice::new(&expectations);
        let mut interface = SpiInterface::new(mock);

        interface.write_many(0x08, &[]).unwrap();
    }
}
