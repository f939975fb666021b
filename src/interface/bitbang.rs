//! Bit-banged transfer engine and chip-select framing.
//!
//! Bytes are shifted most-significant-bit first. For every bit the engine
//! drives the data-out line, raises the clock, samples the data-in line and
//! lowers the clock again (CPOL = 0, CPHA = 0). Each clock edge is confirmed
//! through [`BusPort::pulse_and_wait_complete`], polled at most
//! [`TransferConfig::poll_limit`] times before the exchange fails with
//! [`BusError::Timeout`].

use super::{Adxl362Interface, Command, DUMMY_BYTE};
use crate::config::TransferConfig;

/// Line-level capability required to drive the sensor bus.
///
/// Production builds bind it to real pins (see
/// [`GpioPort`](crate::interface::gpio::GpioPort)); tests bind it to a
/// recording or simulated double.
pub trait BusPort {
    /// Error type produced by the concrete port.
    type Error;

    /// Drives the active-low chip-select line low.
    fn assert_select(&mut self) -> core::result::Result<(), Self::Error>;

    /// Drives the chip-select line high (bus idle).
    fn deassert_select(&mut self) -> core::result::Result<(), Self::Error>;

    /// Sets the clock line level.
    fn set_clock(&mut self, high: bool) -> core::result::Result<(), Self::Error>;

    /// Sets the data-out line level.
    fn set_data_out(&mut self, high: bool) -> core::result::Result<(), Self::Error>;

    /// Samples the data-in line.
    fn read_data_in(&mut self) -> core::result::Result<bool, Self::Error>;

    /// Waits out one clock half-period and reports whether the last edge has
    /// completed. Returning `false` makes the engine poll again.
    fn pulse_and_wait_complete(&mut self) -> core::result::Result<bool, Self::Error>;
}

/// Errors produced by the bit-banged transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<E> {
    /// A line operation on the port failed.
    Port(E),
    /// A clock edge was not acknowledged within the configured poll limit.
    Timeout,
}

impl<E> BusError<E> {
    /// Returns `true` when the bus stalled rather than failing outright.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Register access over a bit-banged bus.
pub struct BitBangInterface<P> {
    port: P,
    config: TransferConfig,
}

impl<P> BitBangInterface<P>
where
    P: BusPort,
{
    /// Takes ownership of the port and drives the bus idle: chip-select high,
    /// clock low.
    ///
    /// `config` is not validated here. A `poll_limit` of zero makes every
    /// transfer fail with [`BusError::Timeout`];
    /// [`Adxl362::new_bitbang`](crate::Adxl362::new_bitbang) rejects it up front.
    pub fn new(mut port: P, config: TransferConfig) -> core::result::Result<Self, BusError<P::Error>> {
        port.deassert_select().map_err(BusError::Port)?;
        port.set_clock(false).map_err(BusError::Port)?;
        Ok(Self { port, config })
    }

    /// Returns the active transfer configuration.
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Provides mutable access to the wrapped port.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Consumes the interface and returns the owned port.
    pub fn release(self) -> P {
        self.port
    }

    /// Shifts `out` onto the bus while shifting a byte in.
    ///
    /// Only meaningful inside a frame; the register access methods call this
    /// once per byte between chip-select assertion and release.
    pub fn transfer(&mut self, out: u8) -> core::result::Result<u8, BusError<P::Error>> {
        let mut received = 0u8;
        for bit in (0..8).rev() {
            self.port
                .set_data_out(out & (1 << bit) != 0)
                .map_err(BusError::Port)?;
            self.port.set_clock(true).map_err(BusError::Port)?;
            self.await_edge()?;

            if self.port.read_data_in().map_err(BusError::Port)? {
                received |= 1 << bit;
            }

            self.port.set_clock(false).map_err(BusError::Port)?;
            self.await_edge()?;
        }

        trace!("bus out={=u8:#x} in={=u8:#x}", out, received);
        Ok(received)
    }

    fn await_edge(&mut self) -> core::result::Result<(), BusError<P::Error>> {
        for _ in 0..self.config.poll_limit {
            if self.port.pulse_and_wait_complete().map_err(BusError::Port)? {
                return Ok(());
            }
        }

        warn!(
            "bus edge not acknowledged after {=u32} polls",
            self.config.poll_limit
        );
        Err(BusError::Timeout)
    }

    /// Runs `exchange` with chip-select held low for its whole duration.
    ///
    /// Chip-select is released even when the exchange fails; the first error
    /// wins.
    fn frame<R, F>(&mut self, exchange: F) -> core::result::Result<R, BusError<P::Error>>
    where
        F: FnOnce(&mut Self) -> core::result::Result<R, BusError<P::Error>>,
    {
        self.port.assert_select().map_err(BusError::Port)?;
        let result = exchange(self);
        if result.is_err() {
            // A failed transfer may stop with the clock high.
            let _ = self.port.set_clock(false);
        }
        let released = self.port.deassert_select().map_err(BusError::Port);

        let value = result?;
        released?;
        Ok(value)
    }

    fn send_all(&mut self, bytes: &[u8]) -> core::result::Result<(), BusError<P::Error>> {
        for &byte in bytes {
            self.transfer(byte)?;
        }
        Ok(())
    }

    fn receive_all(&mut self, buf: &mut [u8]) -> core::result::Result<(), BusError<P::Error>> {
        for slot in buf.iter_mut() {
            *slot = self.transfer(DUMMY_BYTE)?;
        }
        Ok(())
    }
}

impl<P> Adxl362Interface for BitBangInterface<P>
where
    P: BusPort,
{
    type Error = BusError<P::Error>;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        self.frame(|bus| {
            bus.send_all(&[u8::from(Command::ReadRegister), register])?;
            bus.receive_all(buf)
        })
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        self.frame(|bus| {
            bus.send_all(&[u8::from(Command::WriteRegister), register])?;
            bus.send_all(data)
        })
    }

    fn read_fifo(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        self.frame(|bus| {
            bus.transfer(u8::from(Command::ReadFifo))?;
            bus.receive_all(buf)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BitBangInterface, BusError, BusPort};
    use crate::config::TransferConfig;
    use crate::interface::Adxl362Interface;
    use core::convert::Infallible;

    /// Loopback port: data-in mirrors data-out, edges settle after `latency` polls.
    struct LoopbackPort {
        select_low: bool,
        clock_high: bool,
        data_out: bool,
        latency: u32,
        pending: u32,
        rising_edges: u32,
        selects: u32,
        releases: u32,
    }

    impl LoopbackPort {
        fn new(latency: u32) -> Self {
            Self {
                select_low: true,
                clock_high: true,
                data_out: false,
                latency,
                pending: 0,
                rising_edges: 0,
                selects: 0,
                releases: 0,
            }
        }
    }

    impl BusPort for LoopbackPort {
        type Error = Infallible;

        fn assert_select(&mut self) -> Result<(), Self::Error> {
            assert!(!self.select_low, "nested frame");
            self.select_low = true;
            self.selects += 1;
            Ok(())
        }

        fn deassert_select(&mut self) -> Result<(), Self::Error> {
            self.select_low = false;
            self.releases += 1;
            Ok(())
        }

        fn set_clock(&mut self, high: bool) -> Result<(), Self::Error> {
            if high && !self.clock_high {
                self.rising_edges += 1;
            }
            self.clock_high = high;
            self.pending = self.latency;
            Ok(())
        }

        fn set_data_out(&mut self, high: bool) -> Result<(), Self::Error> {
            assert!(!self.clock_high, "data changed while clock high");
            self.data_out = high;
            Ok(())
        }

        fn read_data_in(&mut self) -> Result<bool, Self::Error> {
            Ok(self.data_out)
        }

        fn pulse_and_wait_complete(&mut self) -> Result<bool, Self::Error> {
            if self.pending == 0 {
                return Ok(true);
            }
            self.pending -= 1;
            Ok(false)
        }
    }

    #[test]
    fn new_drives_bus_idle() {
        let bus = BitBangInterface::new(LoopbackPort::new(0), TransferConfig::default()).unwrap();
        let port = bus.release();
        assert!(!port.select_low);
        assert!(!port.clock_high);
    }

    #[test]
    fn transfer_shifts_msb_first_and_samples_each_bit() {
        let mut bus = BitBangInterface::new(LoopbackPort::new(0), TransferConfig::default()).unwrap();
        for value in [0x00, 0x01, 0x80, 0xA5, 0x5A, 0xFF] {
            assert_eq!(bus.transfer(value).unwrap(), value);
        }
        assert_eq!(bus.release().rising_edges, 6 * 8);
    }

    #[test]
    fn slow_edges_complete_within_poll_limit() {
        let mut bus = BitBangInterface::new(LoopbackPort::new(3), TransferConfig::new(4)).unwrap();
        assert_eq!(bus.transfer(0xC3).unwrap(), 0xC3);
    }

    #[test]
    fn stalled_edge_times_out_and_releases_select() {
        let mut bus = BitBangInterface::new(LoopbackPort::new(10), TransferConfig::new(10)).unwrap();
        let err = bus.write_register(0x2D, 0x02).unwrap_err();
        assert_eq!(err, BusError::Timeout);
        assert!(err.is_timeout());

        let port = bus.release();
        assert_eq!(port.selects, 1);
        assert!(!port.select_low);
    }

    #[test]
    fn zero_poll_limit_times_out_every_exchange() {
        let mut bus = BitBangInterface::new(LoopbackPort::new(0), TransferConfig::new(0)).unwrap();
        assert_eq!(bus.read_register(0x00), Err(BusError::Timeout));

        let port = bus.release();
        assert_eq!(port.rising_edges, 1);
        assert!(!port.select_low);
        assert!(!port.clock_high);
    }

    #[test]
    fn each_exchange_is_one_frame() {
        let mut bus = BitBangInterface::new(LoopbackPort::new(0), TransferConfig::default()).unwrap();
        bus.write_register16(0x20, 0x0123).unwrap();
        let _ = bus.read_register(0x00).unwrap();
        let mut fifo = [0u8; 4];
        bus.read_fifo(&mut fifo).unwrap();

        let port = bus.release();
        assert_eq!(port.selects, 3);
        // One extra release comes from `new`.
        assert_eq!(port.releases, 4);
        assert_eq!(port.rising_edges, (4 + 3 + 5) * 8);
    }
}
