//! [`BusPort`] implementation over plain `embedded-hal` pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, ErrorKind, InputPin, OutputPin};

use super::bitbang::BusPort;

/// Default clock half-period, giving a bus clock of roughly 1 MHz.
pub const DEFAULT_HALF_PERIOD_NS: u32 = 500;

/// Drives the sensor bus through four GPIO lines.
///
/// The HAL is expected to hand over select, clock and data-out as push-pull
/// outputs and data-in as an input with pull-up enabled.
pub struct GpioPort<CS, SCK, MOSI, MISO, D> {
    cs: CS,
    sck: SCK,
    mosi: MOSI,
    miso: MISO,
    delay: D,
    half_period_ns: u32,
}

impl<CS, SCK, MOSI, MISO, D> GpioPort<CS, SCK, MOSI, MISO, D>
where
    CS: OutputPin,
    SCK: OutputPin,
    MOSI: OutputPin,
    MISO: InputPin,
    D: DelayNs,
{
    /// Creates a port with the default clock half-period.
    pub fn new(cs: CS, sck: SCK, mosi: MOSI, miso: MISO, delay: D) -> Self {
        Self::with_half_period(cs, sck, mosi, miso, delay, DEFAULT_HALF_PERIOD_NS)
    }

    /// Creates a port whose clock stays at each level for `half_period_ns`.
    pub fn with_half_period(
        cs: CS,
        sck: SCK,
        mosi: MOSI,
        miso: MISO,
        delay: D,
        half_period_ns: u32,
    ) -> Self {
        Self {
            cs,
            sck,
            mosi,
            miso,
            delay,
            half_period_ns,
        }
    }

    /// Consumes the port and returns the owned pins and delay provider.
    pub fn release(self) -> (CS, SCK, MOSI, MISO, D) {
        (self.cs, self.sck, self.mosi, self.miso, self.delay)
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> core::result::Result<(), ErrorKind> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|err| err.kind())
}

impl<CS, SCK, MOSI, MISO, D> BusPort for GpioPort<CS, SCK, MOSI, MISO, D>
where
    CS: OutputPin,
    SCK: OutputPin,
    MOSI: OutputPin,
    MISO: InputPin,
    D: DelayNs,
{
    type Error = ErrorKind;

    fn assert_select(&mut self) -> core::result::Result<(), Self::Error> {
        drive(&mut self.cs, false)
    }

    fn deassert_select(&mut self) -> core::result::Result<(), Self::Error> {
        drive(&mut self.cs, true)
    }

    fn set_clock(&mut self, high: bool) -> core::result::Result<(), Self::Error> {
        drive(&mut self.sck, high)
    }

    fn set_data_out(&mut self, high: bool) -> core::result::Result<(), Self::Error> {
        drive(&mut self.mosi, high)
    }

    fn read_data_in(&mut self) -> core::result::Result<bool, Self::Error> {
        self.miso.is_high().map_err(|err| err.kind())
    }

    // GPIO edges are synchronous; the half-period delay is the whole wait.
    fn pulse_and_wait_complete(&mut self) -> core::result::Result<bool, Self::Error> {
        self.delay.delay_ns(self.half_period_ns);
        Ok(true)
    }
}
