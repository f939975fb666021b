#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

pub use adxl362::config::TransferConfig;
pub use adxl362::interface::bitbang::{BitBangInterface, BusError, BusPort};
pub use adxl362::{Adxl362, Config, Error};

use embedded_hal_mock as hal;
pub use hal::eh1::delay::NoopDelay;
pub use hal::eh1::spi::{Mock as SpiMock, Transaction as SpiTrans};

pub type SimDriver = Adxl362<BitBangInterface<SimAdxl362>>;

const REGISTER_COUNT: usize = 0x40;

/// One chip-select frame as seen on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub mosi: Vec<u8>,
    pub miso: Vec<u8>,
}

/// Bit-level model of the sensor's serial interface.
///
/// Data-out is latched on the rising clock edge, data-in is driven from the
/// current output byte MSB first. Any protocol violation is recorded instead
/// of panicking so tests can assert on it.
pub struct SimAdxl362 {
    pub regs: [u8; REGISTER_COUNT],
    pub fifo: VecDeque<u8>,
    pub frames: Vec<Frame>,
    pub violations: Vec<&'static str>,
    /// Edges after which the completion flag stops being reported.
    pub stall_after_edges: Option<u32>,
    pub selects: u32,
    pub releases: u32,
    select_low: bool,
    clock_high: bool,
    mosi: bool,
    shift_in: u8,
    shift_out: u8,
    bit: u8,
    byte_index: usize,
    command: u8,
    address: u8,
    edges: u32,
}

impl SimAdxl362 {
    pub fn new() -> Self {
        let mut sim = Self {
            regs: [0; REGISTER_COUNT],
            fifo: VecDeque::new(),
            frames: Vec::new(),
            violations: Vec::new(),
            stall_after_edges: None,
            selects: 0,
            releases: 0,
            select_low: false,
            clock_high: false,
            mosi: false,
            shift_in: 0,
            shift_out: 0,
            bit: 0,
            byte_index: 0,
            command: 0,
            address: 0,
            edges: 0,
        };
        sim.power_on_reset();
        sim
    }

    fn power_on_reset(&mut self) {
        self.regs = [0; REGISTER_COUNT];
        self.regs[0x00] = 0xAD;
        self.regs[0x01] = 0x1D;
        self.regs[0x02] = 0xF2;
        self.regs[0x03] = 0x01;
        self.regs[0x0B] = 0x40;
        self.regs[0x29] = 0x80;
        self.regs[0x2C] = 0x13;
    }

    pub fn last_frame(&self) -> &Frame {
        self.frames.last().expect("no frame recorded")
    }

    fn store(&mut self, value: u8) {
        let index = usize::from(self.address) % REGISTER_COUNT;
        if self.address == 0x1F {
            if value == 0x52 {
                self.power_on_reset();
            }
        } else {
            self.regs[index] = value;
        }
        self.address = self.address.wrapping_add(1);
    }

    fn load(&self) -> u8 {
        self.regs[usize::from(self.address) % REGISTER_COUNT]
    }

    fn complete_byte(&mut self) {
        let received = self.shift_in;
        if let Some(frame) = self.frames.last_mut() {
            frame.mosi.push(received);
            frame.miso.push(self.shift_out);
        }
        self.shift_in = 0;
        self.bit = 0;

        self.shift_out = match (self.byte_index, self.command) {
            (0, _) => {
                self.command = received;
                match received {
                    0x0D => self.fifo.pop_front().unwrap_or(0),
                    0x0A | 0x0B => 0,
                    _ => {
                        self.violations.push("unknown command");
                        0
                    }
                }
            }
            (_, 0x0D) => self.fifo.pop_front().unwrap_or(0),
            (1, 0x0A) => {
                self.address = received;
                0
            }
            (1, 0x0B) => {
                self.address = received;
                self.load()
            }
            (_, 0x0A) => {
                self.store(received);
                0
            }
            (_, 0x0B) => {
                self.address = self.address.wrapping_add(1);
                self.load()
            }
            _ => 0,
        };
        self.byte_index += 1;
    }
}

impl BusPort for SimAdxl362 {
    type Error = Infallible;

    fn assert_select(&mut self) -> Result<(), Self::Error> {
        if self.select_low {
            self.violations.push("select asserted twice");
        }
        self.select_low = true;
        self.selects += 1;
        self.bit = 0;
        self.byte_index = 0;
        self.shift_in = 0;
        self.shift_out = 0;
        self.frames.push(Frame::default());
        Ok(())
    }

    fn deassert_select(&mut self) -> Result<(), Self::Error> {
        if self.select_low && self.bit != 0 {
            self.violations.push("select released mid-byte");
        }
        self.select_low = false;
        self.releases += 1;
        Ok(())
    }

    fn set_clock(&mut self, high: bool) -> Result<(), Self::Error> {
        self.edges += 1;
        let rising = high && !self.clock_high;
        let falling = !high && self.clock_high;
        self.clock_high = high;

        if !self.select_low {
            if rising {
                self.violations.push("clock pulsed while idle");
            }
            return Ok(());
        }

        if rising {
            self.shift_in = (self.shift_in << 1) | u8::from(self.mosi);
        } else if falling {
            self.bit += 1;
            if self.bit == 8 {
                self.complete_byte();
            }
        }
        Ok(())
    }

    fn set_data_out(&mut self, high: bool) -> Result<(), Self::Error> {
        if self.select_low && self.clock_high {
            self.violations.push("data changed while clock high");
        }
        self.mosi = high;
        Ok(())
    }

    fn read_data_in(&mut self) -> Result<bool, Self::Error> {
        if !self.select_low {
            // Pulled up while the device tri-states its output.
            return Ok(true);
        }
        Ok(self.shift_out & (0x80 >> self.bit) != 0)
    }

    fn pulse_and_wait_complete(&mut self) -> Result<bool, Self::Error> {
        match self.stall_after_edges {
            Some(limit) if self.edges > limit => Ok(false),
            _ => Ok(true),
        }
    }
}

pub fn sim_driver(config: Config) -> SimDriver {
    Adxl362::new_bitbang(SimAdxl362::new(), TransferConfig::default(), config).unwrap()
}

pub fn sim(dev: &mut SimDriver) -> &mut SimAdxl362 {
    dev.interface_mut().port_mut()
}

pub fn spi_write(register: u8, data: Vec<u8>) -> Vec<SpiTrans<u8>> {
    vec![
        SpiTrans::transaction_start(),
        SpiTrans::write_vec(vec![0x0A, register]),
        SpiTrans::write_vec(data),
        SpiTrans::transaction_end(),
    ]
}

pub fn spi_read(register: u8, response: Vec<u8>) -> Vec<SpiTrans<u8>> {
    vec![
        SpiTrans::transaction_start(),
        SpiTrans::write_vec(vec![0x0B, register]),
        SpiTrans::read_vec(response),
        SpiTrans::transaction_end(),
    ]
}

pub fn spi_fifo(response: Vec<u8>) -> Vec<SpiTrans<u8>> {
    vec![
        SpiTrans::transaction_start(),
        SpiTrans::write_vec(vec![0x0D]),
        SpiTrans::read_vec(response),
        SpiTrans::transaction_end(),
    ]
}
