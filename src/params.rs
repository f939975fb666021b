//! Strongly typed parameter enumerations for the ADXL362 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use adxl362::params::{OutputDataRate, PowerMode, Range};
//!
//! let odr = OutputDataRate::Od100Hz;
//! let range = Range::G4;
//! let mode = PowerMode::Measure;
//! let _ = (odr, range, mode);
//! ```

use modular_bitfield::prelude::Specifier;

/// Available output data rate (ODR) selections encoded in `FILTER_CTL[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum OutputDataRate {
    /// 12.5 Hz output data rate.
    Od12_5Hz = 0b000,
    /// 25 Hz output data rate.
    Od25Hz = 0b001,
    /// 50 Hz output data rate.
    Od50Hz = 0b010,
    /// 100 Hz output data rate (reset default).
    Od100Hz = 0b011,
    /// 200 Hz output data rate.
    Od200Hz = 0b100,
    /// 400 Hz output data rate.
    Od400Hz = 0b101,
}

impl OutputDataRate {
    /// Returns the ODR in millihertz, which keeps 12.5 Hz integral.
    pub const fn millihertz(self) -> u32 {
        match self {
            Self::Od12_5Hz => 12_500,
            Self::Od25Hz => 25_000,
            Self::Od50Hz => 50_000,
            Self::Od100Hz => 100_000,
            Self::Od200Hz => 200_000,
            Self::Od400Hz => 400_000,
        }
    }

    /// Decodes the raw `FILTER_CTL[2:0]` bits. Patterns `101` to `111` all
    /// select 400 Hz.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b000 => Self::Od12_5Hz,
            0b001 => Self::Od25Hz,
            0b010 => Self::Od50Hz,
            0b011 => Self::Od100Hz,
            0b100 => Self::Od200Hz,
            _ => Self::Od400Hz,
        }
    }
}

/// Measurement range selections encoded in `FILTER_CTL[7:6]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Range {
    /// ±2 g (reset default).
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
}

impl Range {
    /// Returns the nominal scale factor of the 12-bit output in milli-g per LSB.
    pub const fn mg_per_lsb(self) -> i32 {
        match self {
            Self::G2 => 1,
            Self::G4 => 2,
            Self::G8 => 4,
        }
    }

    /// Decodes the raw `FILTER_CTL[7:6]` bits. Both `10` and `11` select ±8 g.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::G2,
            0b01 => Self::G4,
            _ => Self::G8,
        }
    }
}

/// Operating power modes encoded in `POWER_CTL[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum PowerMode {
    /// Standby mode (reset default).
    Standby = 0b00,
    /// Full measurement mode.
    Measure = 0b10,
}

/// Noise/power trade-off encoded in `POWER_CTL[5:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum LowNoise {
    /// Normal operation (reset default).
    Normal = 0b00,
    /// Low-noise mode.
    LowNoise = 0b01,
    /// Ultralow-noise mode.
    UltraLowNoise = 0b10,
}

/// Link/loop interaction modes encoded in `ACT_INACT_CTL[5:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum LinkLoopMode {
    /// Default (unlinked) mode.
    Default = 0b00,
    /// Linked activity/inactivity detectors.
    Linked = 0b01,
    /// Loop mode: linked detectors acknowledge themselves.
    Loop = 0b11,
}

/// FIFO operating modes encoded in `FIFO_CONTROL[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum FifoMode {
    /// FIFO disabled.
    Disabled = 0b00,
    /// Oldest-saved mode.
    OldestSaved = 0b01,
    /// Streaming mode (circular buffer).
    Stream = 0b10,
    /// Triggered mode.
    Triggered = 0b11,
}

/// Logical data channel of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// Maps a raw channel selector (`0` = X, `1` = Y, `2` = Z) to an axis.
    pub const fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }
}
