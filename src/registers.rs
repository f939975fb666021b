//! Register map definitions for the ADXL362 accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{FifoMode, LowNoise, OutputDataRate, PowerMode, Range};

/// Register address of `DEVID_AD`.
pub const REG_DEVID_AD: u8 = 0x00;
/// Register address of `DEVID_MST`.
pub const REG_DEVID_MST: u8 = 0x01;
/// Register address of `PARTID`.
pub const REG_PARTID: u8 = 0x02;
/// Register address of `REVID`.
pub const REG_REVID: u8 = 0x03;
/// Register address of `XDATA` (8-bit, reduced resolution).
pub const REG_XDATA: u8 = 0x08;
/// Register address of `YDATA` (8-bit, reduced resolution).
pub const REG_YDATA: u8 = 0x09;
/// Register address of `ZDATA` (8-bit, reduced resolution).
pub const REG_ZDATA: u8 = 0x0A;
/// Register address of `STATUS`.
pub const REG_STATUS: u8 = 0x0B;
/// Register address of `FIFO_ENTRIES_L`.
pub const REG_FIFO_ENTRIES_L: u8 = 0x0C;
/// Register address of `FIFO_ENTRIES_H`.
pub const REG_FIFO_ENTRIES_H: u8 = 0x0D;
/// Register address of `XDATA_L`.
pub const REG_XDATA_L: u8 = 0x0E;
/// Register address of `XDATA_H`.
pub const REG_XDATA_H: u8 = 0x0F;
/// Register address of `YDATA_L`.
pub const REG_YDATA_L: u8 = 0x10;
/// Register address of `YDATA_H`.
pub const REG_YDATA_H: u8 = 0x11;
/// Register address of `ZDATA_L`.
pub const REG_ZDATA_L: u8 = 0x12;
/// Register address of `ZDATA_H`.
pub const REG_ZDATA_H: u8 = 0x13;
/// Register address of `TEMP_L`.
pub const REG_TEMP_L: u8 = 0x14;
/// Register address of `TEMP_H`.
pub const REG_TEMP_H: u8 = 0x15;
/// Register address of `SOFT_RESET`.
pub const REG_SOFT_RESET: u8 = 0x1F;
/// Register address of `THRESH_ACT_L`.
pub const REG_THRESH_ACT_L: u8 = 0x20;
/// Register address of `THRESH_ACT_H`.
pub const REG_THRESH_ACT_H: u8 = 0x21;
/// Register address of `TIME_ACT`.
pub const REG_TIME_ACT: u8 = 0x22;
/// Register address of `THRESH_INACT_L`.
pub const REG_THRESH_INACT_L: u8 = 0x23;
/// Register address of `THRESH_INACT_H`.
pub const REG_THRESH_INACT_H: u8 = 0x24;
/// Register address of `TIME_INACT_L`.
pub const REG_TIME_INACT_L: u8 = 0x25;
/// Register address of `TIME_INACT_H`.
pub const REG_TIME_INACT_H: u8 = 0x26;
/// Register address of `ACT_INACT_CTL`.
pub const REG_ACT_INACT_CTL: u8 = 0x27;
/// Register address of `FIFO_CONTROL`.
pub const REG_FIFO_CONTROL: u8 = 0x28;
/// Register address of `FIFO_SAMPLES`.
pub const REG_FIFO_SAMPLES: u8 = 0x29;
/// Register address of `INTMAP1`.
pub const REG_INTMAP1: u8 = 0x2A;
/// Register address of `INTMAP2`.
pub const REG_INTMAP2: u8 = 0x2B;
/// Register address of `FILTER_CTL`.
pub const REG_FILTER_CTL: u8 = 0x2C;
/// Register address of `POWER_CTL`.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Register address of `SELF_TEST`.
pub const REG_SELF_TEST: u8 = 0x2E;

/// Expected content of `DEVID_AD`.
pub const EXPECTED_DEVID_AD: u8 = 0xAD;
/// Expected content of `DEVID_MST`.
pub const EXPECTED_DEVID_MST: u8 = 0x1D;
/// Expected content of `PARTID`.
pub const EXPECTED_PART_ID: u8 = 0xF2;

/// Soft reset command value written to the `SOFT_RESET` register (ASCII `'R'`).
pub const RESET_COMMAND: u8 = 0x52;

/// Largest value accepted by the 11-bit activity/inactivity threshold registers.
pub const THRESHOLD_MAX: u16 = 0x07FF;
/// Largest FIFO watermark expressible by `FIFO_SAMPLES` plus `FIFO_CONTROL.AH`.
pub const FIFO_WATERMARK_MAX: u16 = 0x01FF;

/// Position of a bit-field inside a single 8-bit control register.
///
/// All read-modify-write programming goes through these descriptors so that a
/// field write can only ever touch the bits covered by [`Field::mask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    /// Address of the register holding the field.
    pub register: u8,
    /// Bit position of the field's least significant bit.
    pub offset: u8,
    /// Field width in bits.
    pub width: u8,
}

impl Field {
    /// `POWER_CTL.MEASURE`, bits 1:0.
    pub const POWER_MODE: Self = Self::new(REG_POWER_CTL, 0, 2);
    /// `POWER_CTL.AUTOSLEEP`, bit 2.
    pub const AUTOSLEEP: Self = Self::new(REG_POWER_CTL, 2, 1);
    /// `POWER_CTL.WAKEUP`, bit 3.
    pub const WAKEUP: Self = Self::new(REG_POWER_CTL, 3, 1);
    /// `POWER_CTL.LOW_NOISE`, bits 5:4.
    pub const LOW_NOISE: Self = Self::new(REG_POWER_CTL, 4, 2);
    /// `FILTER_CTL.ODR`, bits 2:0.
    pub const ODR: Self = Self::new(REG_FILTER_CTL, 0, 3);
    /// `FILTER_CTL.RANGE`, bits 7:6.
    pub const RANGE: Self = Self::new(REG_FILTER_CTL, 6, 2);
    /// `ACT_INACT_CTL.ACT_EN`, bit 0.
    pub const ACT_EN: Self = Self::new(REG_ACT_INACT_CTL, 0, 1);
    /// `ACT_INACT_CTL.INACT_EN`, bit 2.
    pub const INACT_EN: Self = Self::new(REG_ACT_INACT_CTL, 2, 1);
    /// `ACT_INACT_CTL.LINKLOOP`, bits 5:4.
    pub const LINK_LOOP: Self = Self::new(REG_ACT_INACT_CTL, 4, 2);
    /// `FIFO_CONTROL.FIFO_MODE`, bits 1:0.
    pub const FIFO_MODE: Self = Self::new(REG_FIFO_CONTROL, 0, 2);
    /// `FIFO_CONTROL.FIFO_TEMP`, bit 2.
    pub const FIFO_TEMP: Self = Self::new(REG_FIFO_CONTROL, 2, 1);
    /// `FIFO_CONTROL.AH`, bit 3 (watermark bit 8).
    pub const FIFO_AH: Self = Self::new(REG_FIFO_CONTROL, 3, 1);

    /// Creates a descriptor for `width` bits starting at `offset` in `register`.
    pub const fn new(register: u8, offset: u8, width: u8) -> Self {
        Self {
            register,
            offset,
            width,
        }
    }

    /// Returns the in-register mask covered by this field.
    pub const fn mask(self) -> u8 {
        (((1u16 << self.width) - 1) << self.offset) as u8
    }

    /// Largest raw value that fits in the field.
    pub const fn max_value(self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Extracts the raw field value from a register byte.
    pub const fn extract(self, register_value: u8) -> u8 {
        (register_value & self.mask()) >> self.offset
    }

    /// Replaces the field inside `current`, leaving every other bit untouched.
    ///
    /// Returns `None` when `value` is wider than the field.
    pub const fn insert(self, current: u8, value: u8) -> Option<u8> {
        if value > self.max_value() {
            return None;
        }
        Some((current & !self.mask()) | (value << self.offset))
    }
}

/// Bitfield representation of the `STATUS` register (address `0x0B`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // New sample available (bit 0).
    pub data_ready: bool,
    // At least one sample in the FIFO (bit 1).
    pub fifo_ready: bool,
    // FIFO watermark reached (bit 2).
    pub fifo_watermark: bool,
    // FIFO overrun (bit 3).
    pub fifo_overrun: bool,
    // Activity event detected (bit 4).
    pub activity: bool,
    // Inactivity event detected (bit 5).
    pub inactivity: bool,
    // Device is awake (bit 6).
    pub awake: bool,
    // User register checksum error detected (bit 7).
    pub err_user_regs: bool,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `ACT_INACT_CTL` register (address `0x27`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActInactControl {
    // Activity detection enable (bit 0).
    pub act_en: bool,
    // Activity referenced mode (bit 1).
    pub act_ref: bool,
    // Inactivity detection enable (bit 2).
    pub inact_en: bool,
    // Inactivity referenced mode (bit 3).
    pub inact_ref: bool,
    // Link/loop selection (bits 5:4), see `LinkLoopMode`.
    pub link_loop: B2,
    #[skip]
    __: B2,
}

impl From<u8> for ActInactControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<ActInactControl> for u8 {
    fn from(value: ActInactControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INTMAP1`/`INTMAP2` registers (`0x2A`/`0x2B`).
///
/// Selects which status sources drive an interrupt pin.
///
/// ```rust
/// use adxl362::registers::InterruptMap;
///
/// let map = InterruptMap::new().with_awake(true).with_int_low(true);
/// assert_eq!(u8::from(map), 0b1100_0000);
/// ```
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptMap {
    // Data ready (bit 0).
    pub data_ready: bool,
    // FIFO ready (bit 1).
    pub fifo_ready: bool,
    // FIFO watermark (bit 2).
    pub fifo_watermark: bool,
    // FIFO overrun (bit 3).
    pub fifo_overrun: bool,
    // Activity (bit 4).
    pub activity: bool,
    // Inactivity (bit 5).
    pub inactivity: bool,
    // Awake state (bit 6).
    pub awake: bool,
    // Active-low pin polarity (bit 7).
    pub int_low: bool,
}

impl From<u8> for InterruptMap {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<InterruptMap> for u8 {
    fn from(value: InterruptMap) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `FILTER_CTL` register (address `0x2C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterControl {
    // Output data rate (bits 2:0).
    pub odr: OutputDataRate,
    // External sampling trigger (bit 3).
    pub ext_sample: bool,
    // Halved anti-aliasing bandwidth (bit 4).
    pub half_bw: bool,
    #[skip]
    __: B1,
    // Measurement range (bits 7:6).
    pub range: Range,
}

impl From<u8> for FilterControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<FilterControl> for u8 {
    fn from(value: FilterControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `POWER_CTL` register (address `0x2D`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControl {
    // Measurement mode (bits 1:0).
    pub mode: PowerMode,
    // Autosleep (bit 2).
    pub autosleep: bool,
    // Wake-up mode (bit 3).
    pub wakeup: bool,
    // Noise mode (bits 5:4).
    pub low_noise: LowNoise,
    // External clock (bit 6).
    pub ext_clk: bool,
    #[skip]
    __: B1,
}

impl From<u8> for PowerControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerControl> for u8 {
    fn from(value: PowerControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `FIFO_CONTROL` register (address `0x28`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FifoControl {
    // FIFO mode (bits 1:0).
    pub mode: FifoMode,
    // Store temperature alongside axis data (bit 2).
    pub store_temp: bool,
    // Watermark bit 8 (bit 3).
    pub above_half: bool,
    #[skip]
    __: B4,
}

impl From<u8> for FifoControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<FifoControl> for u8 {
    fn from(value: FifoControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Combines the `FIFO_ENTRIES_L`/`_H` pair into the 10-bit entry count.
pub fn fifo_entry_count(raw: u16) -> u16 {
    raw & 0x03FF
}
