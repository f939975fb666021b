//! `#![no_std]` driver for the Analog Devices ADXL362 accelerometer.
//!
//! The sensor is reached either through a hardware SPI peripheral
//! ([`interface::spi::SpiInterface`]) or through four GPIO lines driven by the
//! bit-banged transfer engine ([`interface::bitbang::BitBangInterface`]).
//!
//! ```no_run
//! # fn demo<SPI: embedded_hal::spi::SpiDevice, D: embedded_hal::delay::DelayNs>(spi: SPI, mut delay: D) {
//! use adxl362::params::{PowerMode, Range};
//! use adxl362::{Adxl362, Config};
//!
//! let config = Config::new()
//!     .range(Range::G4)
//!     .power_mode(PowerMode::Measure)
//!     .build();
//! let mut accel = Adxl362::new_spi(spi, config);
//! accel.init(&mut delay).ok();
//! let _ = accel.read_xyz_mg();
//! # }
//! ```
#![no_std]

mod error;
#[macro_use]
mod log;

pub mod config;
pub mod device;
pub mod fifo;
pub mod interface;
pub mod params;
pub mod registers;

pub use crate::config::Config;
pub use crate::device::Adxl362;
pub use crate::error::{Error, Result};
