//! Configuration primitives for the ADXL362 driver.

use crate::params::{LinkLoopMode, LowNoise, OutputDataRate, PowerMode, Range};
use crate::registers::THRESHOLD_MAX;

/// Default bound on completion polls per clock edge of the bit-banged bus.
pub const DEFAULT_POLL_LIMIT: u32 = 1_000;

/// Per-deployment settings of the bit-banged transfer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferConfig {
    /// How many times a clock edge is polled for completion before the
    /// transfer fails with a timeout.
    pub poll_limit: u32,
}

impl TransferConfig {
    /// Creates a transfer configuration with the given poll limit.
    pub const fn new(poll_limit: u32) -> Self {
        Self { poll_limit }
    }

    /// Checks whether the transfer configuration can ever complete an edge.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.poll_limit == 0 {
            return Err(ConfigError::ZeroPollLimit);
        }

        Ok(())
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_LIMIT)
    }
}

/// Activity detection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivityConfig {
    /// 11-bit unsigned threshold in LSB of the active range.
    pub threshold: u16,
    /// Number of consecutive samples above threshold (`TIME_ACT`).
    pub time: u8,
}

/// Inactivity detection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InactivityConfig {
    /// 11-bit unsigned threshold in LSB of the active range.
    pub threshold: u16,
    /// Number of consecutive samples below threshold (`TIME_INACT`).
    pub time: u16,
}

/// User-facing configuration for the ADXL362 sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Measurement range selection.
    pub range: Range,
    /// Output data rate selection.
    pub odr: OutputDataRate,
    /// Power mode entered once everything else is programmed.
    pub power_mode: PowerMode,
    /// Noise/power trade-off.
    pub low_noise: LowNoise,
    /// Link/loop activity detection mode.
    pub link_loop: LinkLoopMode,
    /// Activity detection, enabled when set.
    pub activity: Option<ActivityConfig>,
    /// Inactivity detection, enabled when set.
    pub inactivity: Option<InactivityConfig>,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration fits the device registers.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if let Some(activity) = self.activity {
            if activity.threshold > THRESHOLD_MAX {
                return Err(ConfigError::ThresholdOutOfRange);
            }
        }

        if let Some(inactivity) = self.inactivity {
            if inactivity.threshold > THRESHOLD_MAX {
                return Err(ConfigError::ThresholdOutOfRange);
            }
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the measurement range.
    pub fn range(mut self, range: Range) -> Self {
        self.config.range = range;
        self
    }

    /// Overrides the output data rate.
    pub fn odr(mut self, odr: OutputDataRate) -> Self {
        self.config.odr = odr;
        self
    }

    /// Selects the power mode applied at the end of configuration.
    pub fn power_mode(mut self, mode: PowerMode) -> Self {
        self.config.power_mode = mode;
        self
    }

    /// Selects the noise mode.
    pub fn low_noise(mut self, low_noise: LowNoise) -> Self {
        self.config.low_noise = low_noise;
        self
    }

    /// Selects the link/loop mode.
    pub fn link_loop(mut self, mode: LinkLoopMode) -> Self {
        self.config.link_loop = mode;
        self
    }

    /// Enables activity detection.
    pub fn activity(mut self, threshold: u16, time: u8) -> Self {
        self.config.activity = Some(ActivityConfig { threshold, time });
        self
    }

    /// Enables inactivity detection.
    pub fn inactivity(mut self, threshold: u16, time: u16) -> Self {
        self.config.inactivity = Some(InactivityConfig { threshold, time });
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    /// Mirrors the device state after a soft reset.
    fn default() -> Self {
        Self {
            range: Range::G2,
            odr: OutputDataRate::Od100Hz,
            power_mode: PowerMode::Standby,
            low_noise: LowNoise::Normal,
            link_loop: LinkLoopMode::Default,
            activity: None,
            inactivity: None,
        }
    }
}

/// Validation errors generated while verifying a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// An activity or inactivity threshold does not fit in 11 bits.
    ThresholdOutOfRange,
    /// The bit-banged bus would time out before polling a single edge.
    ZeroPollLimit,
}
