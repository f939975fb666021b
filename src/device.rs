//! High-level ADXL362 device driver implementation.

use crate::config::{ActivityConfig, Config, InactivityConfig, TransferConfig};
use crate::error::{Error, Result};
use crate::fifo::{self, FifoSample, FifoSettings, BYTES_PER_ENTRY};
use crate::interface::bitbang::{BitBangInterface, BusError, BusPort};
use crate::interface::spi::SpiInterface;
use crate::interface::Adxl362Interface;
use crate::params::{Axis, FifoMode, LinkLoopMode, LowNoise, OutputDataRate, PowerMode, Range};
use crate::registers::{
    fifo_entry_count,
    ActInactControl,
    FifoControl,
    Field,
    InterruptMap,
    PowerControl,
    Status,
    EXPECTED_DEVID_AD,
    EXPECTED_DEVID_MST,
    EXPECTED_PART_ID,
    FIFO_WATERMARK_MAX,
    REG_ACT_INACT_CTL,
    REG_DEVID_AD,
    REG_FIFO_CONTROL,
    REG_FIFO_ENTRIES_L,
    REG_FIFO_SAMPLES,
    REG_FILTER_CTL,
    REG_INTMAP1,
    REG_INTMAP2,
    REG_POWER_CTL,
    REG_SOFT_RESET,
    REG_STATUS,
    REG_TEMP_L,
    REG_THRESH_ACT_L,
    REG_THRESH_INACT_L,
    REG_TIME_ACT,
    REG_TIME_INACT_L,
    REG_XDATA,
    REG_XDATA_L,
    REG_YDATA,
    REG_YDATA_L,
    REG_ZDATA,
    REG_ZDATA_L,
    RESET_COMMAND,
    THRESHOLD_MAX,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

// ADXL362 datasheet latency after a soft reset (microseconds).
const SOFT_RESET_DELAY_US: u32 = 500;
// Number of consecutive bytes spanning X, Y, Z 12-bit samples.
const RAW_AXIS_BYTES: usize = 6;
// FIFO entries fetched per framed burst by `read_fifo_samples`.
const FIFO_CHUNK_ENTRIES: usize = 32;

/// High-level synchronous driver for the ADXL362 accelerometer.
///
/// Every method takes `&mut self`, so at most one framed exchange can be in
/// flight. Sharing the bus with an interrupt handler requires moving the
/// driver behind a critical-section mutex owned by the application.
pub struct Adxl362<IFACE> {
    interface: IFACE,
    config: Config,
}

/// Decoded view of the `STATUS` register with explicit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// STATUS[7] ERR_USER_REGS.
    pub err_user_regs: bool,
    /// STATUS[6] AWAKE.
    pub awake: bool,
    /// STATUS[5] INACT.
    pub inact: bool,
    /// STATUS[4] ACT.
    pub act: bool,
    /// STATUS[3] FIFO_OVERRUN.
    pub fifo_overrun: bool,
    /// STATUS[2] FIFO_WATERMARK.
    pub fifo_watermark: bool,
    /// STATUS[1] FIFO_READY.
    pub fifo_ready: bool,
    /// STATUS[0] DATA_READY.
    pub data_ready: bool,
}

impl From<Status> for StatusSnapshot {
    fn from(status: Status) -> Self {
        Self {
            err_user_regs: status.err_user_regs(),
            awake: status.awake(),
            inact: status.inactivity(),
            act: status.activity(),
            fifo_overrun: status.fifo_overrun(),
            fifo_watermark: status.fifo_watermark(),
            fifo_ready: status.fifo_ready(),
            data_ready: status.data_ready(),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "StatusSnapshot {{\n    ERR_USER_REGS: {},\n    AWAKE: {},\n    INACT: {},\n    ACT: {},\n    FIFO_OVERRUN: {},\n    FIFO_WATERMARK: {},\n    FIFO_READY: {},\n    DATA_READY: {}\n}}",
            self.err_user_regs,
            self.awake,
            self.inact,
            self.act,
            self.fifo_overrun,
            self.fifo_watermark,
            self.fifo_ready,
            self.data_ready
        );
    }
}

/// Configuration decoded back from the device registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// `FILTER_CTL.RANGE`.
    pub range: Range,
    /// `FILTER_CTL.ODR`.
    pub odr: OutputDataRate,
    /// `POWER_CTL.MEASURE`.
    pub power_mode: PowerMode,
    /// `POWER_CTL.LOW_NOISE`.
    pub low_noise: LowNoise,
    /// `POWER_CTL.AUTOSLEEP`.
    pub autosleep: bool,
    /// `POWER_CTL.WAKEUP`.
    pub wakeup: bool,
    /// `ACT_INACT_CTL.LINKLOOP`.
    pub link_loop: LinkLoopMode,
    /// `ACT_INACT_CTL.ACT_EN`.
    pub activity_enabled: bool,
    /// `ACT_INACT_CTL.INACT_EN`.
    pub inactivity_enabled: bool,
}

impl<IFACE> Adxl362<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self { interface, config }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }
}

impl<SPI> Adxl362<SpiInterface<SPI>>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == Transport Convenience Constructors ============================
    // ==================================================================
    /// Convenience constructor for hardware SPI transports.
    pub fn new_spi(spi: SPI, config: Config) -> Self {
        Self::new(SpiInterface::new(spi), config)
    }

    /// Releases the driver, returning the SPI device and configuration.
    pub fn release_spi(self) -> (SPI, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<P> Adxl362<BitBangInterface<P>>
where
    P: BusPort,
{
    /// Convenience constructor for bit-banged transports.
    ///
    /// Drives the bus idle before returning.
    pub fn new_bitbang(
        port: P,
        transfer: TransferConfig,
        config: Config,
    ) -> Result<Self, BusError<P::Error>> {
        transfer.validate().map_err(|_| Error::InvalidConfig)?;
        let interface = BitBangInterface::new(port, transfer)?;
        Ok(Self::new(interface, config))
    }

    /// Releases the driver, returning the port and configuration.
    pub fn release_bitbang(self) -> (P, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Adxl362<IFACE>
where
    IFACE: Adxl362Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Global Configuration ==========================
    // ==================================================================
    /// Resets the sensor and applies the current configuration.
    ///
    /// Waits out the soft-reset latency so callers do not need their own
    /// delay between reset and the first configuration write.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), CommE> {
        let config = self.config;
        config.validate().map_err(|_| Error::InvalidConfig)?;

        self.reset()?;
        delay.delay_us(SOFT_RESET_DELAY_US);
        self.configure(config)?;
        Ok(())
    }

    /// Applies a new configuration to the device.
    ///
    /// Filter, detection and noise settings are programmed first; the power
    /// mode goes last so measurement only starts on a configured device.
    /// A detector left unset in `config` is disabled on the device.
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        config.validate().map_err(|_| Error::InvalidConfig)?;
        debug!("applying configuration");

        self.set_range(config.range)?;
        self.set_odr(config.odr)?;
        self.set_link_loop(config.link_loop)?;
        match config.activity {
            Some(ActivityConfig { threshold, time }) => self.configure_activity(threshold, time)?,
            None => self.write_field(Field::ACT_EN, 0)?,
        }
        match config.inactivity {
            Some(InactivityConfig { threshold, time }) => {
                self.configure_inactivity(threshold, time)?
            }
            None => self.write_field(Field::INACT_EN, 0)?,
        }
        self.set_low_noise(config.low_noise)?;
        self.set_power_mode(config.power_mode)?;

        self.config = config;
        Ok(())
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Issues a soft reset. The device returns to standby with reset defaults.
    pub fn reset(&mut self) -> Result<(), CommE> {
        debug!("soft reset");
        self.interface.write_register(REG_SOFT_RESET, RESET_COMMAND)?;
        self.config = Config::default();
        Ok(())
    }

    // ==================================================================
    // == Raw Register Access ===========================================
    // ==================================================================
    /// Writes one register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        self.interface
            .write_register(register, value)
            .map_err(Error::from)
    }

    /// Writes a 16-bit register pair, low byte first.
    pub fn write_register16(&mut self, register: u8, value: u16) -> Result<(), CommE> {
        self.interface
            .write_register16(register, value)
            .map_err(Error::from)
    }

    /// Reads one register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        self.interface.read_register(register).map_err(Error::from)
    }

    /// Reads a 16-bit register pair, low byte first.
    pub fn read_register16(&mut self, register: u8) -> Result<u16, CommE> {
        self.interface
            .read_register16(register)
            .map_err(Error::from)
    }

    /// Streams exactly `buf.len()` raw bytes out of the FIFO in one frame.
    ///
    /// The device does not report how many bytes are valid; query
    /// [`fifo_entries`](Self::fifo_entries) first.
    pub fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), CommE> {
        self.interface.read_fifo(buf).map_err(Error::from)
    }

    /// Read-modify-write of a single bit-field.
    ///
    /// Fails with [`Error::FieldOverflow`] before touching the bus when `value`
    /// is wider than the field. Bits outside the field are preserved. When the
    /// register already holds `value` only the read frame is issued.
    pub fn write_field(&mut self, field: Field, value: u8) -> Result<(), CommE> {
        if value > field.max_value() {
            return Err(Error::FieldOverflow);
        }

        let current = self.interface.read_register(field.register)?;
        let updated = field.insert(current, value).ok_or(Error::FieldOverflow)?;
        if updated != current {
            debug!(
                "reg {=u8:#x}: {=u8:#x} -> {=u8:#x}",
                field.register,
                current,
                updated
            );
            self.interface.write_register(field.register, updated)?;
        }
        Ok(())
    }

    /// Reads the current raw value of a bit-field.
    pub fn read_field(&mut self, field: Field) -> Result<u8, CommE> {
        let current = self.interface.read_register(field.register)?;
        Ok(field.extract(current))
    }

    // ==================================================================
    // == Identification & Status =======================================
    // ==================================================================
    /// Verifies identification registers and returns the silicon revision.
    pub fn check_ids(&mut self) -> Result<u8, CommE> {
        let mut ids = [0u8; 4];
        self.interface.read_many(REG_DEVID_AD, &mut ids)?;

        if ids[0] != EXPECTED_DEVID_AD || ids[1] != EXPECTED_DEVID_MST || ids[2] != EXPECTED_PART_ID
        {
            warn!(
                "unexpected device ids {=u8:#x} {=u8:#x} {=u8:#x}",
                ids[0],
                ids[1],
                ids[2]
            );
            return Err(Error::DeviceIdMismatch);
        }

        Ok(ids[3])
    }

    /// Returns a snapshot of the `STATUS` register.
    pub fn read_status(&mut self) -> Result<StatusSnapshot, CommE> {
        let raw = self.interface.read_register(REG_STATUS)?;
        Ok(StatusSnapshot::from(Status::from(raw)))
    }

    /// Decodes filter, power and activity control registers.
    ///
    /// ODR and range aliases decode to the setting the device applies for
    /// them. Reserved power or noise modes are reported as
    /// [`Error::InvalidConfig`].
    pub fn read_settings(&mut self) -> Result<Settings, CommE> {
        let filter = self.interface.read_register(REG_FILTER_CTL)?;
        let power = PowerControl::from(self.interface.read_register(REG_POWER_CTL)?);
        let act_inact = ActInactControl::from(self.interface.read_register(REG_ACT_INACT_CTL)?);

        let link_loop = match act_inact.link_loop() {
            0b01 => LinkLoopMode::Linked,
            0b11 => LinkLoopMode::Loop,
            _ => LinkLoopMode::Default,
        };

        Ok(Settings {
            range: Range::from_bits(Field::RANGE.extract(filter)),
            odr: OutputDataRate::from_bits(Field::ODR.extract(filter)),
            power_mode: power.mode_or_err().map_err(|_| Error::InvalidConfig)?,
            low_noise: power.low_noise_or_err().map_err(|_| Error::InvalidConfig)?,
            autosleep: power.autosleep(),
            wakeup: power.wakeup(),
            link_loop,
            activity_enabled: act_inact.act_en(),
            inactivity_enabled: act_inact.inact_en(),
        })
    }

    // ==================================================================
    // == Power & Measurement Configuration =============================
    // ==================================================================
    /// Selects standby or measurement mode.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), CommE> {
        self.write_field(Field::POWER_MODE, mode as u8)?;
        self.config.power_mode = mode;
        Ok(())
    }

    /// Selects the output data rate.
    pub fn set_odr(&mut self, odr: OutputDataRate) -> Result<(), CommE> {
        self.write_field(Field::ODR, odr as u8)?;
        self.config.odr = odr;
        Ok(())
    }

    /// Selects the measurement range.
    pub fn set_range(&mut self, range: Range) -> Result<(), CommE> {
        self.write_field(Field::RANGE, range as u8)?;
        self.config.range = range;
        Ok(())
    }

    /// Selects the noise/power trade-off.
    pub fn set_low_noise(&mut self, low_noise: LowNoise) -> Result<(), CommE> {
        self.write_field(Field::LOW_NOISE, low_noise as u8)?;
        self.config.low_noise = low_noise;
        Ok(())
    }

    /// Enables or disables autosleep (requires linked or loop mode).
    pub fn set_autosleep(&mut self, enabled: bool) -> Result<(), CommE> {
        self.write_field(Field::AUTOSLEEP, enabled as u8)
    }

    /// Enables or disables wake-up mode.
    pub fn set_wakeup(&mut self, enabled: bool) -> Result<(), CommE> {
        self.write_field(Field::WAKEUP, enabled as u8)
    }

    /// Selects how activity and inactivity detection interact.
    pub fn set_link_loop(&mut self, mode: LinkLoopMode) -> Result<(), CommE> {
        self.write_field(Field::LINK_LOOP, mode as u8)?;
        self.config.link_loop = mode;
        Ok(())
    }

    // ==================================================================
    // == Activity, Inactivity & Interrupts ==============================
    // ==================================================================
    /// Programs the activity threshold and time, then enables referenced
    /// activity detection.
    ///
    /// The enable bits are OR-ed in so an already enabled inactivity detector
    /// stays enabled.
    pub fn configure_activity(&mut self, threshold: u16, time: u8) -> Result<(), CommE> {
        if threshold > THRESHOLD_MAX {
            return Err(Error::InvalidConfig);
        }

        self.interface.write_register16(REG_THRESH_ACT_L, threshold)?;
        self.interface.write_register(REG_TIME_ACT, time)?;
        self.enable_detection(ActInactControl::new().with_act_en(true).with_act_ref(true))?;
        self.config.activity = Some(ActivityConfig { threshold, time });
        Ok(())
    }

    /// Programs the inactivity threshold and time, then enables referenced
    /// inactivity detection.
    pub fn configure_inactivity(&mut self, threshold: u16, time: u16) -> Result<(), CommE> {
        if threshold > THRESHOLD_MAX {
            return Err(Error::InvalidConfig);
        }

        self.interface.write_register16(REG_THRESH_INACT_L, threshold)?;
        self.interface.write_register16(REG_TIME_INACT_L, time)?;
        self.enable_detection(ActInactControl::new().with_inact_en(true).with_inact_ref(true))?;
        self.config.inactivity = Some(InactivityConfig { threshold, time });
        Ok(())
    }

    /// Routes status sources to the INT1 pin.
    pub fn map_int1(&mut self, map: InterruptMap) -> Result<(), CommE> {
        self.write_register(REG_INTMAP1, u8::from(map))
    }

    /// Routes status sources to the INT2 pin.
    pub fn map_int2(&mut self, map: InterruptMap) -> Result<(), CommE> {
        self.write_register(REG_INTMAP2, u8::from(map))
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads one axis at full 12-bit resolution.
    pub fn read_axis(&mut self, axis: Axis) -> Result<i16, CommE> {
        let register = match axis {
            Axis::X => REG_XDATA_L,
            Axis::Y => REG_YDATA_L,
            Axis::Z => REG_ZDATA_L,
        };
        // The device sign-extends to 16 bits, so the raw pattern is already
        // the two's-complement value.
        Ok(self.interface.read_register16(register)? as i16)
    }

    /// Reads one axis from the 8-bit reduced-resolution registers.
    pub fn read_axis_short(&mut self, axis: Axis) -> Result<i8, CommE> {
        let register = match axis {
            Axis::X => REG_XDATA,
            Axis::Y => REG_YDATA,
            Axis::Z => REG_ZDATA,
        };
        Ok(self.interface.read_register(register)? as i8)
    }

    /// Reads one axis selected by a raw index (`0` = X, `1` = Y, `2` = Z).
    ///
    /// Unknown selectors fall back to the Z axis instead of failing.
    pub fn read_axis_by_selector(&mut self, selector: u8) -> Result<i16, CommE> {
        let axis = Axis::from_selector(selector).unwrap_or_else(|| {
            warn!("unknown axis selector {=u8}, reading Z", selector);
            Axis::Z
        });
        self.read_axis(axis)
    }

    /// Reads one 8-bit axis selected by a raw index.
    ///
    /// Unknown selectors fall back to the X axis instead of failing.
    pub fn read_axis_short_by_selector(&mut self, selector: u8) -> Result<i8, CommE> {
        let axis = Axis::from_selector(selector).unwrap_or_else(|| {
            warn!("unknown axis selector {=u8}, reading X", selector);
            Axis::X
        });
        self.read_axis_short(axis)
    }

    /// Reads X, Y and Z at full resolution in one burst.
    pub fn read_all_axes(&mut self) -> Result<[i16; 3], CommE> {
        let mut raw = [0u8; RAW_AXIS_BYTES];
        self.interface.read_many(REG_XDATA_L, &mut raw)?;

        Ok([
            i16::from_le_bytes([raw[0], raw[1]]),
            i16::from_le_bytes([raw[2], raw[3]]),
            i16::from_le_bytes([raw[4], raw[5]]),
        ])
    }

    /// Reads X, Y and Z from the 8-bit registers in one burst.
    pub fn read_all_axes_short(&mut self) -> Result<[i8; 3], CommE> {
        let mut raw = [0u8; 3];
        self.interface.read_many(REG_XDATA, &mut raw)?;
        Ok(raw.map(|byte| byte as i8))
    }

    /// Returns acceleration scaled to milli-g.
    ///
    /// Scales by the range last programmed through this driver
    /// ([`init`](Self::init), [`configure`](Self::configure) or
    /// [`set_range`](Self::set_range)). Before any of those run, the
    /// requested range may not match the device.
    pub fn read_xyz_mg(&mut self) -> Result<[i32; 3], CommE> {
        let scale = self.config.range.mg_per_lsb();
        let raw = self.read_all_axes()?;
        Ok(raw.map(|value| i32::from(value) * scale))
    }

    /// Reads the raw 12-bit temperature sample.
    pub fn read_temp(&mut self) -> Result<i16, CommE> {
        Ok(self.interface.read_register16(REG_TEMP_L)? as i16)
    }

    // ==================================================================
    // == FIFO ==========================================================
    // ==================================================================
    /// Programs FIFO mode, watermark and temperature storage.
    pub fn configure_fifo(
        &mut self,
        mode: FifoMode,
        watermark: u16,
        store_temp: bool,
    ) -> Result<(), CommE> {
        if watermark > FIFO_WATERMARK_MAX {
            return Err(Error::InvalidConfig);
        }

        self.write_field(Field::FIFO_MODE, mode as u8)?;
        self.write_field(Field::FIFO_TEMP, store_temp as u8)?;
        self.write_field(Field::FIFO_AH, (watermark >> 8) as u8)?;
        self.interface
            .write_register(REG_FIFO_SAMPLES, (watermark & 0xFF) as u8)?;
        Ok(())
    }

    /// Snapshot of FIFO configuration registers.
    pub fn fifo_settings(&mut self) -> Result<FifoSettings, CommE> {
        let mut raw = [0u8; 2];
        self.interface.read_many(REG_FIFO_CONTROL, &mut raw)?;

        let control = FifoControl::from(raw[0]);
        let watermark = (u16::from(control.above_half()) << 8) | u16::from(raw[1]);
        Ok(FifoSettings::new(watermark, control.mode(), control.store_temp()))
    }

    /// Returns the number of valid entries currently buffered in the FIFO.
    pub fn fifo_entries(&mut self) -> Result<u16, CommE> {
        let raw = self.interface.read_register16(REG_FIFO_ENTRIES_L)?;
        Ok(fifo_entry_count(raw))
    }

    /// Reads and decodes `samples.len()` FIFO entries.
    ///
    /// Entries are fetched in bursts; returns the number of samples decoded.
    pub fn read_fifo_samples(&mut self, samples: &mut [FifoSample]) -> Result<usize, CommE> {
        let mut raw = [0u8; FIFO_CHUNK_ENTRIES * BYTES_PER_ENTRY];
        let mut count = 0;

        for chunk in samples.chunks_mut(FIFO_CHUNK_ENTRIES) {
            let bytes = &mut raw[..chunk.len() * BYTES_PER_ENTRY];
            self.interface.read_fifo(bytes)?;
            count += fifo::decode_samples(bytes, chunk);
        }

        Ok(count)
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn enable_detection(&mut self, enable: ActInactControl) -> Result<(), CommE> {
        let current = self.interface.read_register(REG_ACT_INACT_CTL)?;
        let updated = current | u8::from(enable);
        if updated != current {
            self.interface.write_register(REG_ACT_INACT_CTL, updated)?;
        }
        Ok(())
    }
}
