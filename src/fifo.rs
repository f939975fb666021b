//! FIFO decoding utilities.
//!
//! Every FIFO entry is a little-endian 16-bit word: bits 15:14 tag the
//! channel, bits 13:0 hold the sign-extended 12-bit sample.

use crate::params::FifoMode;

/// Number of bytes per FIFO entry.
pub const BYTES_PER_ENTRY: usize = 2;

/// Channel tag carried in the two top bits of a FIFO entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FifoChannel {
    /// X-axis sample.
    X,
    /// Y-axis sample.
    Y,
    /// Z-axis sample.
    Z,
    /// Temperature sample.
    Temperature,
}

/// A decoded FIFO entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoSample {
    /// Channel this entry belongs to.
    pub channel: FifoChannel,
    /// Signed 12-bit reading.
    pub value: i16,
}

impl FifoSample {
    /// Decodes one raw FIFO word.
    pub fn from_word(word: u16) -> Self {
        let channel = match word >> 14 {
            0b00 => FifoChannel::X,
            0b01 => FifoChannel::Y,
            0b10 => FifoChannel::Z,
            _ => FifoChannel::Temperature,
        };
        // Shift the tag out, then arithmetic-shift back to sign-extend bit 13.
        let value = ((word << 2) as i16) >> 2;
        Self { channel, value }
    }

    /// Decodes one entry from its two wire bytes, low byte first.
    pub fn from_le_bytes(bytes: [u8; BYTES_PER_ENTRY]) -> Self {
        Self::from_word(u16::from_le_bytes(bytes))
    }
}

impl Default for FifoSample {
    fn default() -> Self {
        Self {
            channel: FifoChannel::X,
            value: 0,
        }
    }
}

/// Snapshot of the FIFO control configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoSettings {
    /// FIFO watermark level expressed in entries.
    pub watermark: u16,
    /// FIFO operating mode.
    pub mode: FifoMode,
    /// Whether temperature entries are interleaved with axis data.
    pub store_temp: bool,
}

impl FifoSettings {
    /// Creates a new settings snapshot.
    pub const fn new(watermark: u16, mode: FifoMode, store_temp: bool) -> Self {
        Self {
            watermark,
            mode,
            store_temp,
        }
    }
}

/// Decodes as many whole entries from `raw` as fit into `samples`.
///
/// Returns the number of samples written.
pub fn decode_samples(raw: &[u8], samples: &mut [FifoSample]) -> usize {
    let mut count = 0;
    for (sample, chunk) in samples.iter_mut().zip(raw.chunks_exact(BYTES_PER_ENTRY)) {
        *sample = FifoSample::from_le_bytes([chunk[0], chunk[1]]);
        count += 1;
    }
    count
}
