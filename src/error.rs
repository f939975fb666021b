//! Error handling primitives for the ADXL362 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The provided configuration parameters are invalid, or the device holds
    /// a reserved encoding the driver cannot represent.
    InvalidConfig,
    /// A raw field value does not fit inside the width of its field.
    FieldOverflow,
    /// The identification registers do not describe an ADXL362.
    DeviceIdMismatch,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
