//! I2C bus abstractions
//!
//! The LCD backpack is write-only, so only the write half of an I2C master
//! is modelled.

/// I2C bus master
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}

/// Common I2C error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cError {
    /// Device did not acknowledge its address
    NoAcknowledge,
    /// Arbitration lost on a multi-master bus
    ArbitrationLoss,
    /// Bus error (misplaced START/STOP)
    Bus,
    /// Other error
    Other,
}
