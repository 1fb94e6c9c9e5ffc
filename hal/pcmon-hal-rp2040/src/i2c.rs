//! Blocking I2C master for the LCD backpack

use embassy_rp::i2c::{self, Blocking, I2c, Instance};
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
use pcmon_hal::{I2cBus, I2cError};

/// I2C bus speed used for the backpack (standard mode)
pub const LCD_I2C_FREQUENCY: u32 = 100_000;

/// Peripheral config for the LCD bus
pub fn peripheral_config() -> i2c::Config {
    let mut cfg = i2c::Config::default();
    cfg.frequency = LCD_I2C_FREQUENCY;
    cfg
}

/// Classify an embedded-hal I2C error
pub fn classify<E: embedded_hal::i2c::Error>(e: &E) -> I2cError {
    match e.kind() {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => I2cError::NoAcknowledge,
        ErrorKind::ArbitrationLoss => I2cError::ArbitrationLoss,
        ErrorKind::Bus => I2cError::Bus,
        _ => I2cError::Other,
    }
}

/// Blocking RP2040 I2C master
pub struct BlockingI2c<'d, T: Instance> {
    bus: I2c<'d, T, Blocking>,
}

impl<'d, T: Instance> BlockingI2c<'d, T> {
    pub fn new(bus: I2c<'d, T, Blocking>) -> Self {
        Self { bus }
    }
}

impl<T: Instance> I2cBus for BlockingI2c<'_, T> {
    type Error = I2cError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cError> {
        embedded_hal::i2c::I2c::write(&mut self.bus, address, data).map_err(|e| classify(&e))
    }
}
