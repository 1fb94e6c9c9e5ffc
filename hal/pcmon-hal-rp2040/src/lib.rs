//! RP2040-specific HAL for the telemetry display firmware
//!
//! This crate provides RP2040-specific implementations of the shared
//! `pcmon-hal` traits:
//!
//! - Non-blocking buffered UART for the host link
//! - Blocking I2C master for the LCD backpack

#![no_std]

pub mod i2c;
pub mod uart;

pub use i2c::BlockingI2c;
pub use uart::BufferedSerial;

// Re-export shared traits from pcmon-hal for convenience
pub use pcmon_hal::{I2cBus, UartConfig, UartRx, UartTx};
