//! pcmon Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the telemetry firmware is written
//! against, so that the decoder loop and the LCD driver can be exercised on
//! the host with mock peripherals.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (pcmon-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  pcmon-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  pcmon-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRx`], [`uart::UartTx`] - Non-blocking serial communication
//! - [`i2c::I2cBus`] - I2C bus writes (LCD backpack)

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use i2c::{I2cBus, I2cError};
pub use uart::{UartConfig, UartError, UartRx, UartTx};
