//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the display traits
//! defined in pcmon-display on top of the bus traits from pcmon-hal:
//!
//! - Character LCDs (HD44780 behind a PCF8574 I2C backpack)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod lcd;
