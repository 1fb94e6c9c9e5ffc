//! Board-agnostic core logic for the telemetry display firmware
//!
//! This crate contains everything that does not depend on a specific board:
//!
//! - Last-known telemetry record and link state
//! - Line decoder applying parsed readings per display variant
//! - Render cadence timer
//! - The cooperative poll step driven by the firmware main loop
//! - Configuration types and the embedded config parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod decoder;
pub mod link;
pub mod monitor;
pub mod telemetry;
pub mod timer;
pub mod variant;

pub use config::{parse_config, ConfigError, ConfigErrorKind, MonitorConfig};
pub use decoder::{Decoder, LineEvent};
pub use link::{ConnectionState, LINK_TIMEOUT_MS};
pub use monitor::{Monitor, PollReport, TelemetryView};
pub use telemetry::TelemetrySample;
pub use timer::RefreshTimer;
pub use variant::Variant;
