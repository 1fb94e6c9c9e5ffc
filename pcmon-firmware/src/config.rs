//! Configuration loading
//!
//! The config is compiled into the firmware from `monitor.toml`. build.rs
//! has already rejected a broken file, so a parse failure here means the
//! two readers disagree; the firmware keeps running on defaults.

use defmt::*;

use pcmon_core::{parse_config, MonitorConfig};

/// Embedded configuration (compiled into firmware)
/// Edit monitor.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../monitor.toml");

/// Parse the embedded config, falling back to defaults
pub fn load() -> MonitorConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: {} variant, {} baud, timeout {} ms, refresh {} ms",
                config.variant.name(),
                config.serial.baudrate,
                config.link.timeout_ms,
                config.refresh_ms()
            );
            config
        }
        Err(e) => {
            warn!(
                "monitor.toml line {}: {:?}, using defaults",
                e.line, e.kind
            );
            MonitorConfig::default()
        }
    }
}
