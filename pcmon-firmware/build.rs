//! Build script for pcmon-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates monitor.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pcmon_core::config::{ConfigErrorKind, MonitorConfig};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate monitor.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=monitor.toml");

    let config_path = Path::new("monitor.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: monitor.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a monitor.toml configuration file.          ║\n\
            ║  Please create one in the pcmon-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read monitor.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax, unknown keys and value types
    let config: MonitorConfig = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid monitor.toml                                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    // Value ranges, same checks the firmware applies at boot
    if let Err(kind) = config.validate() {
        let errors = range_errors(&config, kind);
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in monitor.toml                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    // The firmware's own reader must accept the file too
    if let Err(e) = pcmon_core::parse_config(&config_content) {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: monitor.toml uses syntax the firmware cannot read        ║\n\
            ║                                                                  ║\n\
            ║  Line {:<4} {:<53} ║\n\
            ║  Only [section], key = value and # comments are supported.       ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            e.line,
            format!("{:?}", e.kind)
        );
    }

    println!(
        "cargo:warning=monitor.toml validated successfully ({} variant, refresh {} ms)",
        config.variant.name(),
        config.refresh_ms()
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Spell out which values are out of range
fn range_errors(config: &MonitorConfig, kind: ConfigErrorKind) -> Vec<String> {
    let mut errors = Vec::new();

    if !(1200..=1_000_000).contains(&config.serial.baudrate) {
        errors.push("[serial] baudrate must be 1200-1000000".to_string());
    }
    if config.link.timeout_ms < 100 {
        errors.push("[link] timeout_ms must be at least 100".to_string());
    }
    if let Some(refresh) = config.display.refresh_ms {
        if !(50..=60_000).contains(&refresh) {
            errors.push("[display] refresh_ms must be 50-60000".to_string());
        }
    }
    if !(0x08..=0x77).contains(&config.display.i2c_address) {
        errors.push("[display] i2c_address must be 0x08-0x77".to_string());
    }
    if config.poll.delay_ms > 1000 {
        errors.push("[loop] delay_ms must be at most 1000".to_string());
    }

    if errors.is_empty() {
        errors.push(format!("{:?}", kind));
    }
    errors
}
