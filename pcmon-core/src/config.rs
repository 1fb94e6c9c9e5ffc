//! Monitor configuration
//!
//! The firmware embeds a `monitor.toml` and parses it at boot with
//! [`parse_config`], a minimal TOML reader covering only what the config
//! needs. The build script validates the same file with the full `toml`
//! crate through the optional `serde` derives.
//!
//! Supported syntax:
//! - `[section]` headers
//! - `key = value` pairs (integer, hex integer, boolean, string)
//! - `#` comments, on their own line or after a value
//!
//! ```toml
//! variant = "extended"
//!
//! [serial]
//! baudrate = 115200
//!
//! [link]
//! timeout_ms = 5000
//!
//! [display]
//! refresh_ms = 1000
//! i2c_address = 0x27
//! backlight = true
//!
//! [loop]
//! delay_ms = 10
//! ```

use crate::link::LINK_TIMEOUT_MS;
use crate::variant::Variant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default PCF8574 backpack address
pub const DEFAULT_LCD_ADDRESS: u8 = 0x27;

/// Default delay between loop iterations
pub const DEFAULT_POLL_DELAY_MS: u32 = 10;

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}

/// Link timeout settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct LinkConfig {
    /// Silence after which the link is shown as lost
    pub timeout_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            timeout_ms: LINK_TIMEOUT_MS,
        }
    }
}

/// LCD settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DisplayConfig {
    /// Render interval, `None` for the variant default
    pub refresh_ms: Option<u32>,
    /// 7-bit I2C address of the LCD backpack
    pub i2c_address: u8,
    /// Backlight on at boot
    pub backlight: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_ms: None,
            i2c_address: DEFAULT_LCD_ADDRESS,
            backlight: true,
        }
    }
}

/// Main loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct PollConfig {
    /// Pause between loop iterations
    pub delay_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_POLL_DELAY_MS,
        }
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MonitorConfig {
    pub variant: Variant,
    pub serial: SerialConfig,
    pub link: LinkConfig,
    pub display: DisplayConfig,
    #[cfg_attr(feature = "serde", serde(rename = "loop"))]
    pub poll: PollConfig,
}

impl MonitorConfig {
    /// Defaults for a given variant
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Effective render interval
    pub fn refresh_ms(&self) -> u32 {
        self.display
            .refresh_ms
            .unwrap_or_else(|| self.variant.default_refresh_ms())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigErrorKind> {
        if !(1200..=1_000_000).contains(&self.serial.baudrate) {
            return Err(ConfigErrorKind::OutOfRange);
        }
        if self.link.timeout_ms < 100 {
            return Err(ConfigErrorKind::OutOfRange);
        }
        if let Some(refresh) = self.display.refresh_ms {
            if !(50..=60_000).contains(&refresh) {
                return Err(ConfigErrorKind::OutOfRange);
            }
        }
        if !(0x08..=0x77).contains(&self.display.i2c_address) {
            return Err(ConfigErrorKind::OutOfRange);
        }
        if self.poll.delay_ms > 1000 {
            return Err(ConfigErrorKind::OutOfRange);
        }
        Ok(())
    }
}

/// Config parse error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigErrorKind {
    /// Line is neither a header nor `key = value`
    Syntax,
    /// Unknown `[section]`
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or cannot be read
    InvalidValue,
    /// Value outside its allowed range
    OutOfRange,
}

/// Config parse error with its 1-based line (0 for whole-file checks)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigError {
    pub line: u32,
    pub kind: ConfigErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Serial,
    Link,
    Display,
    Loop,
}

impl Section {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "serial" => Some(Section::Serial),
            "link" => Some(Section::Link),
            "display" => Some(Section::Display),
            "loop" => Some(Section::Loop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value<'a> {
    Integer(i64),
    Bool(bool),
    Str(&'a str),
}

impl<'a> Value<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        match text {
            "true" => return Some(Value::Bool(true)),
            "false" => return Some(Value::Bool(false)),
            _ => {}
        }
        if let Some(inner) = text.strip_prefix('"') {
            return inner.strip_suffix('"').map(Value::Str);
        }
        parse_integer(text).map(Value::Integer)
    }

    fn as_u32(self) -> Result<u32, ConfigErrorKind> {
        match self {
            Value::Integer(n) => u32::try_from(n).map_err(|_| ConfigErrorKind::OutOfRange),
            _ => Err(ConfigErrorKind::InvalidValue),
        }
    }

    fn as_u8(self) -> Result<u8, ConfigErrorKind> {
        match self {
            Value::Integer(n) => u8::try_from(n).map_err(|_| ConfigErrorKind::OutOfRange),
            _ => Err(ConfigErrorKind::InvalidValue),
        }
    }

    fn as_bool(self) -> Result<bool, ConfigErrorKind> {
        match self {
            Value::Bool(b) => Ok(b),
            _ => Err(ConfigErrorKind::InvalidValue),
        }
    }
}

/// Decimal or `0x` hex integer, `_` separators allowed
fn parse_integer(text: &str) -> Option<i64> {
    let (negative, body) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = match body.strip_prefix("0x") {
        Some(hex) => (16, hex),
        None => (10, body),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for ch in digits.chars() {
        if ch == '_' {
            continue;
        }
        let digit = ch.to_digit(radix)?;
        value = value
            .checked_mul(i64::from(radix))?
            .checked_add(i64::from(digit))?;
        seen = true;
    }
    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Remove a trailing `#` comment outside of strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn apply(
    config: &mut MonitorConfig,
    section: Section,
    key: &str,
    value: Value<'_>,
) -> Result<(), ConfigErrorKind> {
    match (section, key) {
        (Section::Root, "variant") => {
            config.variant = match value {
                Value::Str("compact") => Variant::Compact,
                Value::Str("extended") => Variant::Extended,
                _ => return Err(ConfigErrorKind::InvalidValue),
            };
        }
        (Section::Serial, "baudrate") => config.serial.baudrate = value.as_u32()?,
        (Section::Link, "timeout_ms") => config.link.timeout_ms = value.as_u32()?,
        (Section::Display, "refresh_ms") => config.display.refresh_ms = Some(value.as_u32()?),
        (Section::Display, "i2c_address") => config.display.i2c_address = value.as_u8()?,
        (Section::Display, "backlight") => config.display.backlight = value.as_bool()?,
        (Section::Loop, "delay_ms") => config.poll.delay_ms = value.as_u32()?,
        _ => return Err(ConfigErrorKind::UnknownKey),
    }
    Ok(())
}

/// Parse a monitor config
///
/// Keys that are not present keep their defaults.
pub fn parse_config(text: &str) -> Result<MonitorConfig, ConfigError> {
    let mut config = MonitorConfig::default();
    let mut section = Section::Root;

    for (index, raw) in text.lines().enumerate() {
        let line_no = u32::try_from(index + 1).unwrap_or(u32::MAX);
        let at = |kind| ConfigError {
            line: line_no,
            kind,
        };

        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| at(ConfigErrorKind::Syntax))?;
            section = Section::from_name(name.trim())
                .ok_or_else(|| at(ConfigErrorKind::InvalidSection))?;
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| at(ConfigErrorKind::Syntax))?;
        let value = Value::parse(value.trim()).ok_or_else(|| at(ConfigErrorKind::InvalidValue))?;
        apply(&mut config, section, key.trim(), value).map_err(at)?;
    }

    config
        .validate()
        .map_err(|kind| ConfigError { line: 0, kind })?;
    Ok(config)
}
