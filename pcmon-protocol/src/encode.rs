//! Host-side line composition
//!
//! Builds telemetry lines the way the PC sender does, one decimal per value.
//! Used by host tools and to drive the decoder in tests.

use core::fmt::Write;

use heapless::String;

use crate::fields::{Tag, COMPACT_TAGS, EXTENDED_TAGS};
use crate::line::LINE_CAPACITY;

/// Longest line the encoder will produce (terminator included)
pub const MAX_ENCODED_LEN: usize = LINE_CAPACITY;

/// Errors from line composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The line would not fit in the receiver's buffer
    LineTooLong,
}

/// A telemetry line under construction
#[derive(Debug, Clone, Default)]
pub struct TelemetryLine {
    text: String<MAX_ENCODED_LEN>,
}

impl TelemetryLine {
    /// Start an empty line
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Two-field line: `TEMP:<t>|LOAD:<l>`
    pub fn compact(cpu_temp: f32, cpu_load: f32) -> Result<Self, EncodeError> {
        let mut line = Self::new();
        line.push(&COMPACT_TAGS[0], cpu_temp)?;
        line.push(&COMPACT_TAGS[1], cpu_load)?;
        Ok(line)
    }

    /// Five-field line in canonical order
    pub fn extended(values: [f32; 5]) -> Result<Self, EncodeError> {
        let mut line = Self::new();
        for (tag, value) in EXTENDED_TAGS.iter().zip(values) {
            line.push(tag, value)?;
        }
        Ok(line)
    }

    /// Append `TAG:value`, separated from any previous pair by `|`
    pub fn push(&mut self, tag: &Tag, value: f32) -> Result<(), EncodeError> {
        let rollback = self.text.len();
        let result = if self.text.is_empty() {
            write!(self.text, "{}{:.1}", tag.text, value)
        } else {
            write!(self.text, "|{}{:.1}", tag.text, value)
        };

        // Leave room for the terminator
        if result.is_err() || self.text.len() >= MAX_ENCODED_LEN {
            self.text.truncate(rollback);
            return Err(EncodeError::LineTooLong);
        }
        Ok(())
    }

    /// Line body without terminator
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Bytes as sent on the wire, terminator included
    pub fn to_wire(&self) -> String<MAX_ENCODED_LEN> {
        let mut wire = self.text.clone();
        // push() keeps one byte free for this
        let _ = wire.push('\n');
        wire
    }
}
