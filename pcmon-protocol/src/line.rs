//! Line accumulation for the telemetry stream.
//!
//! Bytes are collected until [`LINE_TERMINATOR`]. The buffer is bounded: once
//! a line outgrows [`LINE_CAPACITY`] the rest of it is dropped, and at the
//! next terminator the whole line is discarded so the stream resynchronizes
//! on a clean line boundary.

use heapless::Vec;

/// Byte ending a telemetry line
pub const LINE_TERMINATOR: u8 = b'\n';

/// Maximum bytes kept for a single line (terminator excluded)
pub const LINE_CAPACITY: usize = 128;

/// Errors reported while accumulating lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// The line exceeded [`LINE_CAPACITY`] and was discarded
    Overflow {
        /// Number of bytes that did not fit
        dropped: usize,
    },
}

/// One complete line, terminator and carriage returns removed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    bytes: Vec<u8, LINE_CAPACITY>,
}

impl Line {
    /// Raw line content
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

/// Bounded accumulator turning a byte stream into [`Line`]s
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    buffer: Vec<u8, LINE_CAPACITY>,
    /// Bytes dropped from the current line
    dropped: usize,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            dropped: 0,
        }
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.dropped = 0;
    }

    /// Bytes held for the line in progress
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the line in progress has already overflowed
    pub fn is_overflowing(&self) -> bool {
        self.dropped > 0
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` when a terminator completes a line (the line
    /// may be empty), `Ok(None)` while more bytes are needed, and
    /// `Err(LineError::Overflow)` when an oversized line is discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match byte {
            LINE_TERMINATOR => {
                if self.dropped > 0 {
                    let dropped = self.dropped;
                    self.reset();
                    return Err(LineError::Overflow { dropped });
                }
                let line = Line {
                    bytes: core::mem::take(&mut self.buffer),
                };
                Ok(Some(line))
            }
            b'\r' => Ok(None),
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.dropped = self.dropped.saturating_add(1);
                }
                Ok(None)
            }
        }
    }

    /// Feed multiple bytes
    ///
    /// Returns the first complete line found. Bytes after it are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Line>, LineError> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte)? {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}
