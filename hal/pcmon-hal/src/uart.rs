//! UART serial communication abstractions
//!
//! The telemetry loop never blocks on the serial port: it checks whether a
//! byte is waiting, reads it, and moves on. Transmission is best-effort.

/// Classified UART failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Framing error (bad stop bit, usually a baud mismatch)
    Framing,
    /// Receive overrun, bytes were lost
    Overrun,
    /// Break condition on the line
    Break,
    /// Parity error
    Parity,
    /// Anything the HAL could not classify
    Other,
}

/// UART receiver
pub trait UartRx {
    /// Read one byte if one is already buffered
    ///
    /// Returns `Ok(None)` when nothing is waiting. Never blocks.
    fn try_read_byte(&mut self) -> Result<Option<u8>, UartError>;
}

/// UART transmitter
pub trait UartTx {
    /// Queue as much of `data` as fits without blocking
    ///
    /// Returns the number of bytes accepted. Bytes that do not fit are
    /// dropped by the caller; there is no retry.
    fn try_write(&mut self, data: &[u8]) -> Result<usize, UartError>;
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self { baudrate: 115_200 }
    }
}
