//! Buffered UART for the host link
//!
//! The host link runs on an interrupt-driven buffered UART; the poll loop
//! only ever touches the ring buffers, so reads never wait for the wire.

use embassy_rp::uart::{self, BufferedUart, BufferedUartRx, BufferedUartTx};
use embedded_io::{Read, ReadReady, Write};
use pcmon_hal::{UartConfig, UartError, UartRx, UartTx};

/// Peripheral config for a link config
pub fn peripheral_config(config: &UartConfig) -> uart::Config {
    let mut cfg = uart::Config::default();
    cfg.baudrate = config.baudrate;
    cfg
}

/// Classify an embassy UART error
pub fn classify(e: uart::Error) -> UartError {
    match e {
        uart::Error::Overrun => UartError::Overrun,
        uart::Error::Break => UartError::Break,
        uart::Error::Parity => UartError::Parity,
        uart::Error::Framing => UartError::Framing,
        _ => UartError::Other,
    }
}

/// Buffered UART split into its halves
pub struct BufferedSerial {
    tx: BufferedUartTx,
    rx: BufferedUartRx,
}

impl BufferedSerial {
    pub fn new(uart: BufferedUart) -> Self {
        let (tx, rx) = uart.split();
        Self { tx, rx }
    }
}

impl UartRx for BufferedSerial {
    fn try_read_byte(&mut self) -> Result<Option<u8>, UartError> {
        if !self.rx.read_ready().map_err(classify)? {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        match self.rx.read(&mut byte).map_err(classify)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

impl UartTx for BufferedSerial {
    /// Copy into the transmit ring buffer
    ///
    /// The interrupt handler drains the ring at line rate, so the buffer is
    /// never full for long; an ack that only partly fits is reported short.
    fn try_write(&mut self, data: &[u8]) -> Result<usize, UartError> {
        if data.is_empty() {
            return Ok(0);
        }
        self.tx.write(data).map_err(classify)
    }
}

