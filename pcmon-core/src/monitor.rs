//! Cooperative poll step
//!
//! One call to [`Monitor::poll`] is one iteration of the firmware main loop:
//!
//! 1. Drain every byte the UART already holds through the decoder, sending
//!    acks best-effort.
//! 2. Check the link timeout.
//! 3. Report whether the render interval has elapsed.
//!
//! Rendering itself happens in the caller with the [`TelemetryView`] taken
//! from the monitor, so this crate stays independent of the display stack.

use pcmon_hal::{UartError, UartRx, UartTx};

use crate::config::MonitorConfig;
use crate::decoder::{Decoder, LineEvent};
use crate::link::ConnectionState;
use crate::telemetry::TelemetrySample;
use crate::timer::RefreshTimer;
use crate::variant::Variant;

/// Snapshot handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryView {
    pub variant: Variant,
    pub sample: TelemetrySample,
    pub link: ConnectionState,
    /// Time of the snapshot
    pub now_ms: u64,
}

/// Summary of one poll iteration, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollReport {
    /// Bytes drained from the UART
    pub bytes: u32,
    /// Lines that refreshed the link
    pub accepted: u16,
    /// Lines parsed without refreshing the link
    pub ignored: u16,
    /// Handshake lines
    pub handshakes: u16,
    /// Lines dropped for overflow or bad encoding
    pub discarded: u16,
    /// Acks fully queued for transmit
    pub acks_sent: u16,
    /// Acks the transmitter could not take
    pub acks_dropped: u16,
    /// Receive error that ended the drain early
    pub rx_error: Option<UartError>,
    /// Link went from connected to lost in this iteration
    pub link_lost: bool,
    /// Frame number to render, when the render interval elapsed
    pub render_frame: Option<u32>,
}

impl PollReport {
    fn record(&mut self, event: &LineEvent) {
        match event {
            LineEvent::Parsed { accepted: true, .. } => self.accepted += 1,
            LineEvent::Parsed { accepted: false, .. } => self.ignored += 1,
            LineEvent::Handshake { .. } => self.handshakes += 1,
            LineEvent::Overflow { .. } | LineEvent::Malformed { .. } => self.discarded += 1,
            LineEvent::Empty => {}
        }
    }
}

/// Owns every piece of runtime state: no globals
#[derive(Debug, Clone)]
pub struct Monitor {
    config: MonitorConfig,
    sample: TelemetrySample,
    link: ConnectionState,
    decoder: Decoder,
    refresh: RefreshTimer,
}

impl Monitor {
    /// Create a monitor with empty telemetry
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            sample: TelemetrySample::new(),
            link: ConnectionState::new(),
            decoder: Decoder::new(config.variant),
            refresh: RefreshTimer::new(config.refresh_ms()),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn sample(&self) -> &TelemetrySample {
        &self.sample
    }

    pub fn link(&self) -> &ConnectionState {
        &self.link
    }

    /// Snapshot for rendering at `now_ms`
    pub fn view(&self, now_ms: u64) -> TelemetryView {
        TelemetryView {
            variant: self.config.variant,
            sample: self.sample,
            link: self.link,
            now_ms,
        }
    }

    /// Feed one byte, returning the line event it completed
    pub fn feed_byte(&mut self, byte: u8, now_ms: u64) -> Option<LineEvent> {
        self.decoder.feed_byte(byte, now_ms, &mut self.sample, &mut self.link)
    }

    /// Run one loop iteration at `now_ms`
    pub fn poll<U>(&mut self, uart: &mut U, now_ms: u64) -> PollReport
    where
        U: UartRx + UartTx,
    {
        let mut report = PollReport::default();

        loop {
            match uart.try_read_byte() {
                Ok(Some(byte)) => {
                    report.bytes = report.bytes.saturating_add(1);
                    if let Some(event) = self.feed_byte(byte, now_ms) {
                        report.record(&event);
                        if let Some(ack) = event.ack() {
                            send_ack(uart, ack.as_bytes(), &mut report);
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    report.rx_error = Some(e);
                    break;
                }
            }
        }

        report.link_lost = self.link.check_timeout(now_ms, self.config.link.timeout_ms);
        report.render_frame = self.refresh.poll(now_ms);
        report
    }
}

/// Queue an ack without waiting; anything that does not fit is dropped
fn send_ack<T: UartTx>(uart: &mut T, ack: &[u8], report: &mut PollReport) {
    match uart.try_write(ack) {
        Ok(n) if n == ack.len() => report.acks_sent += 1,
        _ => report.acks_dropped += 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Mock UART: scripted receive bytes, bounded transmit space
    struct MockUart {
        rx: VecDeque<Result<u8, UartError>>,
        tx: Vec<u8>,
        tx_space: usize,
    }

    impl MockUart {
        fn new() -> Self {
            Self {
                rx: VecDeque::new(),
                tx: Vec::new(),
                tx_space: usize::MAX,
            }
        }

        fn receive(&mut self, bytes: &[u8]) {
            self.rx.extend(bytes.iter().map(|&b| Ok(b)));
        }

        fn tx_str(&self) -> &str {
            std::str::from_utf8(&self.tx).unwrap()
        }
    }

    impl UartRx for MockUart {
        fn try_read_byte(&mut self) -> Result<Option<u8>, UartError> {
            match self.rx.pop_front() {
                Some(Ok(byte)) => Ok(Some(byte)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            }
        }
    }

    impl UartTx for MockUart {
        fn try_write(&mut self, data: &[u8]) -> Result<usize, UartError> {
            let n = data.len().min(self.tx_space);
            self.tx.extend_from_slice(&data[..n]);
            self.tx_space -= n;
            Ok(n)
        }
    }

    fn compact_monitor() -> Monitor {
        Monitor::new(MonitorConfig::for_variant(Variant::Compact))
    }

    #[test]
    fn test_poll_drains_all_lines_and_acks() {
        let mut monitor = compact_monitor();
        let mut uart = MockUart::new();
        uart.receive(b"TEMP:40|LOAD:10\nTEMP:41|LOAD:11\n");

        let report = monitor.poll(&mut uart, 0);

        assert_eq!(report.bytes, 32);
        assert_eq!(report.accepted, 2);
        assert_eq!(report.acks_sent, 2);
        assert_eq!(uart.tx_str(), "OK:40.0,10.0\nOK:41.0,11.0\n");
        assert_eq!(monitor.sample().cpu_temp, 41.0);
        assert!(uart.rx.is_empty());
    }

    #[test]
    fn test_busy_transmitter_drops_ack() {
        let mut monitor = compact_monitor();
        let mut uart = MockUart::new();
        uart.tx_space = 4;
        uart.receive(b"TEMP:40|LOAD:10\n");

        let report = monitor.poll(&mut uart, 0);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.acks_dropped, 1);
        assert_eq!(report.acks_sent, 0);
        assert!(monitor.link().is_connected());
    }

    #[test]
    fn test_rx_error_ends_drain_but_keeps_state() {
        let mut monitor = compact_monitor();
        let mut uart = MockUart::new();
        uart.receive(b"TEMP:4");
        uart.rx.push_back(Err(UartError::Overrun));
        uart.receive(b"0\n");

        let report = monitor.poll(&mut uart, 0);
        assert_eq!(report.rx_error, Some(UartError::Overrun));
        assert_eq!(report.accepted, 0);

        // Remaining bytes are picked up on the next iteration
        let report = monitor.poll(&mut uart, 10);
        assert_eq!(report.accepted, 1);
        assert_eq!(monitor.sample().cpu_temp, 40.0);
    }

    #[test]
    fn test_link_lost_after_timeout() {
        let mut monitor = compact_monitor();
        let mut uart = MockUart::new();
        uart.receive(b"TEMP:50|LOAD:50\n");
        monitor.poll(&mut uart, 1000);
        assert!(monitor.link().is_connected());

        let report = monitor.poll(&mut uart, 6000);
        assert!(!report.link_lost);
        assert!(monitor.link().is_connected());

        let report = monitor.poll(&mut uart, 6001);
        assert!(report.link_lost);
        assert!(!monitor.link().is_connected());
    }

    #[test]
    fn test_render_cadence_independent_of_input() {
        let mut monitor = compact_monitor();
        let mut uart = MockUart::new();

        assert_eq!(monitor.poll(&mut uart, 0).render_frame, Some(0));
        uart.receive(b"TEMP:50|LOAD:50\n");
        assert_eq!(monitor.poll(&mut uart, 100).render_frame, None);
        assert_eq!(monitor.poll(&mut uart, 500).render_frame, Some(1));
    }

    #[test]
    fn test_report_counts_line_kinds() {
        let mut monitor = Monitor::new(MonitorConfig::for_variant(Variant::Extended));
        let mut uart = MockUart::new();
        uart.receive(b"HELLO\nGARBAGE\n\nRAM:20\n");

        let report = monitor.poll(&mut uart, 0);
        assert_eq!(report.handshakes, 1);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.accepted, 1);
        // Extended answers the handshake, the garbage line and the RAM line
        assert_eq!(report.acks_sent, 3);
        assert_eq!(uart.tx_str().matches("OK:").count(), 3);
    }

    #[test]
    fn test_view_snapshot() {
        let mut monitor = compact_monitor();
        monitor.feed_byte(b'\n', 0);
        for &b in b"TEMP:33\n" {
            monitor.feed_byte(b, 700);
        }
        let view = monitor.view(900);
        assert_eq!(view.variant, Variant::Compact);
        assert_eq!(view.sample.cpu_temp, 33.0);
        assert_eq!(view.link.elapsed_ms(view.now_ms), Some(200));
    }
}
