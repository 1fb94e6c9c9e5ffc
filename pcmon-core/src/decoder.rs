//! Telemetry line decoder
//!
//! Turns the raw serial byte stream into updates of the telemetry record and
//! the link state. All state is passed in by reference so the decoder can be
//! exercised on its own.

use pcmon_protocol::{
    format_ack, is_handshake, parse_line, Ack, LineBuffer, LineError, Readings,
};

use crate::link::ConnectionState;
use crate::telemetry::TelemetrySample;
use crate::variant::Variant;

/// What happened to a completed line
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// Line was scanned for tags; found fields have been applied
    Parsed {
        /// Fields found in the line
        readings: Readings,
        /// Whether the line refreshed the link state
        accepted: bool,
        /// Reply to send back, if the variant answers this line
        ack: Option<Ack>,
    },
    /// Host opening handshake
    Handshake {
        /// Reply to send back, if the variant answers this line
        ack: Option<Ack>,
    },
    /// Blank line
    Empty,
    /// Line held invalid bytes and no known tag
    Malformed {
        /// Reply to send back, if the variant answers this line
        ack: Option<Ack>,
    },
    /// Line outgrew the buffer and was discarded
    Overflow {
        /// Bytes that did not fit
        dropped: usize,
    },
}

impl LineEvent {
    /// Ack to transmit for this line, if any
    pub fn ack(&self) -> Option<&Ack> {
        match self {
            LineEvent::Parsed { ack, .. }
            | LineEvent::Handshake { ack }
            | LineEvent::Malformed { ack } => ack.as_ref(),
            LineEvent::Empty | LineEvent::Overflow { .. } => None,
        }
    }

    /// Whether the line refreshed the link state
    pub fn is_accepted(&self) -> bool {
        matches!(self, LineEvent::Parsed { accepted: true, .. })
    }
}

/// Line decoder for one display variant
#[derive(Debug, Clone)]
pub struct Decoder {
    lines: LineBuffer,
    variant: Variant,
}

impl Decoder {
    /// Create a decoder listening for `variant`'s tags
    pub const fn new(variant: Variant) -> Self {
        Self {
            lines: LineBuffer::new(),
            variant,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Bytes buffered for the line in progress
    pub fn pending(&self) -> usize {
        self.lines.pending()
    }

    /// Feed one received byte
    ///
    /// Returns an event when the byte completed (or discarded) a line.
    pub fn feed_byte(
        &mut self,
        byte: u8,
        now_ms: u64,
        sample: &mut TelemetrySample,
        link: &mut ConnectionState,
    ) -> Option<LineEvent> {
        match self.lines.feed(byte) {
            Ok(Some(line)) => Some(self.parse_line(line.as_bytes(), now_ms, sample, link)),
            Ok(None) => None,
            Err(LineError::Overflow { dropped }) => Some(LineEvent::Overflow { dropped }),
        }
    }

    /// Apply one complete line
    ///
    /// Invalid UTF-8 does not stop the tag scan; only a line with invalid
    /// bytes and no known tag is reported as malformed.
    pub fn parse_line(
        &self,
        line: &[u8],
        now_ms: u64,
        sample: &mut TelemetrySample,
        link: &mut ConnectionState,
    ) -> LineEvent {
        if line.iter().all(u8::is_ascii_whitespace) {
            return LineEvent::Empty;
        }

        let text = core::str::from_utf8(line).ok();
        if text.is_some_and(is_handshake) {
            return LineEvent::Handshake {
                ack: self.ack(&Readings::new(), sample),
            };
        }

        let readings = parse_line(line, self.variant.tags());
        if text.is_none() && readings.is_empty() {
            return LineEvent::Malformed {
                ack: self.ack(&readings, sample),
            };
        }
        sample.apply(&readings);

        let accepted = self.variant.accepts(&readings);
        if accepted {
            link.mark_update(now_ms);
        }

        let ack = self.ack(&readings, sample);

        LineEvent::Parsed {
            readings,
            accepted,
            ack,
        }
    }

    /// Ack for a line with `readings`, if the variant answers it
    fn ack(&self, readings: &Readings, sample: &TelemetrySample) -> Option<Ack> {
        self.variant
            .acknowledges(readings)
            .then(|| format_ack(sample.cpu_temp, sample.cpu_load))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcmon_protocol::{Field, TelemetryLine, LINE_CAPACITY};
    use proptest::prelude::*;

    struct Harness {
        decoder: Decoder,
        sample: TelemetrySample,
        link: ConnectionState,
    }

    impl Harness {
        fn new(variant: Variant) -> Self {
            Self {
                decoder: Decoder::new(variant),
                sample: TelemetrySample::new(),
                link: ConnectionState::new(),
            }
        }

        fn feed(&mut self, bytes: &[u8], now_ms: u64) -> std::vec::Vec<LineEvent> {
            let mut events = std::vec::Vec::new();
            for &byte in bytes {
                let event =
                    self.decoder.feed_byte(byte, now_ms, &mut self.sample, &mut self.link);
                if let Some(event) = event {
                    events.push(event);
                }
            }
            events
        }
    }

    #[test]
    fn test_compact_line_updates_sample_and_link() {
        let mut h = Harness::new(Variant::Compact);
        let events = h.feed(b"TEMP:45.5|LOAD:70\n", 100);

        assert_eq!(events.len(), 1);
        assert!(events[0].is_accepted());
        assert_eq!(events[0].ack().map(|a| a.as_str()), Some("OK:45.5,70.0\n"));
        assert_eq!(h.sample.cpu_temp, 45.5);
        assert_eq!(h.sample.cpu_load, 70.0);
        assert!(h.link.is_connected());
        assert_eq!(h.link.last_update_ms(), Some(100));
    }

    #[test]
    fn test_garbage_changes_nothing() {
        let mut h = Harness::new(Variant::Compact);
        h.feed(b"GARBAGE\n", 100);

        assert_eq!(h.sample, TelemetrySample::new());
        assert!(!h.link.is_connected());
        assert!(!h.link.has_history());
    }

    #[test]
    fn test_non_numeric_value_reads_zero() {
        let mut h = Harness::new(Variant::Compact);
        h.feed(b"TEMP:80|LOAD:90\n", 0);
        h.feed(b"TEMP:abc|LOAD:10\n", 10);

        assert_eq!(h.sample.cpu_temp, 0.0);
        assert_eq!(h.sample.cpu_load, 10.0);
    }

    #[test]
    fn test_empty_line_is_noop() {
        let mut h = Harness::new(Variant::Extended);
        let events = h.feed(b"\n", 0);
        assert_eq!(events, [LineEvent::Empty]);
        assert!(!h.link.is_connected());
    }

    #[test]
    fn test_extended_acks_handshake_without_connecting() {
        let mut h = Harness::new(Variant::Extended);
        let events = h.feed(b"HELLO\n", 0);

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LineEvent::Handshake { .. }));
        assert_eq!(events[0].ack().map(|a| a.as_str()), Some("OK:0.0,0.0\n"));
        assert!(!h.link.has_history());
    }

    #[test]
    fn test_compact_handshake_is_silent() {
        let mut h = Harness::new(Variant::Compact);
        let events = h.feed(b"HELLO\r\n", 0);
        assert_eq!(events, [LineEvent::Handshake { ack: None }]);
        assert!(!h.link.has_history());
    }

    #[test]
    fn test_compact_load_only_updates_value_without_connecting() {
        let mut h = Harness::new(Variant::Compact);
        let events = h.feed(b"LOAD:33\n", 0);

        assert_eq!(h.sample.cpu_load, 33.0);
        assert!(!h.link.is_connected());
        assert_eq!(events[0].ack(), None);
    }

    #[test]
    fn test_extended_acks_unrecognized_line() {
        let mut h = Harness::new(Variant::Extended);
        let events = h.feed(b"GARBAGE\n", 0);

        assert!(!events[0].is_accepted());
        assert_eq!(events[0].ack().map(|a| a.as_str()), Some("OK:0.0,0.0\n"));
        assert!(!h.link.is_connected());
    }

    #[test]
    fn test_extended_partial_line_connects() {
        let mut h = Harness::new(Variant::Extended);
        h.feed(b"GPU_TEMP:66.0|RAM:41\n", 50);

        assert_eq!(h.sample.gpu_temp, 66.0);
        assert_eq!(h.sample.ram_usage, 41.0);
        assert_eq!(h.sample.cpu_temp, 0.0);
        assert!(h.link.is_connected());
    }

    #[test]
    fn test_overflowing_line_is_dropped_and_stream_resyncs() {
        let mut h = Harness::new(Variant::Compact);
        let mut long = std::vec![b'9'; LINE_CAPACITY + 5];
        long.splice(0..0, b"TEMP:".iter().copied());
        long.push(b'\n');

        let events = h.feed(&long, 0);
        assert_eq!(events, [LineEvent::Overflow { dropped: 10 }]);
        assert!(!h.link.is_connected());

        h.feed(b"TEMP:42|LOAD:1\n", 5);
        assert_eq!(h.sample.cpu_temp, 42.0);
        assert!(h.link.is_connected());
    }

    #[test]
    fn test_invalid_bytes_without_tags_are_malformed() {
        let mut h = Harness::new(Variant::Compact);
        let events = h.feed(&[b'T', 0xFF, b'\n'], 0);
        assert_eq!(events, [LineEvent::Malformed { ack: None }]);
        assert_eq!(h.sample, TelemetrySample::new());
    }

    #[test]
    fn test_extended_acks_malformed_line() {
        let mut h = Harness::new(Variant::Extended);
        h.feed(b"CPU_TEMP:50|CPU_LOAD:20\n", 0);
        let events = h.feed(&[0xFE, 0xFF, b'\n'], 10);

        assert!(matches!(events[0], LineEvent::Malformed { .. }));
        assert_eq!(events[0].ack().map(|a| a.as_str()), Some("OK:50.0,20.0\n"));
        assert_eq!(h.link.last_update_ms(), Some(0));
    }

    #[test]
    fn test_noise_before_tags_still_updates() {
        let mut h = Harness::new(Variant::Compact);
        let events = h.feed(b"\xFFTEMP:45.5|LOAD:70\n", 20);

        assert!(events[0].is_accepted());
        assert_eq!(events[0].ack().map(|a| a.as_str()), Some("OK:45.5,70.0\n"));
        assert_eq!(h.sample.cpu_temp, 45.5);
        assert_eq!(h.sample.cpu_load, 70.0);
        assert!(h.link.is_connected());
        assert_eq!(h.link.last_update_ms(), Some(20));
    }

    #[test]
    fn test_crlf_lines() {
        let mut h = Harness::new(Variant::Compact);
        h.feed(b"TEMP:30.0|LOAD:5.0\r\n", 0);
        assert_eq!(h.sample.cpu_load, 5.0);
    }

    #[test]
    fn test_line_split_across_feeds() {
        let mut h = Harness::new(Variant::Compact);
        assert!(h.feed(b"TEMP:5", 0).is_empty());
        assert!(h.feed(b"5.0|LO", 1).is_empty());
        assert_eq!(h.feed(b"AD:20\n", 2).len(), 1);
        assert_eq!(h.sample.cpu_temp, 55.0);
        assert_eq!(h.sample.cpu_load, 20.0);
        assert_eq!(h.link.last_update_ms(), Some(2));
    }

    proptest! {
        /// A line carrying a subset of fields leaves every other field as it was
        #[test]
        fn prop_absent_fields_keep_previous_values(
            mask in 0u8..32,
            value in 0u16..1000,
        ) {
            let mut h = Harness::new(Variant::Extended);
            h.feed(b"CPU_TEMP:1|CPU_LOAD:2|GPU_TEMP:3|GPU_LOAD:4|RAM:5\n", 0);
            let before = h.sample;

            let mut line = TelemetryLine::new();
            for (i, tag) in Variant::Extended.tags().iter().enumerate() {
                if mask & (1 << i) != 0 {
                    line.push(tag, f32::from(value)).unwrap();
                }
            }
            h.feed(line.to_wire().as_bytes(), 10);

            for (i, field) in Field::ALL.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    prop_assert_eq!(h.sample.get(*field), f32::from(value));
                } else {
                    prop_assert_eq!(h.sample.get(*field), before.get(*field));
                }
            }
        }
    }
}
