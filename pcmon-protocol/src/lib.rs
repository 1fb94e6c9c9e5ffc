//! Host telemetry line protocol
//!
//! This crate defines the text protocol a host PC uses to push sensor
//! readings to the pcmon display over a serial link. The protocol is
//! deliberately forgiving: it is a best-effort decoder, not a validator.
//!
//! # Protocol Overview
//!
//! Every record is one newline-terminated line of `TAG:VALUE` pairs joined
//! by `|`:
//! ```text
//! TEMP:45.5|LOAD:70.0\n
//! CPU_TEMP:52.0|CPU_LOAD:12.5|GPU_TEMP:61.0|GPU_LOAD:99.0|RAM:48.2\n
//! ```
//!
//! - Pairs may appear in any order and any subset may be present.
//! - Unknown text is ignored; a malformed number reads as `0.0`.
//! - The display answers each accepted line with `OK:<temp>,<load>\n`.
//! - The host may open the link with a bare `HELLO\n`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod ack;
pub mod encode;
pub mod fields;
pub mod line;
pub mod parse;

pub use ack::{format_ack, Ack, ACK_CAPACITY, ACK_PREFIX};
pub use encode::{EncodeError, TelemetryLine, MAX_ENCODED_LEN};
pub use fields::{Field, Tag, COMPACT_TAGS, EXTENDED_TAGS};
pub use line::{Line, LineBuffer, LineError, LINE_CAPACITY, LINE_TERMINATOR};
pub use parse::{is_handshake, parse_lenient_f32, parse_line, Readings, HANDSHAKE};
