//! Acknowledgment line sent back to the host
//!
//! The ack is informational only: the host never waits for it and the
//! display never retries it.

use core::fmt::Write;

use heapless::String;

/// Leading text of every acknowledgment
pub const ACK_PREFIX: &str = "OK:";

/// Room for `OK:` plus two values and the terminator
pub const ACK_CAPACITY: usize = 32;

/// One formatted acknowledgment line, terminator included
pub type Ack = String<ACK_CAPACITY>;

/// Format `OK:<cpu_temp>,<cpu_load>\n` with one decimal per value
pub fn format_ack(cpu_temp: f32, cpu_load: f32) -> Ack {
    let mut ack = Ack::new();
    if writeln!(ack, "{}{:.1},{:.1}", ACK_PREFIX, cpu_temp, cpu_load).is_err() {
        // Only absurd magnitudes overflow; fall back to the bare prefix
        ack.clear();
        let _ = ack.push_str(ACK_PREFIX);
        let _ = ack.push('\n');
    }
    ack
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_format() {
        assert_eq!(format_ack(45.5, 70.0).as_str(), "OK:45.5,70.0\n");
    }

    #[test]
    fn test_ack_zero_values() {
        assert_eq!(format_ack(0.0, 0.0).as_str(), "OK:0.0,0.0\n");
    }

    #[test]
    fn test_ack_overflow_falls_back_to_prefix() {
        assert_eq!(format_ack(f32::MAX, f32::MAX).as_str(), "OK:\n");
    }
}
