//! Loop diagnostics
//!
//! The library crates never log; each poll iteration returns a report and
//! this module turns it into defmt output.

use defmt::*;

use pcmon_core::PollReport;

/// Log what happened during one poll iteration
pub fn log_poll(report: &PollReport, timeout_ms: u32) {
    if report.bytes > 0 {
        trace!(
            "RX: {} bytes, {} accepted, {} ignored, {} acks",
            report.bytes,
            report.accepted,
            report.ignored,
            report.acks_sent
        );
    }
    if report.handshakes > 0 {
        info!("Host handshake received");
    }
    if report.discarded > 0 {
        warn!("Discarded {} oversized or malformed line(s)", report.discarded);
    }
    if report.acks_dropped > 0 {
        debug!("TX buffer full, dropped {} ack(s)", report.acks_dropped);
    }
    if let Some(e) = report.rx_error {
        warn!("UART read error: {:?}", e);
    }
    if report.link_lost {
        warn!("No telemetry for {} ms, link lost", timeout_ms);
    }
}
