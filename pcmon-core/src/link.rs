//! Serial link health
//!
//! Tracks when the host last delivered an accepted line and flips to
//! disconnected once the link has been quiet for longer than the timeout.

/// Default silence allowed before the link counts as lost
pub const LINK_TIMEOUT_MS: u32 = 5000;

/// Connection flag plus time of the last accepted line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionState {
    connected: bool,
    /// Monotonic time of the last accepted line, `None` before the first
    last_update_ms: Option<u64>,
}

impl ConnectionState {
    /// Create a disconnected state with no history
    pub const fn new() -> Self {
        Self {
            connected: false,
            last_update_ms: None,
        }
    }

    /// Record an accepted line at `now_ms`
    pub fn mark_update(&mut self, now_ms: u64) {
        self.connected = true;
        self.last_update_ms = Some(now_ms);
    }

    /// Drop the connection if the link has been quiet too long
    ///
    /// Disconnects when strictly more than `timeout_ms` has passed since the
    /// last update. Returns `true` only on the connected → disconnected
    /// transition.
    pub fn check_timeout(&mut self, now_ms: u64, timeout_ms: u32) -> bool {
        if !self.connected {
            return false;
        }
        match self.elapsed_ms(now_ms) {
            Some(elapsed) if elapsed > u64::from(timeout_ms) => {
                self.connected = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn last_update_ms(&self) -> Option<u64> {
        self.last_update_ms
    }

    /// Whether any line was ever accepted
    pub fn has_history(&self) -> bool {
        self.last_update_ms.is_some()
    }

    /// Time since the last accepted line
    pub fn elapsed_ms(&self, now_ms: u64) -> Option<u64> {
        self.last_update_ms.map(|last| now_ms.saturating_sub(last))
    }
}
