//! Render cadence
//!
//! The display repaints on its own fixed interval, independent of when lines
//! arrive. The timer is polled from the main loop with the current time.

/// Fixed-interval render timer with a frame counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshTimer {
    interval_ms: u32,
    /// Time of the last render, `None` before the first
    last_ms: Option<u64>,
    /// Renders issued so far
    frame: u32,
}

impl RefreshTimer {
    /// Create a timer firing every `interval_ms` (minimum 1 ms)
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: if interval_ms == 0 { 1 } else { interval_ms },
            last_ms: None,
            frame: 0,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Check whether a render is due at `now_ms`
    ///
    /// The first poll is always due. Returns the frame number to render,
    /// counting from zero.
    pub fn poll(&mut self, now_ms: u64) -> Option<u32> {
        let due = match self.last_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= u64::from(self.interval_ms),
        };
        if !due {
            return None;
        }

        self.last_ms = Some(now_ms);
        let frame = self.frame;
        self.frame = self.frame.wrapping_add(1);
        Some(frame)
    }
}
