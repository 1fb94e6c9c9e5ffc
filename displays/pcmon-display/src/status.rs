//! Status glyph for a reading
//!
//! Temperatures and percentages share one scale, so a single character
//! next to a value shows how close it is to trouble.

/// Severity band of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusLevel {
    /// Below 50
    Low,
    /// 50 up to 70
    Medium,
    /// 70 up to 85
    High,
    /// 85 and above
    Critical,
}

impl StatusLevel {
    /// Classify a reading; each band includes its lower bound
    pub fn from_value(value: f32) -> Self {
        if value < 50.0 {
            StatusLevel::Low
        } else if value < 70.0 {
            StatusLevel::Medium
        } else if value < 85.0 {
            StatusLevel::High
        } else {
            StatusLevel::Critical
        }
    }

    /// Character shown on screen
    pub const fn glyph(self) -> u8 {
        match self {
            StatusLevel::Low => b'L',
            StatusLevel::Medium => b'M',
            StatusLevel::High => b'H',
            StatusLevel::Critical => b'!',
        }
    }
}
