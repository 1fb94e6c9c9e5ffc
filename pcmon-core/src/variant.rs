//! Display variants
//!
//! The two boards differ in LCD size, the tags they listen for, how often
//! they repaint, and when a line counts as an update worth acknowledging.

use pcmon_protocol::{Field, Readings, Tag, COMPACT_TAGS, EXTENDED_TAGS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which display build this firmware drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Variant {
    /// 16x2 LCD, CPU temperature and load
    Compact,
    /// 20x4 LCD, CPU/GPU temperature and load plus RAM
    #[default]
    Extended,
}

impl Variant {
    /// Tag table the decoder searches for
    pub fn tags(self) -> &'static [Tag] {
        match self {
            Variant::Compact => COMPACT_TAGS,
            Variant::Extended => EXTENDED_TAGS,
        }
    }

    /// LCD size as (columns, rows)
    pub const fn grid(self) -> (u8, u8) {
        match self {
            Variant::Compact => (16, 2),
            Variant::Extended => (20, 4),
        }
    }

    /// Render interval used when the config does not override it
    pub const fn default_refresh_ms(self) -> u32 {
        match self {
            Variant::Compact => 500,
            Variant::Extended => 1000,
        }
    }

    /// Whether a parsed line refreshes the link timestamp
    ///
    /// The compact board only trusts lines carrying a temperature; the
    /// extended board takes any recognized field.
    pub fn accepts(self, readings: &Readings) -> bool {
        match self {
            Variant::Compact => readings.contains(Field::CpuTemp),
            Variant::Extended => !readings.is_empty(),
        }
    }

    /// Whether a parsed line is answered with an ack
    ///
    /// The extended board answers every non-empty line, recognized or not.
    pub fn acknowledges(self, readings: &Readings) -> bool {
        match self {
            Variant::Compact => readings.contains(Field::CpuTemp),
            Variant::Extended => true,
        }
    }

    /// Human-readable name for logs and the boot screen
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Compact => "compact",
            Variant::Extended => "extended",
        }
    }
}
