//! Telemetry fields and the literal tags that identify them on the wire

/// A sensor reading carried by a telemetry line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// CPU package temperature (°C)
    CpuTemp,
    /// CPU load (%)
    CpuLoad,
    /// GPU core temperature (°C)
    GpuTemp,
    /// GPU load (%)
    GpuLoad,
    /// RAM usage (%)
    RamUsage,
}

impl Field {
    /// Number of distinct fields
    pub const COUNT: usize = 5;

    /// All fields in canonical order
    pub const ALL: [Field; Field::COUNT] = [
        Field::CpuTemp,
        Field::CpuLoad,
        Field::GpuTemp,
        Field::GpuLoad,
        Field::RamUsage,
    ];

    /// Position of this field in [`Field::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Field::CpuTemp => 0,
            Field::CpuLoad => 1,
            Field::GpuTemp => 2,
            Field::GpuLoad => 3,
            Field::RamUsage => 4,
        }
    }
}

/// Literal prefix identifying a field within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tag {
    /// Text searched for, including the trailing `:`
    pub text: &'static str,
    /// Field the value after the tag belongs to
    pub field: Field,
}

impl Tag {
    pub const fn new(text: &'static str, field: Field) -> Self {
        Self { text, field }
    }
}

/// Tags understood by the two-field (16x2) display
pub const COMPACT_TAGS: &[Tag] = &[
    Tag::new("TEMP:", Field::CpuTemp),
    Tag::new("LOAD:", Field::CpuLoad),
];

/// Tags understood by the five-field (20x4) display
pub const EXTENDED_TAGS: &[Tag] = &[
    Tag::new("CPU_TEMP:", Field::CpuTemp),
    Tag::new("CPU_LOAD:", Field::CpuLoad),
    Tag::new("GPU_TEMP:", Field::GpuTemp),
    Tag::new("GPU_LOAD:", Field::GpuLoad),
    Tag::new("RAM:", Field::RamUsage),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn test_tags_end_with_separator() {
        for tag in COMPACT_TAGS.iter().chain(EXTENDED_TAGS) {
            assert!(tag.text.ends_with(':'));
        }
    }
}
