//! Lenient telemetry line parsing
//!
//! A line is scanned once per known tag. When a tag occurs anywhere in the
//! line, its value runs from just after the tag to the next `|` (or the end
//! of the line) and is read with [`parse_lenient_f32`].

use crate::fields::{Field, Tag};

/// Line the host sends once after opening the port
pub const HANDSHAKE: &str = "HELLO";

/// Field separator inside a line
const FIELD_SEPARATOR: u8 = b'|';

/// Values found in a single line, indexed by [`Field`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readings {
    values: [Option<f32>; Field::COUNT],
}

impl Readings {
    /// Create an empty set of readings
    pub const fn new() -> Self {
        Self {
            values: [None; Field::COUNT],
        }
    }

    /// Value for `field`, if the line carried it
    pub fn get(&self, field: Field) -> Option<f32> {
        self.values[field.index()]
    }

    /// Record a value for `field`
    pub fn set(&mut self, field: Field, value: f32) {
        self.values[field.index()] = Some(value);
    }

    /// Whether the line carried `field`
    pub fn contains(&self, field: Field) -> bool {
        self.values[field.index()].is_some()
    }

    /// True when no known tag was found
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Number of fields found
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Iterate over the fields found, in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Field, f32)> + '_ {
        Field::ALL
            .iter()
            .filter_map(move |&field| self.get(field).map(|value| (field, value)))
    }
}

/// Parse one line against a tag table
///
/// Never fails: unknown text is skipped and bad numbers read as `0.0`. Tags
/// are matched on raw bytes, so line noise outside a `TAG:value` pair does
/// not hide the pair.
pub fn parse_line<L: AsRef<[u8]> + ?Sized>(line: &L, tags: &[Tag]) -> Readings {
    let line = line.as_ref();
    let mut readings = Readings::new();
    for tag in tags {
        if let Some(value) = field_value(line, tag.text.as_bytes()) {
            readings.set(tag.field, lenient_f32(value));
        }
    }
    readings
}

/// Bytes between `tag` and the next separator
fn field_value<'a>(line: &'a [u8], tag: &[u8]) -> Option<&'a [u8]> {
    let start = line.windows(tag.len()).position(|w| w == tag)? + tag.len();
    let rest = &line[start..];
    let end = rest
        .iter()
        .position(|&b| b == FIELD_SEPARATOR)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Parse the leading number of `text`, or `0.0`
///
/// Accepts optional leading whitespace, a sign, digits, an optional fraction
/// and an optional exponent. Anything after the numeric prefix is ignored, so
/// `"70%"` reads as `70.0`, `"1e3"` as `1000.0` and `"abc"` as `0.0`. A value
/// too large for `f32` also reads as `0.0`.
pub fn parse_lenient_f32(text: &str) -> f32 {
    lenient_f32(text.as_bytes())
}

fn lenient_f32(bytes: &[u8]) -> f32 {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let bytes = &bytes[start..];

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    end = skip_digits(bytes, end);
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(bytes, end + 1);
        let frac_digits = frac_end - (end + 1);
        if digits > 0 || frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(bytes, exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    // The prefix is pure ASCII
    core::str::from_utf8(&bytes[..end])
        .ok()
        .and_then(|number| number.parse::<f32>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Index of the first non-digit at or after `from`
fn skip_digits(bytes: &[u8], from: usize) -> usize {
    let mut end = from;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    end
}

/// Whether `line` is the host's opening handshake
pub fn is_handshake(line: &str) -> bool {
    line.trim() == HANDSHAKE
}
