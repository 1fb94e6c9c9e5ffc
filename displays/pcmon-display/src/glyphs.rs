//! Custom glyph table
//!
//! HD44780-style controllers hold up to eight user-defined 5x8 characters.
//! The bitmaps live here as named constants and are uploaded once at boot.

use crate::backend::{DisplayBackend, DisplayError};

/// Degree sign in the HD44780 A00 character ROM
pub const DEGREE: u8 = 0xDF;

/// Number of user-definable character slots
pub const GLYPH_SLOTS: u8 = 8;

/// A named 5x8 bitmap bound to a character slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph {
    pub name: &'static str,
    /// Slot index, which is also the character code to print it
    pub slot: u8,
    /// One byte per pixel row, low five bits used
    pub bitmap: [u8; 8],
}

impl Glyph {
    /// Character code that prints this glyph
    pub const fn code(&self) -> u8 {
        self.slot
    }
}

/// Fully lit cell
pub const SOLID: Glyph = Glyph {
    name: "solid",
    slot: 0,
    bitmap: [0b11111; 8],
};

/// Left half of a cell
pub const HALF: Glyph = Glyph {
    name: "half",
    slot: 1,
    bitmap: [0b11100; 8],
};

/// Every custom glyph the firmware uses
pub const GLYPHS: &[Glyph] = &[SOLID, HALF];

/// Find a glyph by name
pub fn glyph_by_name(name: &str) -> Option<&'static Glyph> {
    GLYPHS.iter().find(|g| g.name == name)
}

/// Load the whole glyph table into the display
pub fn upload_glyphs<B: DisplayBackend>(backend: &mut B) -> Result<(), DisplayError> {
    for glyph in GLYPHS {
        backend.define_glyph(glyph.slot, &glyph.bitmap)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_unique_and_valid() {
        for (i, a) in GLYPHS.iter().enumerate() {
            assert!(a.slot < GLYPH_SLOTS);
            for b in &GLYPHS[i + 1..] {
                assert_ne!(a.slot, b.slot);
            }
        }
    }

    #[test]
    fn test_bitmaps_fit_five_columns() {
        for glyph in GLYPHS {
            assert!(glyph.bitmap.iter().all(|row| row & !0b11111 == 0));
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(glyph_by_name("half"), Some(&HALF));
        assert_eq!(glyph_by_name("arrow"), None);
    }
}
