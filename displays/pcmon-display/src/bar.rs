//! Horizontal bar graphs built from custom glyph cells
//!
//! Two styles are used:
//! - whole cells only, scaled against an arbitrary full-scale value
//! - whole cells plus an optional half cell, for percentages

use crate::glyphs::{HALF, SOLID};

/// Percent full scale
const PERCENT: f32 = 100.0;

/// How much of a bar is lit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BarFill {
    /// Fully lit cells
    pub full: u8,
    /// Whether a half cell follows the full ones
    pub half: bool,
}

impl BarFill {
    /// Cells drawn with any glyph
    pub fn lit(&self) -> u8 {
        self.full + u8::from(self.half)
    }
}

/// Bar geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProgressBar {
    /// Width in character cells
    pub cells: u8,
    /// Value that lights every cell
    pub full_scale: f32,
    /// Whether to draw a trailing half cell
    pub half_cells: bool,
}

impl ProgressBar {
    /// Whole-cell bar where `full_scale` lights every cell
    pub const fn whole(cells: u8, full_scale: f32) -> Self {
        Self {
            cells,
            full_scale,
            half_cells: false,
        }
    }

    /// Percentage bar with half-cell resolution
    pub const fn percent(cells: u8) -> Self {
        Self {
            cells,
            full_scale: PERCENT,
            half_cells: true,
        }
    }

    /// Compute the lit portion for `value`
    ///
    /// Negative and NaN values light nothing; values past full scale light
    /// every cell.
    pub fn fill(&self, value: f32) -> BarFill {
        if self.half_cells {
            self.fill_tenths(value)
        } else {
            self.fill_whole(value)
        }
    }

    /// `floor(value * cells / full_scale)`, clamped to the bar
    fn fill_whole(&self, value: f32) -> BarFill {
        let scaled = value * f32::from(self.cells) / self.full_scale;
        // Float-to-int casts saturate, and NaN becomes 0
        let full = (scaled as u32).min(u32::from(self.cells)) as u8;
        BarFill { full, half: false }
    }

    /// Fixed-point tenths of a cell: half glyph when the remainder is >= 0.5
    fn fill_tenths(&self, value: f32) -> BarFill {
        let tenths = (value * f32::from(self.cells) * 10.0 / self.full_scale) as u32;
        let full = tenths / 10;
        if full >= u32::from(self.cells) {
            return BarFill {
                full: self.cells,
                half: false,
            };
        }
        BarFill {
            full: full as u8,
            half: tenths % 10 >= 5,
        }
    }

    /// Draw the bar for `value` into `out`, padding with spaces
    ///
    /// Writes `min(out.len(), cells)` character codes.
    pub fn draw(&self, value: f32, out: &mut [u8]) -> usize {
        let fill = self.fill(value);
        let width = out.len().min(usize::from(self.cells));
        for (i, cell) in out[..width].iter_mut().enumerate() {
            *cell = if i < usize::from(fill.full) {
                SOLID.code()
            } else if fill.half && i == usize::from(fill.full) {
                HALF.code()
            } else {
                b' '
            };
        }
        width
    }
}
