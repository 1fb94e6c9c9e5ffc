//! Display backend trait
//!
//! Defines the interface for character displays.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or glyph slot
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// Character display backend
///
/// Positions are in character cells, column first. Bytes are raw display
/// character codes, so custom glyph slots and ROM symbols can be written
/// alongside ASCII.
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write character codes starting at (`col`, `row`)
    fn draw_bytes(&mut self, col: u8, row: u8, bytes: &[u8]) -> Result<(), DisplayError>;

    /// Write ASCII text starting at (`col`, `row`)
    fn draw_text(&mut self, col: u8, row: u8, text: &str) -> Result<(), DisplayError> {
        self.draw_bytes(col, row, text.as_bytes())
    }

    /// Load a 5x8 bitmap into custom character `slot`
    fn define_glyph(&mut self, slot: u8, bitmap: &[u8; 8]) -> Result<(), DisplayError>;

    /// Display size as (columns, rows)
    fn dimensions(&self) -> (u8, u8);
}
