//! In-memory character grid

use core::fmt;

use crate::backend::{DisplayBackend, DisplayError};

/// Widest supported display
pub const MAX_COLS: usize = 20;
/// Tallest supported display
pub const MAX_ROWS: usize = 4;

const BLANK: u8 = b' ';

/// Character grid of up to 20x4 cells
///
/// Painting happens here; [`Screen::flush`] then writes every row to the
/// display, so each frame fully replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    cells: [[u8; MAX_COLS]; MAX_ROWS],
    cols: u8,
    rows: u8,
}

impl Screen {
    /// Create a blank screen, clamped to 20x4
    pub fn new(cols: u8, rows: u8) -> Self {
        Self {
            cells: [[BLANK; MAX_COLS]; MAX_ROWS],
            cols: cols.min(MAX_COLS as u8),
            rows: rows.min(MAX_ROWS as u8),
        }
    }

    /// Size as (columns, rows)
    pub fn dimensions(&self) -> (u8, u8) {
        (self.cols, self.rows)
    }

    /// Change the size and blank every cell
    pub fn resize(&mut self, cols: u8, rows: u8) {
        self.cols = cols.min(MAX_COLS as u8);
        self.rows = rows.min(MAX_ROWS as u8);
        self.clear();
    }

    /// Blank every cell
    pub fn clear(&mut self) {
        self.cells = [[BLANK; MAX_COLS]; MAX_ROWS];
    }

    /// Write `bytes` at (`col`, `row`), clipped to the right edge
    ///
    /// Returns the number of cells written.
    pub fn put_bytes(&mut self, col: u8, row: u8, bytes: &[u8]) -> usize {
        if row >= self.rows || col >= self.cols {
            return 0;
        }
        let start = usize::from(col);
        let n = bytes.len().min(usize::from(self.cols) - start);
        self.cells[usize::from(row)][start..start + n].copy_from_slice(&bytes[..n]);
        n
    }

    /// Write ASCII text at (`col`, `row`), clipped to the right edge
    pub fn put_str(&mut self, col: u8, row: u8, text: &str) -> usize {
        self.put_bytes(col, row, text.as_bytes())
    }

    /// Cursor that appends to `row` from column 0
    pub fn row_writer(&mut self, row: u8) -> RowWriter<'_> {
        let width = if row < self.rows {
            usize::from(self.cols)
        } else {
            0
        };
        let index = usize::from(row).min(MAX_ROWS - 1);
        RowWriter {
            cells: &mut self.cells[index][..width],
            pos: 0,
        }
    }

    /// Visible cells of `row`
    pub fn line(&self, row: u8) -> &[u8] {
        if row >= self.rows {
            return &[];
        }
        &self.cells[usize::from(row)][..usize::from(self.cols)]
    }

    /// Every visible row, top to bottom
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.rows).map(move |row| self.line(row))
    }

    /// Write every row to the display
    pub fn flush<B: DisplayBackend>(&self, backend: &mut B) -> Result<(), DisplayError> {
        for (row, line) in self.lines().enumerate() {
            backend.draw_bytes(0, row as u8, line)?;
        }
        Ok(())
    }
}

/// Appends bytes and formatted text to one screen row
///
/// Output past the right edge is silently clipped.
pub struct RowWriter<'a> {
    cells: &'a mut [u8],
    pos: usize,
}

impl RowWriter<'_> {
    /// Append raw character codes
    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        let n = bytes.len().min(self.cells.len() - self.pos);
        self.cells[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        self.pos += n;
        self
    }

    /// Append one character code
    pub fn byte(&mut self, byte: u8) -> &mut Self {
        self.bytes(&[byte])
    }

    /// Append ASCII text
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.bytes(text.as_bytes())
    }

    /// Current column
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl fmt::Write for RowWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text(s);
        Ok(())
    }
}
