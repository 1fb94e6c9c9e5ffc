//! Character LCD rendering for pcmon
//!
//! This crate provides:
//! - `DisplayBackend` trait for character displays addressed by (column, row)
//! - `Screen` character grid that is painted in memory and flushed whole
//! - The custom glyph table (solid and half bar cells)
//! - Status glyph and progress bar helpers
//! - `Renderer` that paints a telemetry snapshot for either display variant
//!
//! # Architecture
//!
//! The renderer never talks to hardware. It fills a `Screen`, and the
//! firmware flushes that screen to whatever implements `DisplayBackend`
//! (an HD44780 behind an I2C backpack on the real board, a recording mock in
//! tests).

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod bar;
pub mod glyphs;
pub mod renderer;
pub mod screen;
pub mod status;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use bar::{BarFill, ProgressBar};
pub use glyphs::{upload_glyphs, Glyph, DEGREE, GLYPHS, HALF, SOLID};
pub use renderer::Renderer;
pub use screen::{RowWriter, Screen, MAX_COLS, MAX_ROWS};
pub use status::StatusLevel;
