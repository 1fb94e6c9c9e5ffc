//! Telemetry screens for both display variants
//!
//! Every call repaints the whole [`Screen`] from the view it is given, so
//! rendering the same view and frame twice produces the same grid.

use core::fmt::Write;

use pcmon_core::{TelemetrySample, TelemetryView, Variant};

use crate::bar::ProgressBar;
use crate::glyphs::DEGREE;
use crate::screen::{RowWriter, Screen};
use crate::status::StatusLevel;

/// Title on the boot screen and the extended waiting screen
pub const TITLE: &str = "PC Monitor";

/// Compact temperature bar saturates at 90 °C
const COMPACT_TEMP_BAR: ProgressBar = ProgressBar::whole(5, 90.0);
const COMPACT_LOAD_BAR: ProgressBar = ProgressBar::whole(5, 100.0);
const RAM_BAR: ProgressBar = ProgressBar::percent(10);
const LOAD_BAR: ProgressBar = ProgressBar::percent(8);

/// Waiting animation cycles through this many dot counts
const DOT_FRAMES: u32 = 4;

/// Paints telemetry views into a character grid
#[derive(Debug, Clone)]
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    pub fn new(variant: Variant) -> Self {
        let (cols, rows) = variant.grid();
        Self {
            screen: Screen::new(cols, rows),
        }
    }

    /// Last painted grid
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Paint the boot banner: title, then version and variant
    pub fn render_boot(&mut self, variant: Variant, version: &str) -> &Screen {
        let (cols, rows) = variant.grid();
        self.screen.resize(cols, rows);

        self.screen.row_writer(0).text(TITLE);
        let mut w = self.screen.row_writer(1);
        let _ = write!(w, "v{} {}", version, variant.name());
        &self.screen
    }

    /// Paint `view`; `frame` drives the waiting animation
    pub fn render(&mut self, view: &TelemetryView, frame: u32) -> &Screen {
        let (cols, rows) = view.variant.grid();
        self.screen.resize(cols, rows);

        let connected = view.link.is_connected();
        let elapsed_s = view.link.elapsed_ms(view.now_ms).map(|ms| ms / 1000);

        match (view.variant, connected) {
            (Variant::Compact, true) => self.compact(&view.sample),
            (Variant::Compact, false) => self.compact_waiting(frame, elapsed_s),
            (Variant::Extended, true) => self.extended(&view.sample),
            (Variant::Extended, false) => self.extended_waiting(frame, elapsed_s),
        }
        &self.screen
    }

    fn compact(&mut self, sample: &TelemetrySample) {
        let mut w = self.screen.row_writer(0);
        w.byte(b'T');
        temperature(&mut w, sample.cpu_temp);
        w.byte(b' ').byte(status(sample.cpu_temp)).byte(b' ');
        bar(&mut w, COMPACT_TEMP_BAR, sample.cpu_temp);

        let mut w = self.screen.row_writer(1);
        w.byte(b'L');
        let _ = write!(w, "{:>5}% ", percent(sample.cpu_load));
        w.byte(b' ').byte(status(sample.cpu_load)).byte(b' ');
        bar(&mut w, COMPACT_LOAD_BAR, sample.cpu_load);
    }

    fn compact_waiting(&mut self, frame: u32, elapsed_s: Option<u64>) {
        let mut w = self.screen.row_writer(0);
        w.text("Waiting");
        dots(&mut w, frame);

        if let Some(secs) = elapsed_s {
            let mut w = self.screen.row_writer(1);
            let _ = write!(w, "Last data {}s", secs);
        }
    }

    fn extended(&mut self, sample: &TelemetrySample) {
        let mut w = self.screen.row_writer(0);
        processor(&mut w, "CPU", sample.cpu_temp, sample.cpu_load);

        let mut w = self.screen.row_writer(1);
        processor(&mut w, "GPU", sample.gpu_temp, sample.gpu_load);

        let mut w = self.screen.row_writer(2);
        let _ = write!(w, "RAM{:>3}% ", percent(sample.ram_usage));
        w.byte(status(sample.ram_usage)).byte(b' ');
        bar(&mut w, RAM_BAR, sample.ram_usage);

        let mut w = self.screen.row_writer(3);
        w.byte(b'C');
        bar(&mut w, LOAD_BAR, sample.cpu_load);
        w.text(" G");
        bar(&mut w, LOAD_BAR, sample.gpu_load);
    }

    fn extended_waiting(&mut self, frame: u32, elapsed_s: Option<u64>) {
        self.screen.row_writer(0).text(TITLE);

        let mut w = self.screen.row_writer(1);
        w.text("Waiting for data");
        dots(&mut w, frame);

        if let Some(secs) = elapsed_s {
            let mut w = self.screen.row_writer(3);
            let _ = write!(w, "No data for {}s", secs);
        }
    }
}

/// Percentages are shown truncated toward zero
fn percent(value: f32) -> i32 {
    value as i32
}

fn status(value: f32) -> u8 {
    StatusLevel::from_value(value).glyph()
}

/// `{:>5.1}` followed by the degree sign and `C`
fn temperature(w: &mut RowWriter<'_>, value: f32) {
    let _ = write!(w, "{:>5.1}", value);
    w.byte(DEGREE).byte(b'C');
}

/// One extended row: label, temperature, status, load, status
fn processor(w: &mut RowWriter<'_>, label: &str, temp: f32, load: f32) {
    w.text(label);
    temperature(w, temp);
    w.byte(b' ').byte(status(temp)).byte(b' ');
    let _ = write!(w, "{:>3}% ", percent(load));
    w.byte(status(load));
}

fn bar(w: &mut RowWriter<'_>, bar: ProgressBar, value: f32) {
    let mut cells = [b' '; crate::screen::MAX_COLS];
    let n = bar.draw(value, &mut cells);
    w.bytes(&cells[..n]);
}

/// `frame % 4` dots padded to three cells
fn dots(w: &mut RowWriter<'_>, frame: u32) {
    let count = (frame % DOT_FRAMES) as usize;
    let mut cells = [b' '; DOT_FRAMES as usize - 1];
    cells[..count].fill(b'.');
    w.bytes(&cells);
}
