//! Screen buffer types
//!
//! Provides a two-line character buffer for the status panel.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows on the status panel
pub const SCREEN_ROWS: usize = 2;

/// Number of character columns on the status panel
pub const SCREEN_COLS: usize = 16;

/// Maximum characters per line
pub const LINE_LEN: usize = SCREEN_COLS;

/// Status screen buffer
///
/// Every line is stored padded with spaces to the full width, so drawing a
/// line always overwrites whatever was there before. Rows are tracked
/// individually and only changed rows are sent on [`StatusScreen::flush`].
#[derive(Clone)]
pub struct StatusScreen {
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    dirty: [bool; SCREEN_ROWS],
    /// A full clear must be sent before any row
    clear_pending: bool,
}

impl Default for StatusScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusScreen {
    /// Create a new blank screen
    ///
    /// The first flush clears the display.
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| blank_line()),
            dirty: [false; SCREEN_ROWS],
            clear_pending: true,
        }
    }

    /// Blank both rows and clear the display on the next flush
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            *line = blank_line();
        }
        self.dirty = [false; SCREEN_ROWS];
        self.clear_pending = true;
    }

    /// Set the content of a specific row
    ///
    /// Text is truncated to the screen width and padded with spaces.
    /// The row is only marked dirty if its content changed.
    pub fn set_line(&mut self, row: usize, text: &str) {
        if row >= SCREEN_ROWS {
            return;
        }
        let padded = pad_line(text);
        if self.lines[row] != padded {
            self.lines[row] = padded;
            self.dirty[row] = true;
        }
    }

    /// Get the content of a specific row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Check if anything must be sent to the display
    pub fn is_dirty(&self) -> bool {
        self.clear_pending || self.dirty.iter().any(|&d| d)
    }

    /// Send pending changes to the backend
    ///
    /// On error the remaining changes stay pending and are retried by the
    /// next flush.
    pub fn flush<B: DisplayBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), DisplayError> {
        if self.clear_pending {
            backend.clear()?;
            self.clear_pending = false;
        }
        for row in 0..SCREEN_ROWS {
            if self.dirty[row] {
                backend.draw_line(row as u8, self.lines[row].as_str())?;
                self.dirty[row] = false;
            }
        }
        Ok(())
    }
}

fn blank_line() -> String<LINE_LEN> {
    pad_line("")
}

fn pad_line(text: &str) -> String<LINE_LEN> {
    let mut line = String::new();
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
    while line.push(' ').is_ok() {}
    line
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusScreen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
