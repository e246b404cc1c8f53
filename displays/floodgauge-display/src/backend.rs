//! Display backend trait
//!
//! Defines the interface for character displays.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Row outside the display
    InvalidCoordinates,
}

/// Display backend trait
///
/// Provides a hardware-agnostic interface for rendering to character
/// displays. Implementations handle the bus and controller specifics.
pub trait DisplayBackend {
    /// Clear the entire display and home the cursor
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw a full line of text starting at column 0 of `row`
    ///
    /// Text longer than the display width is truncated by the backend.
    fn draw_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError>;

    /// Get the display dimensions
    ///
    /// Returns (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);
}
