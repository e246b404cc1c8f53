//! Status screen text

use core::fmt::Write;

use floodgauge_display::LINE_LEN;
use heapless::String;

use crate::conditioning::Classification;

/// Shown while the modem associates
pub const CONNECTING_TEXT: &str = "Connecting WiFi";
/// Shown once when the modem first becomes ready
pub const READY_TEXT: &str = "System Ready";
/// Second line while an upload is in progress
pub const UPLOADING_TEXT: &str = ">> UPLOADING >>";

/// One display line
pub type StatusLine = String<LINE_LEN>;

/// First line: the filtered water distance
pub fn level_line(median_cm: i16) -> StatusLine {
    let mut line = StatusLine::new();
    // "Level: 32767 cm" is 15 columns, so neither write can overflow
    if median_cm < 0 {
        let _ = line.push_str("Level: --- cm");
    } else {
        let _ = write!(line, "Level: {} cm", median_cm);
    }
    line
}

/// Second line label for a hazard category, centred on 16 columns
pub fn category_label(category: Classification) -> &'static str {
    match category {
        Classification::Safe => "      SAFE      ",
        Classification::Prepare => "     PREPARE    ",
        Classification::Evacuate => "    EVACUATE    ",
    }
}

/// Second line: upload activity or the active category
pub fn status_line(category: Classification, uploading: bool) -> &'static str {
    if uploading {
        UPLOADING_TEXT
    } else {
        category_label(category)
    }
}
