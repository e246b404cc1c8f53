//! Local alarm outputs
//!
//! Maps the debounced hazard category onto the indicator lamps and the
//! buzzer waveform.

pub mod buzzer;

pub use buzzer::{BuzzerPattern, ToneCommand, MIN_TONE_HZ};

use crate::conditioning::Classification;

/// Indicator lamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lamp {
    Green,
    Yellow,
    Red,
}

impl Lamp {
    /// Lamp for a hazard category
    pub fn for_category(category: Classification) -> Self {
        match category {
            Classification::Safe => Lamp::Green,
            Classification::Prepare => Lamp::Yellow,
            Classification::Evacuate => Lamp::Red,
        }
    }
}

impl From<Classification> for Lamp {
    fn from(category: Classification) -> Self {
        Lamp::for_category(category)
    }
}
