//! Hazard classification

use crate::config::HazardThresholds;

/// Hazard category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Classification {
    /// Water well below the sensor, or no valid reading
    #[default]
    Safe,
    /// Water approaching the evacuation level
    Prepare,
    /// Water at or above the evacuation level
    Evacuate,
}

impl Classification {
    /// Short name for logs
    pub fn name(self) -> &'static str {
        match self {
            Classification::Safe => "SAFE",
            Classification::Prepare => "PREPARE",
            Classification::Evacuate => "EVACUATE",
        }
    }
}

/// Classify a median distance with the factory thresholds
pub fn classify(median_cm: i16) -> Classification {
    HazardThresholds::DEFAULT.classify(median_cm)
}

impl HazardThresholds {
    /// Classify a median distance
    ///
    /// A negative median means "no valid data" and is treated as Safe.
    pub fn classify(&self, median_cm: i16) -> Classification {
        if median_cm < 0 {
            Classification::Safe
        } else if median_cm < self.evacuate_below_cm {
            Classification::Evacuate
        } else if median_cm < self.safe_from_cm {
            Classification::Prepare
        } else {
            Classification::Safe
        }
    }
}
