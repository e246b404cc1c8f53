//! Hysteresis on the hazard category

use super::classify::Classification;

/// Factory confirmation threshold
pub const DEFAULT_CONFIRM_SAMPLES: u8 = 30;

/// Confirms a category only after an unbroken run of agreeing samples
///
/// The first sample of a new category becomes the candidate. The counter
/// then climbs by one for each further agreeing sample; once it sits at the
/// threshold, the next agreeing sample promotes the candidate. Any
/// disagreeing sample restarts the run with itself as candidate.
#[derive(Debug, Clone)]
pub struct Debouncer {
    pending: Classification,
    counter: u8,
    active: Classification,
    threshold: u8,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_SAMPLES)
    }
}

impl Debouncer {
    /// Start in Safe with an empty run
    pub const fn new(threshold: u8) -> Self {
        Self {
            pending: Classification::Safe,
            counter: 0,
            active: Classification::Safe,
            threshold,
        }
    }

    /// Feed one instantaneous classification
    ///
    /// Returns `Some(category)` when the active category changes.
    pub fn observe(&mut self, instant: Classification) -> Option<Classification> {
        if instant == self.pending {
            if self.counter < self.threshold {
                self.counter += 1;
            } else if self.active != self.pending {
                self.active = self.pending;
                return Some(self.active);
            }
        } else {
            self.pending = instant;
            self.counter = 0;
        }
        None
    }

    /// Category exposed to alarms and display
    pub fn active(&self) -> Classification {
        self.active
    }

    /// Candidate category of the current run
    pub fn pending(&self) -> Classification {
        self.pending
    }

    /// Length of the current run, not counting its first sample
    pub fn counter(&self) -> u8 {
        self.counter
    }
}
