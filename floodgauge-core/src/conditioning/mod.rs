//! Signal conditioning
//!
//! Turns noisy raw distances into a stable hazard category:
//!
//! ```text
//!  raw cm ─► SampleWindow (plausible only) ─► median ─► classify ─► Debouncer ─► active
//! ```
//!
//! Every raw sample advances the pipeline exactly once, even when the sample
//! itself is rejected; the median then comes from the existing history.

pub mod classify;
pub mod debounce;
pub mod window;

pub use classify::{classify, Classification};
pub use debounce::{Debouncer, DEFAULT_CONFIRM_SAMPLES};
pub use window::{SampleWindow, NO_MEDIAN, WINDOW_LEN};

use crate::config::HazardThresholds;

/// Result of conditioning one raw sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Conditioned {
    /// Median of the window after this sample, or -1 if empty
    pub median_cm: i16,
    /// Classification of that median
    pub instant: Classification,
    /// Debounced category
    pub active: Classification,
    /// The active category changed on this sample
    pub confirmed: bool,
}

/// Median filter, classifier and debouncer in one
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    thresholds: HazardThresholds,
    window: SampleWindow<WINDOW_LEN>,
    debouncer: Debouncer,
    last_median: i16,
}

impl Default for SignalConditioner {
    fn default() -> Self {
        Self::new(HazardThresholds::DEFAULT)
    }
}

impl SignalConditioner {
    pub const fn new(thresholds: HazardThresholds) -> Self {
        Self {
            thresholds,
            window: SampleWindow::with_thresholds(thresholds),
            debouncer: Debouncer::new(thresholds.confirm_samples),
            last_median: NO_MEDIAN,
        }
    }

    /// Run one raw sample through the pipeline
    pub fn process(&mut self, raw_cm: i16) -> Conditioned {
        self.window.push_raw(raw_cm);
        let median_cm = self.window.median();
        self.last_median = median_cm;

        let instant = self.thresholds.classify(median_cm);
        let confirmed = self.debouncer.observe(instant).is_some();

        Conditioned {
            median_cm,
            instant,
            active: self.debouncer.active(),
            confirmed,
        }
    }

    /// Most recent median, or -1 before the first plausible sample
    pub fn median(&self) -> i16 {
        self.last_median
    }

    pub fn active(&self) -> Classification {
        self.debouncer.active()
    }

    pub fn thresholds(&self) -> &HazardThresholds {
        &self.thresholds
    }
}
