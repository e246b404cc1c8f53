//! Rolling median over the most recent plausible samples

use heapless::HistoryBuffer;

use crate::config::HazardThresholds;

/// Number of samples in the median window
pub const WINDOW_LEN: usize = 9;

/// Median value reported before any plausible sample arrives
pub const NO_MEDIAN: i16 = -1;

/// Ring of plausible raw distances
#[derive(Debug, Clone)]
pub struct SampleWindow<const N: usize> {
    samples: HistoryBuffer<i16, N>,
    thresholds: HazardThresholds,
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SampleWindow<N> {
    /// Create an empty window with the factory plausible range
    pub const fn new() -> Self {
        Self::with_thresholds(HazardThresholds::DEFAULT)
    }

    /// Create an empty window gated by `thresholds`
    pub const fn with_thresholds(thresholds: HazardThresholds) -> Self {
        Self {
            samples: HistoryBuffer::new(),
            thresholds,
        }
    }

    /// Record a raw sample
    ///
    /// Implausible values, timeouts included, are dropped. Once full, the
    /// oldest sample is overwritten. Returns whether the sample was kept.
    pub fn push_raw(&mut self, cm: i16) -> bool {
        if N == 0 || !self.thresholds.is_plausible(cm) {
            return false;
        }
        self.samples.write(cm);
        true
    }

    /// Median of the stored samples
    ///
    /// For an even count this is the upper of the two middle values.
    /// Returns [`NO_MEDIAN`] when empty.
    pub fn median(&self) -> i16 {
        let count = self.samples.len();
        if count == 0 {
            return NO_MEDIAN;
        }
        // Storage order is irrelevant once sorted
        let mut sorted = [0i16; N];
        sorted[..count].copy_from_slice(self.samples.as_slice());
        let sorted = &mut sorted[..count];
        sorted.sort_unstable();
        sorted[count / 2]
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == N
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_of_full_window() {
        let mut window = SampleWindow::<WINDOW_LEN>::new();
        for cm in [25, 26, 24, 25, 27, 26, 25, 24, 26] {
            assert!(window.push_raw(cm));
        }
        assert!(window.is_full());
        assert_eq!(window.median(), 25);
    }

    #[test]
    fn test_empty_window_after_rejected_samples() {
        let mut window = SampleWindow::<WINDOW_LEN>::new();
        assert!(!window.push_raw(0));
        assert!(!window.push_raw(450));
        assert!(!window.push_raw(-1));
        assert!(window.is_empty());
        assert_eq!(window.median(), NO_MEDIAN);
    }

    #[test]
    fn test_even_count_takes_upper_middle() {
        let mut window = SampleWindow::<WINDOW_LEN>::new();
        window.push_raw(10);
        window.push_raw(40);
        assert_eq!(window.median(), 40);

        window.push_raw(20);
        window.push_raw(30);
        assert_eq!(window.median(), 30);
    }

    #[test]
    fn test_oldest_sample_overwritten() {
        let mut window = SampleWindow::<3>::new();
        window.push_raw(100);
        window.push_raw(100);
        window.push_raw(100);
        assert_eq!(window.median(), 100);

        window.push_raw(5);
        window.push_raw(5);
        assert_eq!(window.len(), 3);
        assert_eq!(window.median(), 5);
    }

    #[test]
    fn test_boundaries_and_custom_limit() {
        let mut window = SampleWindow::<WINDOW_LEN>::new();
        assert!(window.push_raw(1));
        assert!(window.push_raw(400));
        assert!(!window.push_raw(401));

        let mut short = SampleWindow::<WINDOW_LEN>::with_thresholds(HazardThresholds {
            max_plausible_cm: 200,
            ..HazardThresholds::DEFAULT
        });
        assert!(!short.push_raw(201));
        assert!(short.push_raw(200));
    }

    #[test]
    fn test_saturates_at_capacity() {
        let mut window = SampleWindow::<WINDOW_LEN>::new();
        for cm in 1..=20 {
            window.push_raw(cm);
            assert_eq!(window.len(), (cm as usize).min(WINDOW_LEN));
        }
        // Only 12..=20 remain
        assert_eq!(window.median(), 16);
    }

    #[test]
    fn test_clear() {
        let mut window = SampleWindow::<WINDOW_LEN>::new();
        window.push_raw(50);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.median(), NO_MEDIAN);
    }
}
