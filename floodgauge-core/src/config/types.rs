//! Configuration type definitions
//!
//! These types represent the station configuration. They are plain `Copy`
//! data so the firmware can hold them in a `const`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Evacuate threshold must be positive and below the safe threshold
    ThresholdOrder,
    /// Plausible maximum must be at least the safe threshold
    PlausibleRange,
    /// A periodic task has a zero period
    ZeroPeriod,
}

/// Hazard classification thresholds
///
/// Distances are from the sensor down to the water surface, so a smaller
/// value means higher water.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HazardThresholds {
    /// Medians below this are Evacuate (cm)
    pub evacuate_below_cm: i16,
    /// Medians at or above this are Safe; between the two is Prepare (cm)
    pub safe_from_cm: i16,
    /// Raw samples above this are discarded as implausible (cm)
    pub max_plausible_cm: i16,
    /// Consecutive agreeing samples needed before the alarm state changes
    pub confirm_samples: u8,
}

impl HazardThresholds {
    /// Factory thresholds
    pub const DEFAULT: Self = Self {
        evacuate_below_cm: 30,
        safe_from_cm: 34,
        max_plausible_cm: 400,
        confirm_samples: 30,
    };

    /// Check the thresholds for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evacuate_below_cm <= 0 || self.safe_from_cm <= self.evacuate_below_cm {
            return Err(ConfigError::ThresholdOrder);
        }
        if self.max_plausible_cm < self.safe_from_cm {
            return Err(ConfigError::PlausibleRange);
        }
        Ok(())
    }

    /// Check if a raw sample is within the plausible sensor range
    pub fn is_plausible(&self, cm: i16) -> bool {
        cm > 0 && cm <= self.max_plausible_cm
    }
}

impl Default for HazardThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Periodic task cadences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScheduleConfig {
    /// Interval between ranging requests (ms)
    pub measure_period_ms: u32,
    /// Minimum interval between accepted uploads (ms)
    pub upload_interval_ms: u32,
    /// Status screen refresh interval (ms)
    pub display_refresh_ms: u32,
    /// How long "System Ready" stays on screen (ms)
    pub ready_banner_ms: u32,
}

impl ScheduleConfig {
    /// Factory cadences
    pub const DEFAULT: Self = Self {
        measure_period_ms: 50,
        upload_interval_ms: 20_000,
        display_refresh_ms: 300,
        ready_banner_ms: 1_000,
    };

    /// Check that every periodic task actually runs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.measure_period_ms == 0 || self.upload_interval_ms == 0 || self.display_refresh_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    pub thresholds: HazardThresholds,
    pub schedule: ScheduleConfig,
}

impl MonitorConfig {
    /// Factory configuration
    pub const DEFAULT: Self = Self {
        thresholds: HazardThresholds::DEFAULT,
        schedule: ScheduleConfig::DEFAULT,
    };

    /// Validate the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        self.schedule.validate()
    }
}
