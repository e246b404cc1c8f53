//! Buzzer waveform patterns

use crate::conditioning::Classification;

/// Lowest frequency the tone generator will produce
pub const MIN_TONE_HZ: u16 = 100;

/// Prepare beep pitch
pub const BEEP_HZ: u16 = 1_200;
/// Prepare beep on time, followed by the same off time
pub const BEEP_HALF_PERIOD_MS: u32 = 200;

/// Siren sweep limits
pub const SIREN_MIN_HZ: u16 = 600;
pub const SIREN_MAX_HZ: u16 = 1_800;
/// One full up-and-down sweep
pub const SIREN_PERIOD_MS: u32 = 2_000;

/// Buzzer output for one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneCommand {
    Silent,
    /// Square wave at this frequency (Hz)
    Tone(u16),
}

impl ToneCommand {
    /// Tone with the frequency clamped to [`MIN_TONE_HZ`]
    pub fn tone(hz: u16) -> Self {
        ToneCommand::Tone(hz.max(MIN_TONE_HZ))
    }
}

/// Time-driven buzzer pattern per hazard category
///
/// The pattern restarts from its beginning whenever the category changes.
#[derive(Debug, Clone, Default)]
pub struct BuzzerPattern {
    /// Category being sounded and when it started
    current: Option<(Classification, u32)>,
}

impl BuzzerPattern {
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Compute the buzzer output for `category` at `now_ms`
    pub fn update(&mut self, category: Classification, now_ms: u32) -> ToneCommand {
        let started = match self.current {
            Some((active, started)) if active == category => started,
            _ => {
                self.current = Some((category, now_ms));
                now_ms
            }
        };
        let elapsed = now_ms.wrapping_sub(started);

        match category {
            Classification::Safe => ToneCommand::Silent,
            Classification::Prepare => {
                if elapsed % (2 * BEEP_HALF_PERIOD_MS) < BEEP_HALF_PERIOD_MS {
                    ToneCommand::tone(BEEP_HZ)
                } else {
                    ToneCommand::Silent
                }
            }
            Classification::Evacuate => ToneCommand::tone(siren_hz(elapsed)),
        }
    }
}

/// Triangle sweep from the minimum to the maximum and back
fn siren_hz(elapsed_ms: u32) -> u16 {
    let half = SIREN_PERIOD_MS / 2;
    let t = elapsed_ms % SIREN_PERIOD_MS;
    let tri = if t < half { t } else { SIREN_PERIOD_MS - t };
    let span = u32::from(SIREN_MAX_HZ - SIREN_MIN_HZ);
    SIREN_MIN_HZ + (span * tri / half) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_is_silent() {
        let mut pattern = BuzzerPattern::new();
        assert_eq!(pattern.update(Classification::Safe, 0), ToneCommand::Silent);
        assert_eq!(pattern.update(Classification::Safe, 12_345), ToneCommand::Silent);
    }

    #[test]
    fn test_siren_sweep() {
        let mut pattern = BuzzerPattern::new();
        let start: u32 = 7_000;
        let at = |p: &mut BuzzerPattern, ms: u32| p.update(Classification::Evacuate, start + ms);
        assert_eq!(at(&mut pattern, 0), ToneCommand::Tone(600));
        assert_eq!(at(&mut pattern, 500), ToneCommand::Tone(1_200));
        assert_eq!(at(&mut pattern, 1_000), ToneCommand::Tone(1_800));
        assert_eq!(at(&mut pattern, 1_500), ToneCommand::Tone(1_200));
        assert_eq!(at(&mut pattern, 2_000), ToneCommand::Tone(600));
    }

    #[test]
    fn test_prepare_beep() {
        let mut pattern = BuzzerPattern::new();
        assert_eq!(pattern.update(Classification::Prepare, 0), ToneCommand::Tone(1_200));
        assert_eq!(pattern.update(Classification::Prepare, 199), ToneCommand::Tone(1_200));
        assert_eq!(pattern.update(Classification::Prepare, 200), ToneCommand::Silent);
        assert_eq!(pattern.update(Classification::Prepare, 399), ToneCommand::Silent);
        assert_eq!(pattern.update(Classification::Prepare, 400), ToneCommand::Tone(1_200));
    }

    #[test]
    fn test_pattern_restarts_on_category_change() {
        let mut pattern = BuzzerPattern::new();
        pattern.update(Classification::Evacuate, 0);
        assert_eq!(pattern.update(Classification::Evacuate, 1_000), ToneCommand::Tone(1_800));

        // Prepare starts at its "on" phase even though time has moved on
        assert_eq!(pattern.update(Classification::Prepare, 1_300), ToneCommand::Tone(1_200));
        assert_eq!(pattern.update(Classification::Prepare, 1_500), ToneCommand::Silent);

        // Back to Evacuate: sweep starts from the bottom
        assert_eq!(pattern.update(Classification::Evacuate, 1_600), ToneCommand::Tone(600));
    }

    #[test]
    fn test_tone_clamped() {
        assert_eq!(ToneCommand::tone(40), ToneCommand::Tone(MIN_TONE_HZ));
        assert_eq!(ToneCommand::tone(440), ToneCommand::Tone(440));
    }

    #[test]
    fn test_pattern_survives_clock_wrap() {
        let mut pattern = BuzzerPattern::new();
        let start = u32::MAX - 99;
        pattern.update(Classification::Evacuate, start);
        assert_eq!(
            pattern.update(Classification::Evacuate, start.wrapping_add(500)),
            ToneCommand::Tone(1_200)
        );
    }
}
