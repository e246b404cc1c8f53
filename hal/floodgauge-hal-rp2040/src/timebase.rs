//! Time sources backed by the RP2040 system timer
//!
//! The embassy time driver owns the 1 MHz TIMER peripheral and its alarm
//! interrupt. Both sources here read that counter.

use embassy_time::Instant;
use floodgauge_core::traits::Clock;

/// Millisecond clock for the scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the wrapping 32-bit counter the scheduler expects
        Instant::now().as_millis() as u32
    }
}

/// Current time as a 16-bit tick at 2 MHz
///
/// The ranging engine works in 2 MHz ticks; the system timer runs at 1 MHz,
/// so each microsecond counts as two ticks.
pub fn capture_ticks() -> u16 {
    Instant::now().as_micros().wrapping_mul(2) as u16
}
