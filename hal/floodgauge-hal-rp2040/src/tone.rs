//! PWM square-wave tone generator for a passive buzzer

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use fixed::FixedU16;
use floodgauge_core::alarm::{ToneCommand, MIN_TONE_HZ};
use floodgauge_core::traits::Sounder;

/// PWM clock divider; 125 MHz / 64 keeps 100 Hz within a 16-bit period
const DIVIDER: u16 = 64;

/// Buzzer on PWM channel B
pub struct PwmTone<'d> {
    pwm: Pwm<'d>,
    config: Config,
    current: ToneCommand,
}

impl<'d> PwmTone<'d> {
    /// Take a PWM slice whose channel B drives the buzzer; starts silent
    pub fn new(pwm: Pwm<'d>) -> Self {
        let mut config = Config::default();
        config.divider = FixedU16::from_num(DIVIDER);
        config.compare_b = 0;
        let mut tone = Self {
            pwm,
            config,
            current: ToneCommand::Silent,
        };
        tone.apply();
        tone
    }

    fn apply(&mut self) {
        match self.current {
            ToneCommand::Silent => {
                self.config.compare_b = 0;
            }
            ToneCommand::Tone(hz) => {
                let counter_hz = clk_sys_freq() / u32::from(DIVIDER);
                let hz = u32::from(hz.max(MIN_TONE_HZ));
                let top = (counter_hz / hz).saturating_sub(1).clamp(1, u32::from(u16::MAX)) as u16;
                self.config.top = top;
                // 50% duty
                self.config.compare_b = top / 2;
            }
        }
        self.pwm.set_config(&self.config);
    }
}

impl Sounder for PwmTone<'_> {
    fn set_tone(&mut self, tone: ToneCommand) {
        if tone != self.current {
            self.current = tone;
            self.apply();
        }
    }
}
