//! Front panel: lamps, buzzer and LCD as one annunciator

use floodgauge_core::alarm::{Lamp, ToneCommand};
use floodgauge_core::traits::{Indicator, Sounder};
use floodgauge_display::{DisplayBackend, DisplayError};

/// Bundles the three front-panel outputs the monitor drives
pub struct FrontPanel<I, S, D> {
    lamps: I,
    buzzer: S,
    lcd: D,
}

impl<I, S, D> FrontPanel<I, S, D> {
    pub fn new(lamps: I, buzzer: S, lcd: D) -> Self {
        Self { lamps, buzzer, lcd }
    }
}

impl<I: Indicator, S, D> Indicator for FrontPanel<I, S, D> {
    fn show(&mut self, lamp: Lamp) {
        self.lamps.show(lamp);
    }
}

impl<I, S: Sounder, D> Sounder for FrontPanel<I, S, D> {
    fn set_tone(&mut self, tone: ToneCommand) {
        self.buzzer.set_tone(tone);
    }
}

impl<I, S, D: DisplayBackend> DisplayBackend for FrontPanel<I, S, D> {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.lcd.clear()
    }

    fn draw_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        self.lcd.draw_line(row, text)
    }

    fn dimensions(&self) -> (u8, u8) {
        self.lcd.dimensions()
    }
}
