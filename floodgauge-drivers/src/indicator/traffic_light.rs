//! Red/yellow/green lamp driver
//!
//! Each lamp is an LED on its own active-high GPIO output.

use floodgauge_core::alarm::Lamp;
use floodgauge_core::traits::Indicator;
use floodgauge_hal::OutputPin;

/// Three-lamp indicator
pub struct TrafficLight<P> {
    red: P,
    yellow: P,
    green: P,
    lit: Option<Lamp>,
}

impl<P: OutputPin> TrafficLight<P> {
    /// Create the indicator with all lamps off
    pub fn new(red: P, yellow: P, green: P) -> Self {
        let mut light = Self {
            red,
            yellow,
            green,
            lit: None,
        };
        light.all_off();
        light
    }

    /// Turn every lamp off
    pub fn all_off(&mut self) {
        self.red.set_low();
        self.yellow.set_low();
        self.green.set_low();
        self.lit = None;
    }

    /// Lamp currently lit
    pub fn lit(&self) -> Option<Lamp> {
        self.lit
    }
}

impl<P: OutputPin> Indicator for TrafficLight<P> {
    fn show(&mut self, lamp: Lamp) {
        self.red.set_state(lamp == Lamp::Red);
        self.yellow.set_state(lamp == Lamp::Yellow);
        self.green.set_state(lamp == Lamp::Green);
        self.lit = Some(lamp);
    }
}
