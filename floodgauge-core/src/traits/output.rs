//! Local alarm outputs

use floodgauge_display::DisplayBackend;

use crate::alarm::{Lamp, ToneCommand};

/// Three-lamp hazard indicator
pub trait Indicator {
    /// Light exactly `lamp` and turn the others off
    fn show(&mut self, lamp: Lamp);
}

/// Audible alarm generator
pub trait Sounder {
    /// Start, retune or silence the tone
    ///
    /// Called every loop iteration; implementations should ignore repeats of
    /// the current command.
    fn set_tone(&mut self, tone: ToneCommand);
}

/// Everything the monitor drives on the front panel
pub trait Annunciator: Indicator + Sounder + DisplayBackend {}

impl<T: Indicator + Sounder + DisplayBackend> Annunciator for T {}
