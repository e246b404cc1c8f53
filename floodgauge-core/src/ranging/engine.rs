//! Echo-timing state machine
//!
//! Pure logic: the interrupt handler feeds it capture ticks and timeouts and
//! applies the returned [`CaptureAction`] to the capture hardware.

/// Capture timer rate
pub const TICK_HZ: u32 = 2_000_000;

/// Ticks per centimetre of range: 58 µs round trip per cm at 2 ticks per µs
pub const TICKS_PER_CM: u16 = 116;

/// Give up on an echo after 30 ms
pub const TIMEOUT_TICKS: u16 = 60_000;

/// Distance reported for a missed echo
pub const NO_ECHO: i16 = -1;

/// Ranging engine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangingState {
    /// No measurement in flight
    Idle,
    /// Trigger sent, waiting for the echo to start
    WaitRise,
    /// Echo started, waiting for it to end
    WaitFall,
    /// Echo measured; result waiting to be taken
    Done,
    /// No complete echo within the timeout
    TimedOut,
}

impl RangingState {
    /// A measurement is in flight
    pub fn is_busy(self) -> bool {
        matches!(self, RangingState::WaitRise | RangingState::WaitFall)
    }

    /// A result is waiting to be taken
    pub fn is_terminal(self) -> bool {
        matches!(self, RangingState::Done | RangingState::TimedOut)
    }
}

/// What the capture hardware must do after an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureAction {
    /// Switch to capturing the falling edge
    AwaitFallingEdge,
    /// Measurement finished; disable capture and timeout sources
    Disarm,
    /// Spurious capture outside a measurement
    Ignore,
}

/// One distance measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeReading {
    /// Tick of the rising echo edge
    pub rise_tick: u16,
    /// Tick of the falling echo edge
    pub fall_tick: u16,
    /// Distance in cm, or [`NO_ECHO`]
    pub distance_cm: i16,
}

impl RangeReading {
    const EMPTY: Self = Self {
        rise_tick: 0,
        fall_tick: 0,
        distance_cm: NO_ECHO,
    };
}

/// Convert an echo pulse into centimetres
///
/// The subtraction wraps, so a pulse that straddles the 16-bit counter
/// overflow still measures correctly.
pub fn distance_from_ticks(rise: u16, fall: u16) -> i16 {
    // u16::MAX / 116 = 564, always fits
    (fall.wrapping_sub(rise) / TICKS_PER_CM) as i16
}

/// Ultrasonic ranging state machine
#[derive(Debug, Clone)]
pub struct RangingEngine {
    state: RangingState,
    reading: RangeReading,
}

impl Default for RangingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RangingEngine {
    pub const fn new() -> Self {
        Self {
            state: RangingState::Idle,
            reading: RangeReading::EMPTY,
        }
    }

    /// Begin a measurement
    ///
    /// Returns `false` without touching anything if a measurement is already
    /// in flight. The caller fires the trigger pulse only on `true`.
    pub fn arm(&mut self) -> bool {
        if self.state.is_busy() {
            return false;
        }
        self.reading = RangeReading::EMPTY;
        self.state = RangingState::WaitRise;
        true
    }

    /// Handle an edge capture
    pub fn on_capture(&mut self, tick: u16) -> CaptureAction {
        match self.state {
            RangingState::WaitRise => {
                self.reading.rise_tick = tick;
                self.state = RangingState::WaitFall;
                CaptureAction::AwaitFallingEdge
            }
            RangingState::WaitFall => {
                self.reading.fall_tick = tick;
                self.reading.distance_cm = distance_from_ticks(self.reading.rise_tick, tick);
                self.state = RangingState::Done;
                CaptureAction::Disarm
            }
            _ => CaptureAction::Ignore,
        }
    }

    /// Handle the compare-match timeout
    ///
    /// Only effective while a measurement is in flight.
    pub fn on_timeout(&mut self) {
        if self.state.is_busy() {
            self.reading.distance_cm = NO_ECHO;
            self.state = RangingState::TimedOut;
        }
    }

    pub fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    /// Consume the result and return to `Idle`
    ///
    /// `None` if no result is waiting.
    pub fn take(&mut self) -> Option<i16> {
        if !self.is_done() {
            return None;
        }
        let distance = self.reading.distance_cm;
        self.state = RangingState::Idle;
        Some(distance)
    }

    pub fn state(&self) -> RangingState {
        self.state
    }

    /// Last reading, including raw ticks
    pub fn reading(&self) -> RangeReading {
        self.reading
    }
}
