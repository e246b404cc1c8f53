//! Ranging traits

/// Ultrasonic transducer front end
pub trait Transducer {
    /// Emit the trigger pulse (about 3 µs low, then 10 µs high) and arm
    /// echo capture
    fn fire(&mut self);
}

/// Main-loop view of the ranging engine
pub trait RangingPort {
    /// Request a measurement; no-op while one is in flight
    fn start(&mut self);

    /// A measurement finished or timed out
    fn is_done(&self) -> bool;

    /// Consume the result: distance in cm, or -1 on timeout
    ///
    /// `None` if no result is waiting.
    fn take(&mut self) -> Option<i16>;
}
