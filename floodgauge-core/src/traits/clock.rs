//! Monotonic time source

/// Free-running millisecond counter
///
/// The value wraps after about 49.7 days. All consumers compare times with
/// wrapping arithmetic.
pub trait Clock {
    /// Milliseconds since boot, truncated to 32 bits
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
