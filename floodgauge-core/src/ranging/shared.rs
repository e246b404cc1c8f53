//! Interrupt-shared ranging state

use core::cell::RefCell;

use critical_section::Mutex;

use super::engine::{CaptureAction, RangingEngine, RangingState};
use crate::traits::{RangingPort, Transducer};

/// Ranging engine shared between the capture interrupt and the main loop
///
/// Every access runs inside a critical section, so the loop always sees a
/// consistent snapshot of state and distance. Intended to live in a
/// `static`.
pub struct SharedRanging {
    inner: Mutex<RefCell<RangingEngine>>,
}

impl Default for SharedRanging {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedRanging {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(RangingEngine::new())),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<R>(&self, f: impl FnOnce(&mut RangingEngine) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.inner.borrow_ref_mut(cs)))
    }

    pub fn arm(&self) -> bool {
        self.with(|engine| engine.arm())
    }

    pub fn on_capture(&self, tick: u16) -> CaptureAction {
        self.with(|engine| engine.on_capture(tick))
    }

    pub fn on_timeout(&self) {
        self.with(|engine| engine.on_timeout())
    }

    pub fn is_done(&self) -> bool {
        self.with(|engine| engine.is_done())
    }

    pub fn take(&self) -> Option<i16> {
        self.with(|engine| engine.take())
    }

    pub fn state(&self) -> RangingState {
        self.with(|engine| engine.state())
    }
}

/// Main-loop side of the ranging engine
///
/// Arms the shared engine and fires the transducer only when no
/// measurement is in flight.
pub struct Rangefinder<'a, T> {
    shared: &'a SharedRanging,
    transducer: T,
}

impl<'a, T: Transducer> Rangefinder<'a, T> {
    pub fn new(shared: &'a SharedRanging, transducer: T) -> Self {
        Self { shared, transducer }
    }

    pub fn transducer(&self) -> &T {
        &self.transducer
    }
}

impl<T: Transducer> RangingPort for Rangefinder<'_, T> {
    fn start(&mut self) {
        if self.shared.arm() {
            self.transducer.fire();
        }
    }

    fn is_done(&self) -> bool {
        self.shared.is_done()
    }

    fn take(&mut self) -> Option<i16> {
        self.shared.take()
    }
}
