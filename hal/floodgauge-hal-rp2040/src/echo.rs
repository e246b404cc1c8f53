//! Ultrasonic trigger and echo capture
//!
//! The RP2040 has no input-capture unit, so echo edges are timestamped by a
//! task on a high-priority interrupt executor: the GPIO edge interrupt wakes
//! it, and it reads the system timer straight away. The task preempts the
//! thread-mode main loop like a capture ISR would.

use embassy_rp::gpio::{Input, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{block_for, with_timeout, Duration};
use floodgauge_core::ranging::{CaptureAction, SharedRanging, TICK_HZ, TIMEOUT_TICKS};
use floodgauge_core::traits::Transducer;

use crate::timebase::capture_ticks;

/// Wakes the capture task for one measurement
pub type EchoArm = Signal<CriticalSectionRawMutex, ()>;

/// Echo timeout derived from the tick budget
const ECHO_TIMEOUT: Duration = Duration::from_micros(TIMEOUT_TICKS as u64 * 1_000_000 / TICK_HZ as u64);

/// Trigger side of an HC-SR04 style sensor
pub struct EchoTrigger<'d> {
    trig: Output<'d>,
    arm: &'static EchoArm,
}

impl<'d> EchoTrigger<'d> {
    pub fn new(mut trig: Output<'d>, arm: &'static EchoArm) -> Self {
        trig.set_low();
        Self { trig, arm }
    }
}

impl Transducer for EchoTrigger<'_> {
    fn fire(&mut self) {
        // Arm first: the capture task runs at interrupt priority and is
        // waiting for the rising edge before the pulse ends
        self.arm.signal(());

        self.trig.set_low();
        block_for(Duration::from_micros(3));
        self.trig.set_high();
        block_for(Duration::from_micros(10));
        self.trig.set_low();
    }
}

/// Capture loop; run forever from a task on the interrupt executor
pub async fn run_echo_capture(echo: &mut Input<'_>, ranging: &SharedRanging, arm: &EchoArm) -> ! {
    loop {
        arm.wait().await;
        if with_timeout(ECHO_TIMEOUT, capture_edges(echo, ranging)).await.is_err() {
            ranging.on_timeout();
        }
    }
}

async fn capture_edges(echo: &mut Input<'_>, ranging: &SharedRanging) {
    echo.wait_for_rising_edge().await;
    if ranging.on_capture(capture_ticks()) != CaptureAction::AwaitFallingEdge {
        return;
    }
    echo.wait_for_falling_edge().await;
    ranging.on_capture(capture_ticks());
}
