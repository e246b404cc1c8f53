//! Echo capture task
//!
//! Spawned on the high-priority interrupt executor so edge timestamps are
//! taken even while the main loop is busy writing to the LCD.

use defmt::*;
use embassy_rp::gpio::Input;
use floodgauge_core::ranging::SharedRanging;
use floodgauge_hal_rp2040::{run_echo_capture, EchoArm};

#[embassy_executor::task]
pub async fn echo_capture_task(
    mut echo: Input<'static>,
    ranging: &'static SharedRanging,
    arm: &'static EchoArm,
) {
    info!("Echo capture task started");
    run_echo_capture(&mut echo, ranging, arm).await
}
