//! RP2040-specific HAL for the flood monitor firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `floodgauge-hal` and `floodgauge-core` traits:
//!
//! - GPIO outputs for the indicator lamps
//! - Buffered, interrupt-fed UART for the Wi-Fi modem
//! - PWM tone generator for the buzzer
//! - Millisecond clock and 2 MHz capture ticks from the system timer
//! - Ultrasonic trigger and echo capture

#![no_std]

pub mod echo;
pub mod gpio;
pub mod timebase;
pub mod tone;
pub mod uart;

pub use echo::{run_echo_capture, EchoArm, EchoTrigger};
pub use gpio::GpioOutput;
pub use timebase::{capture_ticks, EmbassyClock};
pub use tone::PwmTone;
pub use uart::{line_config, ModemRx, ModemTx};
