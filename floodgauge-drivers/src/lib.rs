//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in floodgauge-core and floodgauge-display:
//!
//! - Character LCD (HD44780 behind a PCF8574 I2C backpack)
//! - Three-lamp hazard indicator on plain GPIO outputs

#![no_std]
#![deny(unsafe_code)]

pub mod indicator;
pub mod lcd;

pub use indicator::TrafficLight;
pub use lcd::{Hd44780, LcdError, PCF8574_ADDR};
