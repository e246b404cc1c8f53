//! Character display abstraction for Floodgauge
//!
//! This crate provides:
//! - `DisplayBackend` trait for line-oriented character displays
//! - `StatusScreen`, a two-line buffer that only pushes changed rows
//!
//! # Architecture
//!
//! The monitor writes text into a [`StatusScreen`] and flushes it to
//! whatever backend the board provides. On the reference board this is a
//! 16x2 HD44780 panel behind a PCF8574 I2C expander (see
//! `floodgauge-drivers`), but any display that can clear itself and draw a
//! line of text at column 0 will do.

#![no_std]

pub mod backend;
pub mod screen;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use screen::{StatusScreen, LINE_LEN, SCREEN_COLS, SCREEN_ROWS};
