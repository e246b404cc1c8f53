//! Board-agnostic core logic for the flood monitor firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Ultrasonic ranging state machine and its interrupt-shared wrapper
//! - Signal conditioning (median filter, classifier, debouncer)
//! - Alarm lamp mapping and buzzer patterns
//! - Status screen text
//! - The cooperative scheduler that ties them to the upload session
//! - Hardware abstraction traits and configuration types

#![no_std]
#![deny(unsafe_code)]

pub mod alarm;
pub mod conditioning;
pub mod config;
pub mod monitor;
pub mod ranging;
pub mod status;
pub mod traits;

pub use conditioning::Classification;
pub use config::MonitorConfig;
pub use monitor::{Monitor, StationIdentity};
