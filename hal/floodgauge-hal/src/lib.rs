//! Floodgauge Hardware Abstraction Layer
//!
//! This crate defines the narrow collaborator interfaces the monitor needs
//! from a board: a trigger output pin and a serial link to the Wi-Fi modem.
//! Chip-specific HALs (currently RP2040) implement them.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │  Application (floodgauge-firmware)        │
//! └───────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌───────────────────────────────────────────┐
//! │  floodgauge-hal (this crate - traits)     │
//! └───────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ floodgauge-hal-   │
//!           │      rp2040       │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (indicator lamps)
//! - [`uart::UartTx`], [`uart::UartRx`] - Modem serial link

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use uart::{UartConfig, UartRx, UartTx};
