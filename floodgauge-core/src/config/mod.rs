//! Configuration types
//!
//! Board-agnostic thresholds and cadences. The firmware fills these in at
//! build time from `station.toml`; the `Default` values are the factory
//! settings.

pub mod types;

pub use types::*;
