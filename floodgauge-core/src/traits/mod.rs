//! Hardware abstraction traits
//!
//! These traits define the interface between the monitor logic
//! and board-specific implementations.

pub mod clock;
pub mod output;
pub mod ranging;

pub use clock::Clock;
pub use output::{Annunciator, Indicator, Sounder};
pub use ranging::{RangingPort, Transducer};
