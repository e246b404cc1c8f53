//! Ultrasonic ranging
//!
//! ```text
//!            arm()         rising edge        falling edge
//!   Idle ───────────► WaitRise ───────► WaitFall ───────► Done
//!    ▲                   │                 │                │
//!    │                   └──── timeout ────┴──► TimedOut    │
//!    │                                             │        │
//!    └──────────────────── take() ─────────────────┴────────┘
//! ```
//!
//! The engine is driven from the capture interrupt and read from the main
//! loop through [`SharedRanging`].

pub mod engine;
pub mod shared;

pub use engine::{
    distance_from_ticks, CaptureAction, RangeReading, RangingEngine, RangingState, NO_ECHO,
    TICKS_PER_CM, TICK_HZ, TIMEOUT_TICKS,
};
pub use shared::{Rangefinder, SharedRanging};
