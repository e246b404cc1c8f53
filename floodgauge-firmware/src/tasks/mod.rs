//! Embassy async tasks
//!
//! Only the echo capture runs as a task. Everything else lives in the
//! thread-mode loop in `main`.

pub mod echo;

pub use echo::echo_capture_task;
