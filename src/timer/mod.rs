//! Timer core
//!
//! A timer never counts ticks. It records timestamps at each transition and
//! derives its value from them and the current wall-clock time whenever it is
//! asked, so the value stays correct no matter how often (or how rarely) it
//! is sampled.

pub mod clock;
pub mod completion;
pub mod kind;
mod state;
#[allow(clippy::module_inception)]
pub mod timer;
pub mod value;

/// Durations are fractional seconds
pub type Seconds = f64;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use completion::CompletionDate;
pub use kind::{CountUpLimit, Kind};
pub use timer::{Snapshot, Timer, TimerId};
pub use value::{Phase, Value};
