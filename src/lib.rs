//! Menu Bar Timer - independent countdown and count-up timers
//! 
//! This library provides timers whose values are derived from wall-clock
//! timestamps rather than periodic polling, a registry holding any number of
//! them, and an HTTP surface for controlling them.

pub mod config;
pub mod timer;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use timer::{Kind, Timer, TimerId, Value};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
