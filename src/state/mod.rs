//! State management module
//! 
//! This module contains the timer collection and the application state that owns it.

pub mod app_state;
pub mod registry;

// Re-export main types
pub use app_state::AppState;
pub use registry::TimerRegistry;
