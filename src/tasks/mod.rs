//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod change_watcher;
pub mod refresh_ticker;

// Re-export main functions
pub use change_watcher::change_watcher_task;
pub use refresh_ticker::refresh_ticker_task;
