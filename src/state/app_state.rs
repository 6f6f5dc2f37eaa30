//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    timer::{Clock, Kind, SystemClock, Timer, TimerId},
    utils::format_uptime,
};
use super::TimerRegistry;

/// Main application state that owns the timer collection
pub struct AppState {
    /// All live timers
    pub timers: TimerRegistry,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Announces each newly created timer to the change watcher
    pub timer_created_tx: broadcast::Sender<TimerId>,
}

impl AppState {
    /// Create a new AppState on the system clock
    pub fn new(port: u16, host: String) -> Self {
        Self::with_clock(port, host, Arc::new(SystemClock))
    }

    /// Create a new AppState whose timers read time from `clock`
    pub fn with_clock(port: u16, host: String, clock: Arc<dyn Clock>) -> Self {
        let (timer_created_tx, _) = broadcast::channel(100);

        Self {
            timers: TimerRegistry::new(clock),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_created_tx,
        }
    }

    /// Create a timer, register it and announce it.
    /// Returns `None` if the id is already taken.
    pub fn create_timer(&self, kind: Kind, id: Option<TimerId>) -> Option<Arc<Timer>> {
        let timer = self.timers.create(kind, id)?;
        self.record_action(&format!("create {}", timer.id()));

        if let Err(e) = self.timer_created_tx.send(timer.id()) {
            // Nobody is watching yet; the timer still works
            debug!("No listener for timer creation: {}", e);
        }

        Some(timer)
    }

    /// Remove a timer
    pub fn remove_timer(&self, id: TimerId) -> Option<Arc<Timer>> {
        let removed = self.timers.remove(id);
        if removed.is_some() {
            self.record_action(&format!("remove {}", id));
        }
        removed
    }

    /// Update last action tracking
    pub fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        } else {
            warn!("Failed to record last action: {}", action);
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
