//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{CompletionDate, Kind, Timer, TimerId, Value};

/// Body of `POST /timers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimerRequest {
    pub kind: Kind,
    #[serde(default)]
    pub id: Option<TimerId>,
}

/// Everything a presentation needs to draw one timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub id: TimerId,
    pub kind: Kind,
    pub value: Value,
    pub display: String,
    pub action: String,
    pub completion: Option<CompletionDate>,
}

impl TimerView {
    /// Snapshot a timer at one instant of its own clock
    pub fn of(timer: &Timer) -> Self {
        let snapshot = timer.snapshot_at(timer.now());
        Self {
            id: timer.id(),
            kind: timer.kind(),
            value: snapshot.value,
            display: snapshot.value.to_string(),
            action: snapshot.value.action_label().to_string(),
            completion: snapshot.completion,
        }
    }
}

/// Status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer_count: usize,
    pub running_count: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
