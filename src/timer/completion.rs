//! When a timer has finished or will finish

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The instant at which a timer has completed or is expected to complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", content = "at", rename_all = "snake_case")]
pub enum CompletionDate {
    /// Completed at this instant, or will complete then if left running
    Exactly(DateTime<Utc>),
    /// Paused or not started: would complete at this instant if started right now
    IfResumedNow(DateTime<Utc>),
}

impl CompletionDate {
    pub fn instant(&self) -> DateTime<Utc> {
        match *self {
            Self::Exactly(at) | Self::IfResumedNow(at) => at,
        }
    }
}
