//! The user-facing snapshot of a timer

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Seconds;
use crate::utils::format_duration;

/// The value of a timer at one instant. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "amount", rename_all = "snake_case")]
pub enum Value {
    /// Not yet started; carries the amount the timer will show once started
    NotStarted(Seconds),
    /// Running and not paused
    Running(Seconds),
    /// Paused
    Paused(Seconds),
    /// Reached its end or was stopped by hand
    Completed(Seconds),
}

/// The phase of a [`Value`] without its amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    Completed,
}

impl Value {
    pub fn amount(&self) -> Seconds {
        match *self {
            Self::NotStarted(amount)
            | Self::Running(amount)
            | Self::Paused(amount)
            | Self::Completed(amount) => amount,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::NotStarted(_) => Phase::NotStarted,
            Self::Running(_) => Phase::Running,
            Self::Paused(_) => Phase::Paused,
            Self::Completed(_) => Phase::Completed,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }

    /// Label for the control that toggles this timer.
    ///
    /// A completed timer cannot be started again; "Restart" means replacing
    /// it with a new timer of the same kind.
    pub fn action_label(&self) -> &'static str {
        match self {
            Self::NotStarted(_) => "Start",
            Self::Running(_) => "Pause",
            Self::Paused(_) => "Resume",
            Self::Completed(_) => "Restart",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.amount()))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not started",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}
