//! Timer kinds and duration normalization

use serde::{Deserialize, Serialize};

use super::Seconds;

/// Whether a duration can be used in timestamp arithmetic
pub fn is_usable(seconds: Seconds) -> bool {
    seconds.is_finite()
}

/// Where a count-up timer stops on its own, if anywhere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountUpLimit {
    /// Never complete automatically
    Unbounded,
    /// Complete once this many seconds have elapsed
    After(Seconds),
}

impl CountUpLimit {
    /// Build a limit from a raw duration; anything non-finite means unbounded
    pub fn from_seconds(seconds: Seconds) -> Self {
        if is_usable(seconds) {
            Self::After(seconds.max(0.0))
        } else {
            Self::Unbounded
        }
    }

    /// The limit in seconds, or `None` when the timer never auto-completes
    pub fn seconds(&self) -> Option<Seconds> {
        match *self {
            Self::Unbounded => None,
            Self::After(seconds) if is_usable(seconds) => Some(seconds.max(0.0)),
            Self::After(_) => None,
        }
    }
}

impl Default for CountUpLimit {
    fn default() -> Self {
        Self::Unbounded
    }
}

/// The kind of a timer. Fixed for the lifetime of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kind {
    /// Starts at zero and counts upwards, optionally stopping at a limit
    CountUp {
        #[serde(default)]
        limit: CountUpLimit,
    },
    /// Starts at `total` and counts down to zero.
    ///
    /// A non-finite or negative total is treated as zero, which completes
    /// as soon as the timer is started.
    CountDown { total: Seconds },
}

impl Kind {
    /// An unbounded count-up timer
    pub fn count_up() -> Self {
        Self::CountUp {
            limit: CountUpLimit::Unbounded,
        }
    }

    /// A count-up timer that completes after `limit` seconds
    pub fn count_up_to(limit: Seconds) -> Self {
        Self::CountUp {
            limit: CountUpLimit::from_seconds(limit),
        }
    }

    /// A countdown from `total` seconds
    pub fn count_down(total: Seconds) -> Self {
        Self::CountDown {
            total: normalize_total(total),
        }
    }

    /// The normalized countdown total, or `None` for count-up timers
    pub fn countdown_total(&self) -> Option<Seconds> {
        match *self {
            Self::CountDown { total } => Some(normalize_total(total)),
            Self::CountUp { .. } => None,
        }
    }

    /// The amount shown before the timer is started
    pub fn starting_amount(&self) -> Seconds {
        match *self {
            Self::CountUp { .. } => 0.0,
            Self::CountDown { total } => normalize_total(total),
        }
    }

    /// How much running time it takes to reach completion, or `None` if never
    pub fn target(&self) -> Option<Seconds> {
        match *self {
            Self::CountUp { limit } => limit.seconds(),
            Self::CountDown { total } => Some(normalize_total(total)),
        }
    }

    /// Whether this is a countdown that can never meaningfully run
    pub fn is_empty_countdown(&self) -> bool {
        self.countdown_total() == Some(0.0)
    }

    /// Short lowercase name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::CountUp { .. } => "count-up",
            Self::CountDown { .. } => "countdown",
        }
    }
}

impl Default for Kind {
    fn default() -> Self {
        Self::count_up()
    }
}

fn normalize_total(total: Seconds) -> Seconds {
    if is_usable(total) && total > 0.0 {
        total
    } else {
        0.0
    }
}
