//! Timer states and the pure transition/derivation rules
//!
//! Nothing in here touches a lock or a clock: every function takes the
//! current state, the timer's kind and one sampled `now`, and returns what
//! the state should become. [`super::Timer`] applies the results.

use chrono::{DateTime, Utc};

use super::{
    clock::{offset, seconds_between},
    completion::CompletionDate,
    Kind, Seconds, Value,
};

/// The current state of a timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum State {
    /// Not yet started
    NotStarted,
    /// Running. Elapsed time is `now - original_start - time_lost_to_pausing`.
    Running {
        original_start: DateTime<Utc>,
        time_lost_to_pausing: Seconds,
    },
    /// Paused. Earlier pause instants are folded into `elapsed_at_pause`.
    Paused {
        original_start: DateTime<Utc>,
        pause_began: DateTime<Utc>,
        elapsed_at_pause: Seconds,
    },
    /// Terminal
    Completed {
        completed_at: DateTime<Utc>,
        total_elapsed: Seconds,
    },
}

/// A derived value, plus the completion the derivation detected (if any)
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Derived {
    pub value: Value,
    pub completion: Option<State>,
}

fn running_elapsed(
    original_start: DateTime<Utc>,
    time_lost_to_pausing: Seconds,
    now: DateTime<Utc>,
) -> Seconds {
    seconds_between(now, original_start) - time_lost_to_pausing
}

impl State {
    /// State after a start/resume request at `now`
    pub(crate) fn started(self, kind: &Kind, now: DateTime<Utc>) -> State {
        match self {
            State::NotStarted => State::Running {
                original_start: now,
                time_lost_to_pausing: 0.0,
            },
            State::Paused { .. } if kind.is_empty_countdown() => self.stopped(now),
            State::Paused {
                original_start,
                pause_began,
                elapsed_at_pause,
            } => {
                let time_since_pause = seconds_between(now, pause_began);
                let time_since_start = seconds_between(now, original_start);
                // Pausing already lost before this pause began
                let lost_before_pause = (time_since_start - time_since_pause) - elapsed_at_pause;
                State::Running {
                    original_start,
                    time_lost_to_pausing: time_since_pause + lost_before_pause,
                }
            }
            State::Running { .. } | State::Completed { .. } => self,
        }
    }

    /// State after a pause request at `now`
    pub(crate) fn paused(self, now: DateTime<Utc>) -> State {
        match self {
            State::Running {
                original_start,
                time_lost_to_pausing,
            } => State::Paused {
                original_start,
                pause_began: now,
                elapsed_at_pause: running_elapsed(original_start, time_lost_to_pausing, now),
            },
            State::NotStarted | State::Paused { .. } | State::Completed { .. } => self,
        }
    }

    /// State after a stop request at `now`
    pub(crate) fn stopped(self, now: DateTime<Utc>) -> State {
        let total_elapsed = match self {
            State::NotStarted => 0.0,
            State::Running {
                original_start,
                time_lost_to_pausing,
            } => running_elapsed(original_start, time_lost_to_pausing, now),
            State::Paused {
                elapsed_at_pause, ..
            } => elapsed_at_pause,
            State::Completed { .. } => return self,
        };
        State::Completed {
            completed_at: now,
            total_elapsed,
        }
    }

    /// Derive the value at `now`.
    ///
    /// A bounded count-up that has reached its limit reports the limit one
    /// last time as running and hands back the completed state to apply.
    /// Countdowns never complete from a read.
    pub(crate) fn derive(self, kind: &Kind, now: DateTime<Utc>) -> Derived {
        let value = match self {
            State::NotStarted => Value::NotStarted(kind.starting_amount()),
            State::Running {
                original_start,
                time_lost_to_pausing,
            } => {
                let elapsed = running_elapsed(original_start, time_lost_to_pausing, now);
                match *kind {
                    Kind::CountUp { limit } => match limit.seconds() {
                        Some(limit) if elapsed >= limit => {
                            return Derived {
                                value: Value::Running(limit),
                                completion: Some(State::Completed {
                                    completed_at: reached_at(
                                        original_start,
                                        limit + time_lost_to_pausing,
                                        now,
                                    ),
                                    total_elapsed: limit,
                                }),
                            };
                        }
                        _ => Value::Running(elapsed),
                    },
                    Kind::CountDown { .. } => {
                        Value::Running(remaining(kind, elapsed))
                    }
                }
            }
            State::Paused {
                elapsed_at_pause, ..
            } => match kind {
                Kind::CountUp { .. } => Value::Paused(elapsed_at_pause),
                Kind::CountDown { .. } => Value::Paused(remaining(kind, elapsed_at_pause)),
            },
            State::Completed { total_elapsed, .. } => Value::Completed(total_elapsed),
        };

        Derived {
            value,
            completion: None,
        }
    }

    /// The completed state a running timer has reached by `now`, if any.
    ///
    /// Unlike [`State::derive`] this covers both kinds: a countdown whose
    /// remaining time hit zero completes here.
    pub(crate) fn reconciled(self, kind: &Kind, now: DateTime<Utc>) -> Option<State> {
        let State::Running {
            original_start,
            time_lost_to_pausing,
        } = self
        else {
            return None;
        };

        let target = kind.target()?;
        let elapsed = running_elapsed(original_start, time_lost_to_pausing, now);
        (elapsed >= target).then(|| State::Completed {
            completed_at: reached_at(original_start, target + time_lost_to_pausing, now),
            total_elapsed: target,
        })
    }

    /// When this timer has completed or will complete, as seen from `now`.
    ///
    /// `None` if it never completes on its own, or if the instant lies beyond
    /// what a timestamp can represent.
    pub(crate) fn completion_date(self, kind: &Kind, now: DateTime<Utc>) -> Option<CompletionDate> {
        let target = kind.target()?;
        let date = match self {
            State::NotStarted => CompletionDate::IfResumedNow(offset(now, target)?),
            State::Running {
                original_start,
                time_lost_to_pausing,
            } => CompletionDate::Exactly(offset(original_start, target + time_lost_to_pausing)?),
            State::Paused {
                elapsed_at_pause, ..
            } => CompletionDate::IfResumedNow(offset(now, (target - elapsed_at_pause).max(0.0))?),
            State::Completed { completed_at, .. } => CompletionDate::Exactly(completed_at),
        };
        Some(date)
    }
}

/// The instant a running timer reached `running_span` seconds past its start.
/// Elapsed time already passed that span, so it is never later than `now`.
fn reached_at(original_start: DateTime<Utc>, running_span: Seconds, now: DateTime<Utc>) -> DateTime<Utc> {
    offset(original_start, running_span).map_or(now, |at| at.min(now))
}

/// Countdown time left after `elapsed` seconds, never below zero
fn remaining(kind: &Kind, elapsed: Seconds) -> Seconds {
    let total = kind.countdown_total().unwrap_or(0.0);
    (total - elapsed).max(0.0)
}
