//! The timer handle: one lock-serialized state machine per instance

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    clock::{Clock, SystemClock},
    completion::CompletionDate,
    state::State,
    Kind, Value,
};

/// Stable unique identifier of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(Uuid);

impl TimerId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TimerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TimerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A timer's value and completion date at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub value: Value,
    pub completion: Option<CompletionDate>,
}

/// A countdown or count-up timer.
///
/// All mutation goes through one mutex per timer, so operations on the same
/// timer are serialized while separate timers share nothing. Every state
/// change is published to subscribers as a fresh [`Value`].
pub struct Timer {
    id: TimerId,
    kind: Kind,
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    changes: watch::Sender<Value>,
}

impl Timer {
    /// Create a timer on the system clock. A fresh id is generated when `id` is `None`.
    ///
    /// To start it right away: `Timer::new(kind, None).start();`
    pub fn new(kind: Kind, id: Option<TimerId>) -> Self {
        Self::with_clock(kind, id, Arc::new(SystemClock))
    }

    /// Create a timer that reads "now" from `clock`
    pub fn with_clock(kind: Kind, id: Option<TimerId>, clock: Arc<dyn Clock>) -> Self {
        let (changes, _) = watch::channel(Value::NotStarted(kind.starting_amount()));
        Self {
            id: id.unwrap_or_default(),
            kind,
            state: Mutex::new(State::NotStarted),
            clock,
            changes,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Start or resume. No effect while running or once completed.
    pub fn start(&self) -> &Self {
        self.start_at(self.clock.now())
    }

    pub fn start_at(&self, now: DateTime<Utc>) -> &Self {
        let mut state = self.lock();
        let next = state.started(&self.kind, now);
        self.apply(&mut state, next, now, "start");
        self
    }

    /// Pause. Only has an effect while running.
    pub fn pause(&self) -> &Self {
        self.pause_at(self.clock.now())
    }

    pub fn pause_at(&self, now: DateTime<Utc>) -> &Self {
        let mut state = self.lock();
        let next = state.paused(now);
        self.apply(&mut state, next, now, "pause");
        self
    }

    /// Complete the timer immediately. No effect once completed.
    pub fn stop(&self) -> &Self {
        self.stop_at(self.clock.now())
    }

    pub fn stop_at(&self, now: DateTime<Utc>) -> &Self {
        let mut state = self.lock();
        let next = state.stopped(now);
        self.apply(&mut state, next, now, "stop");
        self
    }

    /// Pause when running, otherwise start
    pub fn toggle(&self) -> &Self {
        self.toggle_at(self.clock.now())
    }

    pub fn toggle_at(&self, now: DateTime<Utc>) -> &Self {
        let mut state = self.lock();
        if let Some(completed) = state.derive(&self.kind, now).completion {
            self.apply(&mut state, completed, now, "limit");
            return self;
        }
        let next = match *state {
            State::Running { .. } => state.paused(now),
            _ => state.started(&self.kind, now),
        };
        self.apply(&mut state, next, now, "toggle");
        self
    }

    /// The value right now. See [`Timer::current_value_at`].
    pub fn current_value(&self) -> Value {
        self.current_value_at(self.clock.now())
    }

    /// The value at `now`.
    ///
    /// A bounded count-up that has reached its limit reports exactly the
    /// limit as running on this read and is completed afterwards.
    pub fn current_value_at(&self, now: DateTime<Utc>) -> Value {
        let mut state = self.lock();
        self.read_value(&mut state, now)
    }

    /// The value and completion date at `now`, taken under one lock so they
    /// always describe the same state. Applies completion like
    /// [`Timer::current_value_at`].
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> Snapshot {
        let mut state = self.lock();
        let value = self.read_value(&mut state, now);
        Snapshot {
            value,
            completion: state.completion_date(&self.kind, now),
        }
    }

    /// The value at `now` without applying any completion it implies
    pub fn peek_value_at(&self, now: DateTime<Utc>) -> Value {
        self.lock().derive(&self.kind, now).value
    }

    /// Complete the timer if it has run its course. Returns whether it did.
    pub fn reconcile(&self) -> bool {
        self.reconcile_at(self.clock.now())
    }

    pub fn reconcile_at(&self, now: DateTime<Utc>) -> bool {
        let mut state = self.lock();
        match state.reconciled(&self.kind, now) {
            Some(completed) => {
                self.apply(&mut state, completed, now, "reconcile");
                true
            }
            None => false,
        }
    }

    /// When this timer completed or is expected to, or `None` if it never will on its own
    pub fn completion_date(&self) -> Option<CompletionDate> {
        self.completion_date_at(self.clock.now())
    }

    pub fn completion_date_at(&self, now: DateTime<Utc>) -> Option<CompletionDate> {
        self.lock().completion_date(&self.kind, now)
    }

    pub fn is_running(&self) -> bool {
        self.current_value().is_running()
    }

    /// Subscribe to value changes.
    ///
    /// The receiver starts out marked as changed, so the first
    /// `changed().await` yields the current value immediately.
    pub fn subscribe(&self) -> watch::Receiver<Value> {
        let mut rx = self.changes.subscribe();
        rx.mark_changed();
        rx
    }

    /// Current time according to this timer's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // Transitions are single assignments, so a poisoned state is still whole
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_value(&self, state: &mut MutexGuard<'_, State>, now: DateTime<Utc>) -> Value {
        let derived = state.derive(&self.kind, now);
        if let Some(completed) = derived.completion {
            self.apply(state, completed, now, "limit");
        }
        derived.value
    }

    fn apply(&self, state: &mut MutexGuard<'_, State>, next: State, now: DateTime<Utc>, action: &str) {
        if **state == next {
            debug!("Timer {} ignored {} while {:?}", self.id, action, **state);
            return;
        }

        **state = next;
        let value = next.derive(&self.kind, now).value;
        info!(
            "Timer {} ({}) {} -> {} at {}",
            self.id,
            self.kind.name(),
            action,
            value.phase(),
            value
        );
        self.changes.send_replace(value);
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &*self.lock())
            .finish()
    }
}
