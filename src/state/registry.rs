//! The unordered collection of independent timers

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, PoisonError, RwLock},
};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::timer::{Clock, Kind, Timer, TimerId};

/// Holds every live timer by id.
///
/// The map lock only guards membership; each timer serializes its own
/// operations, so commands on different timers never contend.
pub struct TimerRegistry {
    timers: RwLock<HashMap<TimerId, Arc<Timer>>>,
    clock: Arc<dyn Clock>,
}

impl TimerRegistry {
    /// Create an empty registry whose timers read time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            timers: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Create and register a timer, optionally with a caller-chosen id.
    /// Returns `None` if a timer with that id is already registered.
    pub fn create(&self, kind: Kind, id: Option<TimerId>) -> Option<Arc<Timer>> {
        self.insert(Timer::with_clock(kind, id, Arc::clone(&self.clock)))
    }

    /// Register an existing timer. A live timer is never replaced: `None`
    /// is returned and the registered one is left untouched.
    pub fn insert(&self, timer: Timer) -> Option<Arc<Timer>> {
        let mut timers = self.timers.write().unwrap_or_else(PoisonError::into_inner);
        match timers.entry(timer.id()) {
            Entry::Occupied(_) => {
                warn!("Refusing to register duplicate timer id {}", timer.id());
                None
            }
            Entry::Vacant(slot) => {
                let timer = Arc::new(timer);
                info!("Registering {} timer {}", timer.kind().name(), timer.id());
                slot.insert(Arc::clone(&timer));
                Some(timer)
            }
        }
    }

    pub fn get(&self, id: TimerId) -> Option<Arc<Timer>> {
        self.timers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn remove(&self, id: TimerId) -> Option<Arc<Timer>> {
        let removed = self
            .timers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if removed.is_some() {
            info!("Removed timer {}", id);
        }
        removed
    }

    /// All timers, ordered by id so listings are stable
    pub fn list(&self) -> Vec<Arc<Timer>> {
        let mut timers: Vec<_> = self
            .timers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        timers.sort_by_key(|timer| timer.id());
        timers
    }

    pub fn len(&self) -> usize {
        self.timers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Complete every timer that has run its course. Returns how many completed.
    pub fn reconcile_all(&self, now: DateTime<Utc>) -> usize {
        // Snapshot first so no timer lock is taken under the map lock
        self.list()
            .into_iter()
            .filter(|timer| timer.reconcile_at(now))
            .inspect(|timer| debug!("Timer {} completed during reconcile", timer.id()))
            .count()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
