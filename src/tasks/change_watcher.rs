//! Timer change logging background task

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc, watch,
};
use tracing::{debug, error, info, warn};

use crate::{
    state::AppState,
    timer::{TimerId, Value},
};

/// Background task that follows every created timer and logs its changes
pub async fn change_watcher_task(state: Arc<AppState>) {
    info!("Starting change watcher task");

    let created_rx = state.timer_created_tx.subscribe();
    ChangeWatcher::new(state).run(created_rx).await;
}

/// Tracks which timers have a logging task attached.
///
/// Each entry keeps a receiver on the watched timer's channel. Receivers do
/// not keep a timer alive, so an entry whose channel has closed belongs to a
/// timer that is gone.
struct ChangeWatcher {
    state: Arc<AppState>,
    watched: HashMap<TimerId, watch::Receiver<Value>>,
    ended_tx: mpsc::UnboundedSender<TimerId>,
    ended_rx: mpsc::UnboundedReceiver<TimerId>,
}

impl ChangeWatcher {
    fn new(state: Arc<AppState>) -> Self {
        let (ended_tx, ended_rx) = mpsc::unbounded_channel();
        Self {
            state,
            watched: HashMap::new(),
            ended_tx,
            ended_rx,
        }
    }

    async fn run(mut self, mut created_rx: broadcast::Receiver<TimerId>) {
        // Timers registered before this task subscribed
        self.rescan();

        loop {
            tokio::select! {
                created = created_rx.recv() => {
                    if !self.handle_created(created) {
                        break;
                    }
                }
                Some(id) = self.ended_rx.recv() => self.forget(id),
            }
        }
    }

    /// React to one creation announcement. Returns false once the channel is closed.
    fn handle_created(&mut self, created: Result<TimerId, RecvError>) -> bool {
        match created {
            Ok(id) => self.watch(id),
            Err(RecvError::Lagged(missed)) => {
                warn!("Change watcher missed {} timer creation(s), rescanning", missed);
                self.rescan();
            }
            Err(RecvError::Closed) => {
                error!("Timer creation channel closed, change watcher exiting");
                return false;
            }
        }
        true
    }

    /// Watch every registered timer that is not watched yet
    fn rescan(&mut self) {
        for timer in self.state.timers.list() {
            self.watch(timer.id());
        }
    }

    fn watch(&mut self, id: TimerId) {
        let Some(timer) = self.state.timers.get(id) else {
            debug!("Timer {} was removed before it could be watched", id);
            return;
        };
        // Only receivers are kept, so the task ends once the timer is dropped
        let mut changes = timer.subscribe();
        drop(timer);

        if let Some(existing) = self.watched.get(&id) {
            if existing.same_channel(&changes) {
                return;
            }
        }
        self.watched.insert(id, changes.clone());

        let ended_tx = self.ended_tx.clone();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let value = *changes.borrow_and_update();
                info!("Timer {} is {} at {}", id, value.phase(), value);
            }
            debug!("Timer {} dropped, stopped watching", id);
            // Only fails once the watcher itself is gone
            let _ = ended_tx.send(id);
        });
    }

    /// Drop the entry for `id` if the timer it watched no longer exists.
    /// A newer timer registered under the same id keeps its entry.
    fn forget(&mut self, id: TimerId) {
        let closed = self
            .watched
            .get(&id)
            .is_some_and(|changes| changes.has_changed().is_err());
        if closed {
            self.watched.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    use crate::timer::Kind;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::new(0, "127.0.0.1".to_string()))
    }

    async fn next_ended(watcher: &mut ChangeWatcher) -> TimerId {
        timeout(Duration::from_secs(1), watcher.ended_rx.recv())
            .await
            .expect("watch task should end")
            .expect("sender is held by the watcher")
    }

    #[tokio::test]
    async fn test_rescan_watches_each_timer_once() {
        let state = state();
        let a = state.create_timer(Kind::count_up(), None).unwrap();
        let b = state.create_timer(Kind::count_down(5.0), None).unwrap();

        let mut watcher = ChangeWatcher::new(Arc::clone(&state));
        watcher.rescan();
        watcher.rescan();
        watcher.watch(a.id());

        assert_eq!(watcher.watched.len(), 2);
        assert!(watcher.watched.contains_key(&a.id()));
        assert!(watcher.watched.contains_key(&b.id()));
    }

    #[tokio::test]
    async fn test_lagged_announcements_trigger_rescan() {
        let state = state();
        let mut created_rx = state.timer_created_tx.subscribe();
        for _ in 0..120 {
            state.create_timer(Kind::count_up(), None).unwrap();
        }

        let lagged = created_rx.recv().await;
        assert!(matches!(lagged, Err(RecvError::Lagged(_))));

        let mut watcher = ChangeWatcher::new(Arc::clone(&state));
        assert!(watcher.handle_created(lagged));
        assert_eq!(watcher.watched.len(), 120);
    }

    #[tokio::test]
    async fn test_removed_timer_is_forgotten() {
        let state = state();
        let id = state.create_timer(Kind::count_up(), None).unwrap().id();

        let mut watcher = ChangeWatcher::new(Arc::clone(&state));
        watcher.watch(id);
        drop(state.remove_timer(id));

        let ended = next_ended(&mut watcher).await;
        assert_eq!(ended, id);
        watcher.forget(ended);
        assert!(watcher.watched.is_empty());
    }

    #[tokio::test]
    async fn test_recreated_id_is_watched_again() {
        let state = state();
        let id = state.create_timer(Kind::count_up(), None).unwrap().id();

        let mut watcher = ChangeWatcher::new(Arc::clone(&state));
        watcher.watch(id);
        drop(state.remove_timer(id));

        let replacement = state.create_timer(Kind::count_down(9.0), Some(id)).unwrap();
        watcher.watch(id);
        let replacement_rx = replacement.subscribe();
        assert!(watcher.watched[&id].same_channel(&replacement_rx));

        // The old task's exit must not evict the replacement
        let ended = next_ended(&mut watcher).await;
        watcher.forget(ended);
        assert!(watcher.watched.contains_key(&id));
    }

    #[tokio::test]
    async fn test_closed_channel_stops_the_watcher() {
        let mut watcher = ChangeWatcher::new(state());
        assert!(!watcher.handle_created(Err(RecvError::Closed)));
    }
}
