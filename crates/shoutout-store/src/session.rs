use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use shoutout_types::events::StorageChange;

use crate::clock::Clock;
use crate::feed::FeedStore;

/// A feed store shared between its session task and the caller.
pub type SharedFeed = Arc<Mutex<FeedStore>>;

/// Drives one feed store for the lifetime of a session: sweeps expired
/// shoutouts on a fixed interval and reloads whenever another session writes.
///
/// Dropping the session stops the background task.
pub struct FeedSession {
    store: SharedFeed,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl FeedSession {
    /// Initialize `store` and start its background task. Must be called from
    /// within a tokio runtime.
    pub fn start(mut store: FeedStore, purge_interval: Duration) -> Self {
        // Subscribe first so a write racing with initialization still triggers a reload
        let changes = store.repository().subscribe();
        store.initialize();

        let clock = store.clock().clone();
        let store = Arc::new(Mutex::new(store));
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_session_loop(
            store.clone(),
            changes,
            clock,
            purge_interval,
            cancel.clone(),
        ));

        info!("Feed session started (purge every {:?})", purge_interval);
        Self {
            store,
            cancel,
            task: Some(task),
        }
    }

    pub fn store(&self) -> &SharedFeed {
        &self.store
    }

    /// Run `f` against the store. Returns `None` if the store lock is poisoned.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut FeedStore) -> T) -> Option<T> {
        with_locked(&self.store, f)
    }

    /// Stop the purge timer and change listener and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Feed session task failed: {}", e);
            }
        }
        info!("Feed session stopped");
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn with_locked<T>(store: &SharedFeed, f: impl FnOnce(&mut FeedStore) -> T) -> Option<T> {
    match store.lock() {
        Ok(mut feed) => Some(f(&mut feed)),
        Err(e) => {
            error!("Feed store lock poisoned: {}", e);
            None
        }
    }
}

async fn run_session_loop(
    store: SharedFeed,
    mut changes: broadcast::Receiver<StorageChange>,
    clock: Arc<dyn Clock>,
    purge_interval: Duration,
    cancel: CancellationToken,
) {
    let mut sweep = tokio::time::interval(purge_interval);
    sweep.tick().await;
    let mut listening = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            _ = sweep.tick() => {
                let now = clock.now_ms();
                if with_locked(&store, |feed| feed.purge_expired(now)).is_none() {
                    break;
                }
            }

            change = changes.recv(), if listening => {
                match change {
                    Ok(change) => {
                        debug!("Storage '{}' changed by {}", change.key, change.origin);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {} storage notifications, reloading once", skipped);
                    }
                    Err(RecvError::Closed) => {
                        warn!("Storage notifications closed; feed will no longer follow other sessions");
                        listening = false;
                        continue;
                    }
                }
                if with_locked(&store, |feed| feed.reload()).is_none() {
                    break;
                }
            }
        }
    }

    debug!("Feed session loop exited");
}
