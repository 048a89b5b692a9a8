use std::sync::Arc;

use tokio::sync::broadcast;

use shoutout_types::events::StorageChange;

const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Fan-out of storage change notifications to every session of one origin.
///
/// Cloning shares the underlying channel; give each adapter that writes to the
/// same backend a clone of the same notifier.
#[derive(Clone)]
pub struct ChangeNotifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    tx: broadcast::Sender<StorageChange>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(NotifierInner { tx }),
        }
    }

    /// Subscribe to change notifications. Only changes sent after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.inner.tx.subscribe()
    }

    /// Notify all subscribers. Having no subscribers is fine.
    pub fn notify(&self, change: StorageChange) {
        let _ = self.inner.tx.send(change);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}
