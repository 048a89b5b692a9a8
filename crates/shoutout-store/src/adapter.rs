use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, error, warn};
use uuid::Uuid;

use shoutout_types::Shoutout;
use shoutout_types::events::StorageChange;

use crate::backend::StorageBackend;
use crate::error::Result;
use crate::notifier::ChangeNotifier;

/// Key the feed record lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "ccs-valentine-shoutouts";

/// The feed store's only view of durable storage.
///
/// Neither method reports failure to the caller: storage problems are logged
/// and the in-memory feed stays authoritative for the session.
pub trait FeedRepository: Send + Sync {
    /// Read the whole collection. Missing or malformed records read as empty.
    fn load(&self) -> Vec<Shoutout>;

    /// Overwrite the whole collection in a single write, then notify other
    /// sessions. Returns `false` if the write failed and nothing was notified.
    fn save(&self, all: &[Shoutout]) -> bool;

    /// Change notifications for this repository's storage.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}

/// Stores the feed as one JSON array under a single key of a [`StorageBackend`].
pub struct StoreAdapter {
    backend: Arc<dyn StorageBackend>,
    key: String,
    origin: Uuid,
    notifier: ChangeNotifier,
}

impl StoreAdapter {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        key: impl Into<String>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            backend,
            key: key.into(),
            origin: Uuid::new_v4(),
            notifier,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Identifier stamped on this adapter's change notifications.
    pub fn origin(&self) -> Uuid {
        self.origin
    }

    fn try_load(&self) -> Result<Vec<Shoutout>> {
        match self.backend.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn try_save(&self, all: &[Shoutout]) -> Result<()> {
        let blob = serde_json::to_string(all)?;
        self.backend.set(&self.key, &blob)
    }
}

impl FeedRepository for StoreAdapter {
    fn load(&self) -> Vec<Shoutout> {
        match self.try_load() {
            Ok(all) => {
                debug!("Loaded {} shoutouts from '{}'", all.len(), self.key);
                all
            }
            Err(e) => {
                warn!("Failed to load shoutouts from '{}', treating as empty: {}", self.key, e);
                Vec::new()
            }
        }
    }

    fn save(&self, all: &[Shoutout]) -> bool {
        match self.try_save(all) {
            Ok(()) => {
                debug!("Saved {} shoutouts to '{}'", all.len(), self.key);
                self.notifier.notify(StorageChange {
                    key: self.key.clone(),
                    origin: self.origin,
                });
                true
            }
            Err(e) => {
                error!("Failed to save shoutouts to '{}': {}", self.key, e);
                false
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.notifier.subscribe()
    }
}
