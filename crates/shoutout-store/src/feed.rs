use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use shoutout_types::events::FeedNotice;
use shoutout_types::{NewShoutout, Shoutout};

use crate::adapter::{FeedRepository, StoreAdapter};
use crate::backend::FileBackend;
use crate::clock::{Clock, SystemClock};
use crate::config::FeedConfig;
use crate::error::Result;
use crate::expiry;
use crate::notifier::ChangeNotifier;
use crate::view::{self, SortOrder};

const NOTICE_CHANNEL_CAPACITY: usize = 64;

/// In-memory feed for one session, kept in step with durable storage.
///
/// Memory is authoritative for the session: storage failures are logged by the
/// repository and never undo an in-memory change. Another session's write is
/// picked up through [`FeedStore::reload`], which replaces memory wholesale.
pub struct FeedStore {
    repo: Arc<dyn FeedRepository>,
    clock: Arc<dyn Clock>,
    shoutouts: Vec<Shoutout>,
    initialized: bool,
    notices: broadcast::Sender<FeedNotice>,
}

impl FeedStore {
    pub fn new(repo: Arc<dyn FeedRepository>, clock: Arc<dyn Clock>) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self {
            repo,
            clock,
            shoutouts: Vec::new(),
            initialized: false,
            notices,
        }
    }

    /// File-backed store on the wall clock, as configured. Sessions that should
    /// follow each other's writes must share `notifier`.
    pub fn open(config: &FeedConfig, notifier: ChangeNotifier) -> Result<Self> {
        let backend = FileBackend::open(&config.storage_dir)?;
        let adapter = StoreAdapter::new(Arc::new(backend), config.storage_key.clone(), notifier);
        Ok(Self::new(Arc::new(adapter), Arc::new(SystemClock)))
    }

    /// Live shoutouts in the order of the last reconciliation.
    pub fn shoutouts(&self) -> &[Shoutout] {
        &self.shoutouts
    }

    /// Shoutouts ordered by creation time.
    pub fn sorted(&self, order: SortOrder) -> Vec<Shoutout> {
        view::sorted(&self.shoutouts, order)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn repository(&self) -> &Arc<dyn FeedRepository> {
        &self.repo
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// User-visible notices raised by this store.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<FeedNotice> {
        self.notices.subscribe()
    }

    /// Load, drop expired entries and mark the store initialized.
    ///
    /// Storage is rewritten only when something was dropped. Runs once; later
    /// calls do nothing.
    pub fn initialize(&mut self) {
        if self.initialized {
            debug!("Feed store already initialized");
            return;
        }

        let stored = self.repo.load();
        let live = expiry::filter_live(&stored, self.clock.now_ms());
        let dropped = stored.len() - live.len();

        if dropped > 0 {
            info!("Dropped {} expired shoutouts on startup", dropped);
            self.repo.save(&live);
        }

        self.shoutouts = live;
        self.initialized = true;
        info!("Feed store initialized with {} shoutouts", self.shoutouts.len());
    }

    /// Stamp and post a new shoutout, then persist the full collection.
    pub fn add(&mut self, data: NewShoutout) -> Shoutout {
        let shoutout = data.into_shoutout(Uuid::new_v4(), self.clock.now_ms());
        self.shoutouts.insert(0, shoutout.clone());
        self.repo.save(&self.shoutouts);

        debug!("Added shoutout {} from '{}'", shoutout.id, shoutout.sender);
        shoutout
    }

    /// Remove the shoutout with `id` and persist. Returns whether it existed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.shoutouts.len();
        self.shoutouts.retain(|s| s.id != id);
        let removed = self.shoutouts.len() < before;

        self.repo.save(&self.shoutouts);

        if removed {
            debug!("Deleted shoutout {}", id);
        } else {
            debug!("Delete of unknown shoutout {} left feed unchanged", id);
        }
        removed
    }

    /// Drop entries that are no longer live at `now`. Persists and raises a
    /// [`FeedNotice::FeedCleaned`] only when something was dropped.
    pub fn purge_expired(&mut self, now: i64) -> usize {
        let live = expiry::filter_live(&self.shoutouts, now);
        let removed = self.shoutouts.len() - live.len();
        if removed == 0 {
            return 0;
        }

        self.shoutouts = live;
        self.repo.save(&self.shoutouts);
        info!("Purged {} expired shoutouts", removed);

        let _ = self.notices.send(FeedNotice::FeedCleaned { removed });
        removed
    }

    /// Replace memory with whatever storage holds now. Called when another
    /// session reports a write.
    pub fn reload(&mut self) {
        self.shoutouts = self.repo.load();
        debug!("Reloaded {} shoutouts from storage", self.shoutouts.len());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tokio::sync::broadcast::error::TryRecvError;

    use super::*;
    use crate::adapter::DEFAULT_STORAGE_KEY;
    use crate::backend::{MemoryBackend, StorageBackend};
    use crate::clock::ManualClock;
    use crate::expiry::TTL_MS;

    const NOW: i64 = 1_707_900_000_000;

    struct Harness {
        backend: Arc<MemoryBackend>,
        notifier: ChangeNotifier,
        clock: Arc<ManualClock>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_backend(MemoryBackend::new())
        }

        fn with_backend(backend: MemoryBackend) -> Self {
            Self {
                backend: Arc::new(backend),
                notifier: ChangeNotifier::new(),
                clock: Arc::new(ManualClock::new(NOW)),
            }
        }

        fn adapter(&self) -> Arc<StoreAdapter> {
            Arc::new(StoreAdapter::new(
                self.backend.clone(),
                DEFAULT_STORAGE_KEY,
                self.notifier.clone(),
            ))
        }

        fn store(&self) -> FeedStore {
            FeedStore::new(self.adapter(), self.clock.clone())
        }

        fn seed(&self, all: &[Shoutout]) {
            self.backend
                .set(DEFAULT_STORAGE_KEY, &serde_json::to_string(all).unwrap())
                .unwrap();
        }

        fn stored(&self) -> Vec<Shoutout> {
            let raw = self.backend.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
            serde_json::from_str(&raw).unwrap()
        }
    }

    fn draft(sender: &str, recipient: &str, message: &str) -> NewShoutout {
        NewShoutout {
            sender: sender.into(),
            recipient: recipient.into(),
            message: message.into(),
            image: None,
            frame: "heart".into(),
        }
    }

    fn aged(age_ms: i64) -> Shoutout {
        draft("A", "B", "old news").into_shoutout(Uuid::new_v4(), NOW - age_ms)
    }

    #[test]
    fn initialize_drops_expired_and_rewrites_storage() {
        let h = Harness::new();
        let stale = aged(3_700_000);
        let fresh = aged(60_000);
        h.seed(&[stale, fresh.clone()]);
        let writes_before = h.backend.write_count();

        let mut store = h.store();
        store.initialize();

        assert!(store.is_initialized());
        assert_eq!(store.shoutouts(), &[fresh.clone()]);
        assert_eq!(h.stored(), vec![fresh]);
        assert_eq!(h.backend.write_count(), writes_before + 1);
    }

    #[test]
    fn initialize_without_expired_does_not_write() {
        let h = Harness::new();
        h.seed(&[aged(10), aged(20)]);
        let writes_before = h.backend.write_count();
        let mut rx = h.notifier.subscribe();

        let mut store = h.store();
        store.initialize();

        assert_eq!(store.shoutouts().len(), 2);
        assert_eq!(h.backend.write_count(), writes_before);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn initialize_on_empty_or_corrupt_storage_still_initializes() {
        let h = Harness::new();
        let mut store = h.store();
        store.initialize();
        assert!(store.is_initialized());
        assert!(store.shoutouts().is_empty());

        h.backend.set(DEFAULT_STORAGE_KEY, "][").unwrap();
        let mut store = h.store();
        store.initialize();
        assert!(store.is_initialized());
        assert!(store.shoutouts().is_empty());
    }

    #[test]
    fn extreme_created_at_from_storage_is_handled() {
        let h = Harness::new();
        let ancient = draft("A", "B", "ancient").into_shoutout(Uuid::new_v4(), i64::MIN);
        let far_future = draft("A", "B", "far future").into_shoutout(Uuid::new_v4(), i64::MAX);
        let fresh = aged(1_000);
        h.seed(&[ancient, far_future.clone(), fresh.clone()]);

        let mut store = h.store();
        store.initialize();
        assert_eq!(store.shoutouts(), &[far_future.clone(), fresh.clone()]);
        assert_eq!(h.stored(), vec![far_future.clone(), fresh.clone()]);

        h.seed(&[
            draft("A", "B", "again").into_shoutout(Uuid::new_v4(), i64::MIN),
            fresh.clone(),
        ]);
        store.reload();
        assert_eq!(store.purge_expired(NOW), 1);
        assert_eq!(store.shoutouts(), &[fresh]);
        assert_eq!(store.purge_expired(i64::MAX), 1);
        assert_eq!(store.purge_expired(i64::MIN), 0);
    }

    #[test]
    fn initialize_runs_once() {
        let h = Harness::new();
        let mut store = h.store();
        store.initialize();

        h.seed(&[aged(5)]);
        store.initialize();
        assert!(store.shoutouts().is_empty());
        assert!(store.is_initialized());
    }

    #[test]
    fn add_to_empty_store() {
        let h = Harness::new();
        let mut store = h.store();
        store.initialize();

        let created = store.add(draft("A", "B", "hi"));

        assert_eq!(store.shoutouts().len(), 1);
        let s = &store.shoutouts()[0];
        assert_eq!(s, &created);
        assert_eq!(s.sender, "A");
        assert_eq!(s.recipient, "B");
        assert_eq!(s.message, "hi");
        assert_eq!(s.image, None);
        assert_eq!(s.frame, "heart");
        assert_eq!(s.created_at, NOW);
        assert!(!s.id.is_nil());
        assert_eq!(h.stored(), vec![created]);
    }

    #[test]
    fn add_prepends_and_keeps_existing_entries() {
        let h = Harness::new();
        let existing = vec![aged(1_000), aged(2_000)];
        h.seed(&existing);
        let mut store = h.store();
        store.initialize();

        h.clock.advance(250);
        let created = store.add(draft("C", "D", "again"));

        assert_eq!(store.shoutouts().len(), 3);
        assert_eq!(store.shoutouts()[0], created);
        assert_eq!(created.created_at, NOW + 250);
        assert_eq!(&store.shoutouts()[1..], existing.as_slice());

        let ids: HashSet<_> = store.shoutouts().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn add_survives_storage_failure() {
        let h = Harness::with_backend(MemoryBackend::with_quota(64));
        let mut store = h.store();
        store.initialize();

        store.add(draft("A", "B", &"long message ".repeat(20)));

        assert_eq!(store.shoutouts().len(), 1);
        assert_eq!(h.backend.write_count(), 0);
    }

    #[test]
    fn delete_existing_and_missing() {
        let h = Harness::new();
        let keep = aged(1_000);
        let gone = aged(2_000);
        h.seed(&[keep.clone(), gone.clone()]);
        let mut store = h.store();
        store.initialize();

        assert!(store.delete(gone.id));
        assert_eq!(store.shoutouts(), &[keep.clone()]);
        assert_eq!(h.stored(), vec![keep.clone()]);

        let before = store.shoutouts().to_vec();
        assert!(!store.delete(Uuid::new_v4()));
        assert_eq!(store.shoutouts(), before.as_slice());
    }

    #[test]
    fn purge_notifies_and_is_idempotent() {
        let h = Harness::new();
        let fresh = aged(0);
        h.seed(&[aged(TTL_MS - 30_000), fresh.clone()]);
        let mut store = h.store();
        store.initialize();
        let mut notices = store.subscribe_notices();
        assert_eq!(store.shoutouts().len(), 2);

        let later = NOW + 60_000;
        assert_eq!(store.purge_expired(later), 1);
        assert_eq!(store.shoutouts(), &[fresh.clone()]);
        assert_eq!(h.stored(), vec![fresh]);
        assert_eq!(notices.try_recv().unwrap(), FeedNotice::FeedCleaned { removed: 1 });

        let writes = h.backend.write_count();
        assert_eq!(store.purge_expired(later), 0);
        assert_eq!(h.backend.write_count(), writes);
        assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn repeated_purge_with_nothing_expired_writes_nothing() {
        let h = Harness::new();
        h.seed(&[aged(10)]);
        let mut store = h.store();
        store.initialize();
        let writes = h.backend.write_count();

        assert_eq!(store.purge_expired(NOW), 0);
        assert_eq!(store.purge_expired(NOW), 0);
        assert_eq!(h.backend.write_count(), writes);
    }

    #[test]
    fn reload_overwrites_memory_without_merge() {
        let h = Harness::new();
        let mut store = h.store();
        store.initialize();
        for i in 0..3 {
            store.add(draft("A", "B", &format!("local {}", i)));
        }
        assert_eq!(store.shoutouts().len(), 3);

        // Another session writes its own two-entry collection
        let remote = vec![aged(5), aged(6)];
        h.adapter().save(&remote);

        store.reload();
        assert_eq!(store.shoutouts(), remote.as_slice());
    }

    #[test]
    fn sorted_views_do_not_reorder_memory() {
        let h = Harness::new();
        let old = aged(50_000);
        let mid = aged(20_000);
        let new = aged(1_000);
        h.seed(&[mid.clone(), new.clone(), old.clone()]);
        let mut store = h.store();
        store.initialize();

        let latest: Vec<_> = store.sorted(SortOrder::Latest).into_iter().map(|s| s.id).collect();
        assert_eq!(latest, vec![new.id, mid.id, old.id]);
        let oldest: Vec<_> = store.sorted(SortOrder::Oldest).into_iter().map(|s| s.id).collect();
        assert_eq!(oldest, vec![old.id, mid.id, new.id]);

        assert_eq!(store.shoutouts()[0].id, mid.id);
    }
}
