//! Local, time-limited shoutout feed.
//!
//! The whole feed lives in one JSON record behind a [`StorageBackend`]. Each
//! session keeps its own [`FeedStore`] in memory, writes the full collection
//! back after every change, and reloads when a [`ChangeNotifier`] reports a
//! write from another session. Overlapping writes from different sessions are
//! last-write-wins; nothing is merged.

pub mod adapter;
pub mod backend;
pub mod clock;
pub mod config;
pub mod error;
pub mod expiry;
pub mod feed;
pub mod notifier;
pub mod session;
pub mod view;

pub use adapter::{DEFAULT_STORAGE_KEY, FeedRepository, StoreAdapter};
pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FeedConfig;
pub use error::StoreError;
pub use expiry::{TTL_MS, filter_live, is_live};
pub use feed::FeedStore;
pub use notifier::ChangeNotifier;
pub use session::{FeedSession, SharedFeed};
pub use view::{Carousel, FeedEntry, SortOrder, entries};
