use shoutout_types::Shoutout;
use shoutout_types::frames::{self, ShoutoutFrame};

/// Display order for a feed listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
}

/// Copy of `shoutouts` ordered by `created_at`. Ties keep their input order.
pub fn sorted(shoutouts: &[Shoutout], order: SortOrder) -> Vec<Shoutout> {
    let mut out = shoutouts.to_vec();
    match order {
        SortOrder::Latest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOrder::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }
    out
}

/// A shoutout paired with its resolved frame, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub shoutout: Shoutout,
    /// `None` when the frame id is not in the registry; render unthemed.
    pub frame: Option<&'static ShoutoutFrame>,
}

/// Sorted listing with each frame id resolved against the registry.
pub fn entries(shoutouts: &[Shoutout], order: SortOrder) -> Vec<FeedEntry> {
    sorted(shoutouts, order)
        .into_iter()
        .map(|shoutout| {
            let frame = frames::find(&shoutout.frame);
            FeedEntry { shoutout, frame }
        })
        .collect()
}

/// One-at-a-time cursor over a feed listing.
///
/// Wraps around at either end once there is more than one entry.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    len: usize,
    index: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    /// Adapt to a feed that changed size, keeping the position when possible.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = len.saturating_sub(1);
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn loops(&self) -> bool {
        self.len > 1
    }

    pub fn next(&mut self) {
        if self.loops() {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.loops() {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// "Shoutout N of M", or `None` for an empty feed.
    pub fn label(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!("Shoutout {} of {}", self.index + 1, self.len))
    }
}
