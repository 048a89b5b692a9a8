use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on message length, counted in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// A posted shoutout. Immutable once created; only deletion or expiry removes it.
///
/// Serialized with the field names the durable record uses:
/// `id, sender, recipient, message, image, frame, createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shoutout {
    pub id: Uuid,
    pub sender: String,
    pub recipient: String,
    pub message: String,
    /// `data:<mime>;base64,<payload>` string, if an image was attached.
    pub image: Option<String>,
    /// Frame id. Not checked against the registry; may dangle.
    pub frame: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}

/// Everything a caller supplies when posting. `id` and `created_at` are
/// assigned by the feed store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShoutout {
    pub sender: String,
    pub recipient: String,
    pub message: String,
    pub image: Option<String>,
    pub frame: String,
}

impl NewShoutout {
    pub fn into_shoutout(self, id: Uuid, created_at: i64) -> Shoutout {
        Shoutout {
            id,
            sender: self.sender,
            recipient: self.recipient,
            message: self.message,
            image: self.image,
            frame: self.frame,
            created_at,
        }
    }
}

impl Shoutout {
    /// Age in milliseconds relative to `now`. Negative for entries stamped in
    /// the future; saturates for timestamps at the ends of the `i64` range.
    pub fn age_ms(&self, now: i64) -> i64 {
        now.saturating_sub(self.created_at)
    }
}
