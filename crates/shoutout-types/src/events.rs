use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Broadcast after every successful write of the durable feed record.
/// Every session sharing the same storage reloads when it sees one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageChange {
    /// Storage key that was written.
    pub key: String,
    /// Adapter instance that performed the write.
    pub origin: Uuid,
}

/// User-visible notices (toasts) raised by the feed and the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum FeedNotice {
    /// Periodic purge dropped expired shoutouts
    FeedCleaned { removed: usize },

    /// A draft was accepted and posted to the feed
    ShoutoutSent,

    /// Stylize was requested with an empty message
    MessageRequired,

    /// The stylize collaborator rewrote the message
    MessageStylized { style: String },

    /// The stylize collaborator failed; the message is unchanged
    StylizeFailed,

    /// Scanned text was appended to the message
    TextScanned { chars: usize },

    /// The scanner found less than the minimum amount of text
    NoTextFound,

    /// Scan input is not a supported image type
    UnsupportedFormat,

    /// The scanner failed
    ScanFailed { reason: String },

    /// Attachment exceeds the size limit
    ImageTooLarge { limit_bytes: usize },
}

impl FeedNotice {
    /// Short heading shown on the notice.
    pub fn title(&self) -> &'static str {
        match self {
            Self::FeedCleaned { .. } => "Feed Cleaned",
            Self::ShoutoutSent => "Shoutout Sent!",
            Self::MessageRequired => "Enter a message first!",
            Self::MessageStylized { .. } => "Message Stylized!",
            Self::StylizeFailed => "AI Error",
            Self::TextScanned { .. } => "Text Scanned Successfully!",
            Self::NoTextFound => "No Text Found",
            Self::UnsupportedFormat => "Unsupported format",
            Self::ScanFailed { .. } => "Scan Error",
            Self::ImageTooLarge { .. } => "Image too large",
        }
    }

    /// Longer body text.
    pub fn description(&self) -> String {
        match self {
            Self::FeedCleaned { .. } => "Some old shoutouts have been cleared.".to_string(),
            Self::ShoutoutSent => "Your message is now live on the feed.".to_string(),
            Self::MessageRequired => {
                "You need to write a message before the AI can stylize it.".to_string()
            }
            Self::MessageStylized { style } => {
                format!("Your message has been made more {}.", style)
            }
            Self::StylizeFailed => {
                "The AI failed to stylize your message. Please try again.".to_string()
            }
            Self::TextScanned { chars } => {
                format!("Added {} characters from your image.", chars)
            }
            Self::NoTextFound => {
                "Could not find readable text. Try a clearer image with printed text.".to_string()
            }
            Self::UnsupportedFormat => {
                "Please use JPEG, PNG, BMP, TIFF, or WebP images for OCR.".to_string()
            }
            Self::ScanFailed { reason } => reason.clone(),
            Self::ImageTooLarge { limit_bytes } => format!(
                "Please use an image smaller than {}MB.",
                limit_bytes / (1024 * 1024)
            ),
        }
    }

    /// Whether the notice reports a problem.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::MessageRequired
                | Self::StylizeFailed
                | Self::NoTextFound
                | Self::UnsupportedFormat
                | Self::ScanFailed { .. }
                | Self::ImageTooLarge { .. }
        )
    }
}
