use thiserror::Error;

/// A draft field that fails validation. Display text is what the form shows
/// next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Sender name is required.")]
    SenderRequired,

    #[error("Recipient name is required.")]
    RecipientRequired,

    #[error("Message cannot be empty.")]
    MessageEmpty,

    #[error("Message is too long.")]
    MessageTooLong { chars: usize, max: usize },

    #[error("Please select a frame.")]
    FrameRequired,

    #[error("Image is too large.")]
    ImageTooLarge { bytes: usize, max: usize },
}

impl ValidationError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::SenderRequired => "sender",
            Self::RecipientRequired => "recipient",
            Self::MessageEmpty | Self::MessageTooLong { .. } => "message",
            Self::FrameRequired => "frame",
            Self::ImageTooLarge { .. } => "image",
        }
    }
}

/// Failure talking to an external collaborator.
#[derive(Debug, Error)]
pub enum CollabError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("collaborator returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("collaborator returned an empty result")]
    EmptyResponse,

    #[error("unsupported image type: {0}")]
    UnsupportedFormat(String),

    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("malformed data URL")]
    MalformedDataUrl,
}
