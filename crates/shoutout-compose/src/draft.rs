use tracing::{debug, warn};

use shoutout_store::FeedStore;
use shoutout_types::api::{Style, StylizeRequest};
use shoutout_types::events::FeedNotice;
use shoutout_types::frames::DEFAULT_FRAME;
use shoutout_types::models::MAX_MESSAGE_CHARS;
use shoutout_types::{NewShoutout, Shoutout};

use crate::error::{CollabError, ValidationError};
use crate::image::ImageAttachment;
use crate::ocr::{self, MAX_SCAN_BYTES, MIN_SCANNED_CHARS, ScanImage, TextScanner};
use crate::stylize::Stylizer;

/// Largest image that can be attached to a shoutout.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

pub const DEFAULT_SENDER: &str = "Anonymous";

/// A shoutout being composed. Fields are edited freely; nothing is checked
/// until [`validate`](Self::validate) or [`submit`](Self::submit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoutoutDraft {
    pub sender: String,
    pub recipient: String,
    pub message: String,
    pub frame: String,
    image: Option<ImageAttachment>,
}

impl Default for ShoutoutDraft {
    fn default() -> Self {
        Self {
            sender: DEFAULT_SENDER.to_string(),
            recipient: String::new(),
            message: String::new(),
            frame: DEFAULT_FRAME.to_string(),
            image: None,
        }
    }
}

impl ShoutoutDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref()
    }

    /// Replace the attachment without any checks, e.g. when restoring a
    /// saved draft. [`validate`](Self::validate) still enforces the size limit.
    pub fn set_image(&mut self, image: Option<ImageAttachment>) {
        self.image = image;
    }

    /// Attach an image. An oversized image is refused and the current
    /// attachment is kept.
    pub fn attach_image(&mut self, mime: &str, bytes: &[u8]) -> Result<(), FeedNotice> {
        if bytes.len() > MAX_IMAGE_BYTES {
            debug!("Refusing {} byte attachment", bytes.len());
            return Err(FeedNotice::ImageTooLarge {
                limit_bytes: MAX_IMAGE_BYTES,
            });
        }
        self.image = Some(ImageAttachment::encode(mime, bytes));
        Ok(())
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    /// Back to a blank form with the default sender and frame.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check every field and report all problems at once.
    pub fn validate(&self) -> Result<NewShoutout, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.sender.trim().is_empty() {
            errors.push(ValidationError::SenderRequired);
        }
        if self.recipient.trim().is_empty() {
            errors.push(ValidationError::RecipientRequired);
        }

        let chars = self.message.chars().count();
        if self.message.trim().is_empty() {
            errors.push(ValidationError::MessageEmpty);
        } else if chars > MAX_MESSAGE_CHARS {
            errors.push(ValidationError::MessageTooLong {
                chars,
                max: MAX_MESSAGE_CHARS,
            });
        }

        if self.frame.trim().is_empty() {
            errors.push(ValidationError::FrameRequired);
        }
        if let Some(image) = self.image.as_ref().filter(|i| i.size() > MAX_IMAGE_BYTES) {
            errors.push(ValidationError::ImageTooLarge {
                bytes: image.size(),
                max: MAX_IMAGE_BYTES,
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewShoutout {
            sender: self.sender.clone(),
            recipient: self.recipient.clone(),
            message: self.message.clone(),
            image: self.image.as_ref().map(|i| i.data_url().to_string()),
            frame: self.frame.clone(),
        })
    }

    /// Validate, post to `feed`, and reset the draft. On validation failure
    /// the draft is left untouched.
    pub fn submit(
        &mut self,
        feed: &mut FeedStore,
    ) -> Result<(Shoutout, FeedNotice), Vec<ValidationError>> {
        let data = self.validate()?;
        let posted = feed.add(data);
        self.reset();
        Ok((posted, FeedNotice::ShoutoutSent))
    }

    /// Ask `stylizer` to rewrite the message. On any failure the message is
    /// unchanged.
    pub async fn stylize<S: Stylizer>(&mut self, stylizer: &S, style: Style) -> FeedNotice {
        if self.message.trim().is_empty() {
            return FeedNotice::MessageRequired;
        }

        let request = StylizeRequest {
            message: self.message.clone(),
            style,
        };
        match stylizer.stylize(request).await {
            Ok(resp) if !resp.stylized_message.trim().is_empty() => {
                self.message = resp.stylized_message;
                FeedNotice::MessageStylized {
                    style: style.as_str().to_string(),
                }
            }
            Ok(_) => {
                warn!("Stylizer returned an empty message");
                FeedNotice::StylizeFailed
            }
            Err(e) => {
                warn!("Stylize failed: {}", e);
                FeedNotice::StylizeFailed
            }
        }
    }

    /// Recognize text in `image` and append it to the message.
    pub async fn scan_text<T: TextScanner>(&mut self, scanner: &T, image: &ScanImage) -> FeedNotice {
        match image.check() {
            Ok(()) => {}
            Err(CollabError::UnsupportedFormat(_)) => return FeedNotice::UnsupportedFormat,
            Err(CollabError::TooLarge { .. }) => {
                return FeedNotice::ImageTooLarge {
                    limit_bytes: MAX_SCAN_BYTES,
                };
            }
            Err(e) => return scan_failed(e),
        }

        let raw = match scanner.scan(image).await {
            Ok(raw) => raw.unwrap_or_default(),
            Err(e) => return scan_failed(e),
        };

        let text = ocr::normalize_text(&raw);
        let chars = text.chars().count();
        if chars < MIN_SCANNED_CHARS {
            debug!("Scan produced {} usable chars, ignoring", chars);
            return FeedNotice::NoTextFound;
        }

        self.message = ocr::merge_scanned(&self.message, &text);
        FeedNotice::TextScanned { chars }
    }
}

fn scan_failed(e: CollabError) -> FeedNotice {
    warn!("Text scan failed: {}", e);
    FeedNotice::ScanFailed {
        reason: "Failed to scan image. Please try again.".to_string(),
    }
}
