//! Composition side of the shoutout feed: drafts, attachments, and the
//! stylize and text-scan collaborators.
//!
//! Nothing in here is fatal. Validation problems come back as a list of
//! [`ValidationError`]s and collaborator failures as a
//! [`FeedNotice`](shoutout_types::events::FeedNotice), leaving the draft as it was.

pub mod draft;
pub mod error;
pub mod image;
pub mod ocr;
pub mod stylize;

pub use draft::{DEFAULT_SENDER, MAX_IMAGE_BYTES, ShoutoutDraft};
pub use error::{CollabError, ValidationError};
pub use image::ImageAttachment;
pub use ocr::{HttpTextScanner, MAX_SCAN_BYTES, MIN_SCANNED_CHARS, ScanImage, TextScanner};
pub use stylize::{HttpStylizer, Stylizer};
