use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use shoutout_store::FeedConfig;
use shoutout_types::api::ScanResponse;

use crate::error::CollabError;
use crate::image::decode_data_url;

/// Image types the scanner accepts.
pub const SUPPORTED_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/png",
    "image/jpg",
    "image/bmp",
    "image/tiff",
    "image/webp",
];

pub const MAX_SCAN_BYTES: usize = 5 * 1024 * 1024;

/// Shorter results are treated as noise.
pub const MIN_SCANNED_CHARS: usize = 3;

/// Raw image handed to a [`TextScanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ScanImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    pub fn from_data_url(data_url: &str) -> Result<Self, CollabError> {
        let (mime, bytes) = decode_data_url(data_url)?;
        Ok(Self { mime, bytes })
    }

    /// Reject unsupported types and oversized images before any scan.
    pub fn check(&self) -> Result<(), CollabError> {
        if !SUPPORTED_TYPES.contains(&self.mime.as_str()) {
            return Err(CollabError::UnsupportedFormat(self.mime.clone()));
        }
        if self.bytes.len() > MAX_SCAN_BYTES {
            return Err(CollabError::TooLarge {
                size: self.bytes.len(),
                limit: MAX_SCAN_BYTES,
            });
        }
        Ok(())
    }
}

/// Best-effort text recognition. `Ok(None)` means nothing was recognized.
pub trait TextScanner: Send + Sync {
    fn scan(
        &self,
        image: &ScanImage,
    ) -> impl Future<Output = Result<Option<String>, CollabError>> + Send;
}

/// Scanner backed by an HTTP endpoint: the raw image is POSTed with its
/// content type and the reply is `{text}`.
#[derive(Debug, Clone)]
pub struct HttpTextScanner {
    client: Client,
    endpoint: String,
}

impl HttpTextScanner {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CollabError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// `None` when no OCR endpoint is configured.
    pub fn from_config(config: &FeedConfig) -> Result<Option<Self>, CollabError> {
        config
            .ocr_url
            .as_ref()
            .map(|url| Self::new(url.clone(), config.http_timeout))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextScanner for HttpTextScanner {
    async fn scan(&self, image: &ScanImage) -> Result<Option<String>, CollabError> {
        debug!("Scanning {} byte {} image", image.bytes.len(), image.mime);

        let resp = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, image.mime.as_str())
            .body(image.bytes.clone())
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!("OCR endpoint returned {}: {}", status, body);
            return Err(CollabError::Status { status, body });
        }

        let parsed: ScanResponse = resp.json().await?;
        Ok(parsed.text)
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Append `scanned` to `message`, on a new line unless the message is empty
/// or already ends with one.
pub fn merge_scanned(message: &str, scanned: &str) -> String {
    if message.is_empty() || message.ends_with('\n') {
        format!("{}{}", message, scanned)
    } else {
        format!("{}\n{}", message, scanned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(normalize_text("  Happy \n\n Valentine's\tDay  "), "Happy Valentine's Day");
        assert_eq!(normalize_text(" \n\t "), "");
    }

    #[test]
    fn merge_adds_a_newline_only_when_needed() {
        assert_eq!(merge_scanned("", "scanned"), "scanned");
        assert_eq!(merge_scanned("hello", "scanned"), "hello\nscanned");
        assert_eq!(merge_scanned("hello\n", "scanned"), "hello\nscanned");
    }

    #[test]
    fn check_rejects_unsupported_types() {
        let gif = ScanImage::new("image/gif", vec![0; 16]);
        assert!(matches!(gif.check(), Err(CollabError::UnsupportedFormat(m)) if m == "image/gif"));

        for mime in SUPPORTED_TYPES {
            assert!(ScanImage::new(mime, vec![0; 16]).check().is_ok(), "{}", mime);
        }
    }

    #[test]
    fn check_rejects_oversized_images() {
        let at_limit = ScanImage::new("image/png", vec![0; MAX_SCAN_BYTES]);
        assert!(at_limit.check().is_ok());

        let over = ScanImage::new("image/png", vec![0; MAX_SCAN_BYTES + 1]);
        assert!(matches!(over.check(), Err(CollabError::TooLarge { .. })));
    }

    #[test]
    fn scan_image_from_data_url() {
        let image = ScanImage::from_data_url("data:image/jpeg;base64,AAEC").unwrap();
        assert_eq!(image.mime, "image/jpeg");
        assert_eq!(image.bytes, vec![0, 1, 2]);
    }
}
