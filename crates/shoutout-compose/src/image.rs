use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::CollabError;

/// An image encoded as a `data:<mime>;base64,<payload>` string, the form in
/// which it is stored on a shoutout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    mime: String,
    size: usize,
    data_url: String,
}

impl ImageAttachment {
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self {
            mime: mime.to_string(),
            size: bytes.len(),
            data_url: format!("data:{};base64,{}", mime, BASE64.encode(bytes)),
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Size of the decoded payload in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn into_data_url(self) -> String {
        self.data_url
    }
}

/// Split a base64 data URL into its mime type and decoded bytes.
pub fn decode_data_url(data_url: &str) -> Result<(String, Vec<u8>), CollabError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or(CollabError::MalformedDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(CollabError::MalformedDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(CollabError::MalformedDataUrl)?;
    let bytes = BASE64
        .decode(payload)
        .map_err(|_| CollabError::MalformedDataUrl)?;
    Ok((mime.to_string(), bytes))
}
