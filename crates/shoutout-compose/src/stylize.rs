use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use shoutout_store::FeedConfig;
use shoutout_types::api::{StylizeRequest, StylizeResponse};

use crate::error::CollabError;

/// Rewrites a message in a requested style.
pub trait Stylizer: Send + Sync {
    fn stylize(
        &self,
        request: StylizeRequest,
    ) -> impl Future<Output = Result<StylizeResponse, CollabError>> + Send;
}

/// Stylizer backed by a JSON endpoint:
/// `POST {message, style}` → `{stylizedMessage}`.
#[derive(Debug, Clone)]
pub struct HttpStylizer {
    client: Client,
    endpoint: String,
}

impl HttpStylizer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, CollabError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// `None` when no stylize endpoint is configured.
    pub fn from_config(config: &FeedConfig) -> Result<Option<Self>, CollabError> {
        config
            .stylize_url
            .as_ref()
            .map(|url| Self::new(url.clone(), config.http_timeout))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Stylizer for HttpStylizer {
    async fn stylize(&self, request: StylizeRequest) -> Result<StylizeResponse, CollabError> {
        debug!("Stylizing {} chars as {}", request.message.chars().count(), request.style.as_str());

        let resp = self.client.post(&self.endpoint).json(&request).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            warn!("Stylize endpoint returned {}: {}", status, body);
            return Err(CollabError::Status { status, body });
        }

        let parsed: StylizeResponse = resp.json().await?;
        if parsed.stylized_message.trim().is_empty() {
            return Err(CollabError::EmptyResponse);
        }
        Ok(parsed)
    }
}

