use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::{Error, Result};

/// Underlying lookup technique for one retailer.
///
/// Implementations return the raw price text for a locator or signal
/// unavailability; they know nothing about fallback policy, which lives in
/// [`crate::sources::SourceAdapter`].
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    async fn fetch_raw(&self, retailer: &str, locator: &str) -> Result<String>;
}

/// HTTP implementation: GETs the locator and extracts the price text from a
/// JSON `price` field or a plain-text body.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        HttpFetcher {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceFetcher for HttpFetcher {
    async fn fetch_raw(&self, retailer: &str, locator: &str) -> Result<String> {
        let unavailable = |reason: String| Error::SourceUnavailable {
            retailer: retailer.to_string(),
            reason,
        };

        let response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| unavailable(format!("body read failed: {}", e)))?;

        extract_price_text(&body).ok_or_else(|| unavailable("price field missing".to_string()))
    }
}

/// Pulls the raw price text out of a response body. JSON bodies must carry a
/// `price` field (string or number); anything else is taken verbatim.
fn extract_price_text(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
        return match value.get("price")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
    }

    Some(trimmed.to_string())
}
