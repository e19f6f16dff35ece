use crate::kernel::services::ports::{AiError, ContentExtractor, ExtractorSettings};
use async_trait::async_trait;
use std::time::Duration;

/// Reader-proxy extractor: `GET <base>/<url>` returns the page as markdown.
pub struct ReaderExtractor {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReaderExtractor {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn from_settings(http: reqwest::Client, settings: &ExtractorSettings) -> Self {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::new(http, settings.base_url.clone(), api_key)
    }

    pub fn request_url(&self, url: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), url)
    }
}

#[async_trait]
impl ContentExtractor for ReaderExtractor {
    async fn extract(&self, url: &str, timeout: Duration) -> Result<String, AiError> {
        let mut req = self
            .http
            .get(self.request_url(url))
            .header("X-Return-Format", "markdown")
            .timeout(timeout);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout(timeout)
            } else {
                AiError::from(e)
            }
        })?;
        if !resp.status().is_success() {
            return Err(AiError::Status(resp.status().as_u16()));
        }
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/reader.rs"]
mod tests;
