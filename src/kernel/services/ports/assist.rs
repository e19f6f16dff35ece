//! AI-assist contracts: wire payloads and the capabilities behind them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Inline completion request: a window of lines around the cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub file_name: String,
    pub previous_lines: String,
    pub text_before_cursor: String,
    pub text_after_cursor: String,
    pub next_lines: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

/// Selection rewrite request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickEditRequest {
    pub file_name: String,
    pub selected_code: String,
    pub full_code: String,
    pub instruction: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickEditResponse {
    pub edited_code: String,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("request cancelled")]
    Cancelled,
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("http error: {0}")]
    Http(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("response does not match schema: {0}")]
    Schema(String),
    #[error("provider error: {0}")]
    Provider(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl AiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AiError::Cancelled)
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Http(e.to_string())
    }
}

/// What the editing pipelines call: either the remote endpoints or the
/// in-process assist service.
#[async_trait]
pub trait AssistClient: Send + Sync {
    async fn suggest(
        &self,
        request: SuggestionRequest,
        cancel: CancellationToken,
    ) -> Result<String, AiError>;

    async fn quick_edit(
        &self,
        request: QuickEditRequest,
        cancel: CancellationToken,
    ) -> Result<String, AiError>;
}

/// Opaque text model with structured (JSON object) output.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<serde_json::Value, AiError>;
}

/// Fetches a URL and returns its content as markdown.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str, timeout: Duration) -> Result<String, AiError>;
}
