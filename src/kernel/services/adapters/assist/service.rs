use super::prompts::{documentation_block, quick_edit_prompt, suggestion_prompt};
use crate::kernel::assist::extract_urls;
use crate::kernel::services::ports::{
    AiError, AssistClient, ContentExtractor, LanguageModel, QuickEditRequest, QuickEditResponse,
    SuggestionRequest, SuggestionResponse,
};
use async_trait::async_trait;
use futures::future::join_all;
use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// In-process assist backend: prompt building, URL enrichment and schema
/// validation over an opaque language model.
pub struct AssistService {
    model: Arc<dyn LanguageModel>,
    extractor: Arc<dyn ContentExtractor>,
    url_fetch_timeout: Duration,
}

impl AssistService {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        extractor: Arc<dyn ContentExtractor>,
        url_fetch_timeout: Duration,
    ) -> Self {
        Self {
            model,
            extractor,
            url_fetch_timeout,
        }
    }

    /// Fetches every URL concurrently; failures and timeouts are dropped.
    pub async fn enrich(&self, instruction: &str, cancel: &CancellationToken) -> String {
        let urls = extract_urls(instruction);
        if urls.is_empty() {
            return String::new();
        }

        let limit = self.url_fetch_timeout;
        let fetches = urls.into_iter().map(|url| async move {
            let fetched = tokio::time::timeout(limit, self.extractor.extract(&url, limit)).await;
            match fetched {
                Ok(Ok(text)) => Some((url, text)),
                Ok(Err(e)) => {
                    tracing::debug!(url = %url, error = %e, "documentation fetch failed");
                    None
                }
                Err(_) => {
                    tracing::debug!(url = %url, "documentation fetch timed out");
                    None
                }
            }
        });

        let docs = tokio::select! {
            _ = cancel.cancelled() => return String::new(),
            docs = join_all(fetches) => docs,
        };
        let docs: Vec<_> = docs.into_iter().flatten().collect();
        documentation_block(&docs)
    }
}

#[async_trait]
impl AssistClient for AssistService {
    async fn suggest(
        &self,
        request: SuggestionRequest,
        cancel: CancellationToken,
    ) -> Result<String, AiError> {
        let prompt = suggestion_prompt(&request);
        let value = self.model.generate(&prompt, &cancel).await?;
        let parsed: SuggestionResponse =
            serde_json::from_value(value).map_err(|e| AiError::Schema(e.to_string()))?;
        Ok(strip_code_fence(&parsed.suggestion).to_string())
    }

    async fn quick_edit(
        &self,
        request: QuickEditRequest,
        cancel: CancellationToken,
    ) -> Result<String, AiError> {
        let documentation = self.enrich(&request.instruction, &cancel).await;
        if cancel.is_cancelled() {
            return Err(AiError::Cancelled);
        }
        let prompt = quick_edit_prompt(&request, &documentation);
        let value = self.model.generate(&prompt, &cancel).await?;
        let parsed: QuickEditResponse =
            serde_json::from_value(value).map_err(|e| AiError::Schema(e.to_string()))?;
        Ok(parsed.edited_code)
    }
}

fn fence_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\A```\w*\n?(.*?)\n?```\z").ok())
        .as_ref()
}

/// Unwraps a markdown code fence enclosing the whole value.
pub fn strip_code_fence(text: &str) -> &str {
    fence_regex()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map_or(text, |body| body.as_str())
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/assist/service.rs"]
mod tests;
