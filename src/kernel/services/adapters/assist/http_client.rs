use crate::kernel::services::ports::{
    AiError, AssistClient, AssistSettings, QuickEditRequest, QuickEditResponse,
    SuggestionRequest, SuggestionResponse,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Calls the assist endpoints of a running server. No retries.
#[derive(Clone)]
pub struct HttpAssistClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    suggestion_timeout: Duration,
    quick_edit_timeout: Duration,
}

impl HttpAssistClient {
    pub fn new(http: reqwest::Client, settings: &AssistSettings, token: Option<String>) -> Self {
        Self {
            http,
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            token,
            suggestion_timeout: settings.suggestion_timeout(),
            quick_edit_timeout: settings.quick_edit_timeout(),
        }
    }

    async fn post<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Resp, AiError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let mut req = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .timeout(timeout);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let send = async {
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
            resp.json::<Resp>()
                .await
                .map_err(|e| AiError::Schema(e.to_string()))
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(AiError::Cancelled),
            result = send => result,
        }
    }
}

#[async_trait]
impl AssistClient for HttpAssistClient {
    async fn suggest(
        &self,
        request: SuggestionRequest,
        cancel: CancellationToken,
    ) -> Result<String, AiError> {
        let resp: SuggestionResponse = self
            .post("/api/suggestion", &request, self.suggestion_timeout, &cancel)
            .await?;
        Ok(resp.suggestion)
    }

    async fn quick_edit(
        &self,
        request: QuickEditRequest,
        cancel: CancellationToken,
    ) -> Result<String, AiError> {
        let resp: QuickEditResponse = self
            .post("/api/quick-edit", &request, self.quick_edit_timeout, &cancel)
            .await?;
        Ok(resp.edited_code)
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/assist/http_client.rs"]
mod tests;
