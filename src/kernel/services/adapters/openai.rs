//! OpenAI-compatible chat completion model (`/chat/completions` with JSON
//! object output). Every supported provider speaks this dialect.

use crate::kernel::services::ports::{AiError, LanguageModel, ProviderKind, ProviderSettings};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProviderPreset {
    pub base_url: &'static str,
    pub api_key_env: &'static str,
    pub model: &'static str,
}

pub fn preset(kind: ProviderKind) -> ProviderPreset {
    match kind {
        ProviderKind::Openai => ProviderPreset {
            base_url: "https://api.openai.com/v1",
            api_key_env: "OPENAI_API_KEY",
            model: "gpt-4o",
        },
        ProviderKind::Gemini => ProviderPreset {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
            api_key_env: "GOOGLE_GENERATIVE_AI_API_KEY",
            model: "gemini-2.0-flash",
        },
        ProviderKind::Deepseek => ProviderPreset {
            base_url: "https://api.siliconflow.cn/v1",
            api_key_env: "DEEPSEEK_API_KEY",
            model: "deepseek-ai/DeepSeek-V3.2",
        },
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiCompatibleModel {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiCompatibleModel {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Resolves preset, overrides and the API key from the environment.
    pub fn from_settings(http: reqwest::Client, settings: &ProviderSettings) -> Self {
        let preset = preset(settings.kind);
        let key_env = settings
            .api_key_env
            .as_deref()
            .unwrap_or(preset.api_key_env);
        let api_key = std::env::var(key_env).ok().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!(provider = ?settings.kind, env = key_env, "model API key not set");
        }
        Self::new(
            http,
            settings.base_url.as_deref().unwrap_or(preset.base_url),
            settings.model.as_deref().unwrap_or(preset.model),
            api_key,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<Value, AiError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::Config("missing API key".to_string()))?;
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let resp = self
            .http
            .post(url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp.text().await.unwrap_or_default();
            tracing::debug!(%status, detail = %detail, "provider rejected request");
            return Err(AiError::Status(status.as_u16()));
        }

        let reply: ChatResponse = resp.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AiError::Provider("empty completion".to_string()))?;
        serde_json::from_str(&content).map_err(|e| AiError::Schema(e.to_string()))
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<Value, AiError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(AiError::Cancelled),
            result = self.complete(prompt) => result,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/openai.rs"]
mod tests;
