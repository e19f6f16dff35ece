use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub assist: AssistSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub extractor: ExtractorSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

/// Timing and context knobs for the two AI pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistSettings {
    pub debounce_ms: u64,
    pub suggestion_timeout_ms: u64,
    pub quick_edit_timeout_ms: u64,
    pub url_fetch_timeout_ms: u64,
    /// Quiet period after the last edit before a dirty buffer is written back.
    pub autosave_ms: u64,
    pub lines_before: usize,
    pub lines_after: usize,
    /// Base URL of the assist endpoints, used by the client-side fetchers.
    pub endpoint: String,
}

impl Default for AssistSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            suggestion_timeout_ms: 10_000,
            quick_edit_timeout_ms: 30_000,
            url_fetch_timeout_ms: 8_000,
            autosave_ms: 1_500,
            lines_before: 50,
            lines_after: 30,
            endpoint: format!("http://{}", default_bind()),
        }
    }
}

impl AssistSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn suggestion_timeout(&self) -> Duration {
        Duration::from_millis(self.suggestion_timeout_ms)
    }

    pub fn quick_edit_timeout(&self) -> Duration {
        Duration::from_millis(self.quick_edit_timeout_ms)
    }

    pub fn url_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.url_fetch_timeout_ms)
    }

    pub fn autosave(&self) -> Duration {
        Duration::from_millis(self.autosave_ms)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Openai,
    Gemini,
    #[default]
    Deepseek,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Overrides the provider's default API key variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorSettings {
    #[serde(default = "default_reader_url")]
    pub base_url: String,
    #[serde(default = "default_reader_key_env")]
    pub api_key_env: String,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            base_url: default_reader_url(),
            api_key_env: default_reader_key_env(),
        }
    }
}

fn default_reader_url() -> String {
    "https://r.jina.ai".to_string()
}

fn default_reader_key_env() -> String {
    "JINA_API_KEY".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Bearer token -> owner id.
    #[serde(default)]
    pub tokens: BTreeMap<String, String>,
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
