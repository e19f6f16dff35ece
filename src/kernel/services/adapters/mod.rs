//! Service adapters: storage, HTTP and async runtime implementations.

pub mod assist;
pub mod identity;
pub mod memory;
pub mod openai;
pub mod reader;
pub mod runtime;
pub mod settings;

pub use assist::{AssistService, HttpAssistClient};
pub use identity::StaticTokenGate;
pub use memory::{MemoryBackend, MemoryBlobStore};
pub use openai::{preset, OpenAiCompatibleModel, ProviderPreset};
pub use reader::ReaderExtractor;
pub use runtime::{AppMessage, AssistRuntime};
pub use settings::{
    ensure_settings_file, ensure_settings_file_at, get_log_dir, get_settings_path, load_settings,
    load_settings_from, SettingsError,
};
