//! Service ports: traits + data contracts.

pub mod assist;
pub mod backend;
pub mod blob;
pub mod clock;
pub mod identity;
pub mod settings;

pub use assist::{
    AiError, AssistClient, ContentExtractor, LanguageModel, QuickEditRequest, QuickEditResponse,
    SuggestionRequest, SuggestionResponse,
};
pub use backend::{BackendError, NewNode, NewProject, NodePatch, ProjectPatch, WorkspaceBackend};
pub use blob::{BlobError, BlobStore};
pub use clock::{Clock, MonotonicClock};
pub use identity::{IdentityGate, Unauthenticated};
pub use settings::{
    AssistSettings, AuthSettings, ExtractorSettings, ProviderKind, ProviderSettings,
    ServerSettings, Settings,
};
