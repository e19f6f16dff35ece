//! Headless core: workspace store, tab sessions, assist pipelines and the
//! effects they hand to the host.

pub mod assist;
pub mod editor_session;
pub mod effect;
pub mod services;
pub mod session;
pub mod workspace;

pub use editor_session::{EditorSession, KeyOutcome};
pub use effect::Effect;
pub use session::{SessionRegistry, TabAction, TabState};
pub use workspace::{ConflictOp, WorkspaceError, WorkspaceResult, WorkspaceStore};
