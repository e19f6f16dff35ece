//! Data models: ids, projects, workspace nodes, document buffer.

pub mod ids;
pub mod node;
pub mod optimistic;
pub mod project;
pub mod text_buffer;

pub use ids::{BlobRef, NodeId, OwnerId, ProjectId};
pub use node::{NodeBody, NodeKind, PathSegment, WorkspaceNode};
pub use optimistic::{Keyed, OptimisticList, PendingId};
pub use project::{ExportStatus, ImportStatus, Project};
pub use text_buffer::{slice_to_cow, TextBuffer, TextEdit};
