//! Storage collaborator contract.
//!
//! The backend offers point lookups, index range scans and single-document
//! mutations. Each call is its own transaction; there is no cascading delete and
//! no recursive query, so tree walks happen in the workspace store.

use crate::models::{NodeBody, NodeId, NodeKind, OwnerId, Project, ProjectId, WorkspaceNode};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The `(project, parent, kind, name)` index rejected a write.
    #[error("a {kind} named `{name}` already exists under this parent")]
    UniqueViolation { kind: NodeKind, name: CompactString },
    #[error("document not found")]
    Missing,
}

#[derive(Clone, Debug)]
pub struct NewProject {
    pub name: String,
    pub owner: OwnerId,
    pub now: u64,
}

#[derive(Clone, Debug, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub updated_at: Option<u64>,
}

impl ProjectPatch {
    pub fn touch(now: u64) -> Self {
        Self {
            name: None,
            updated_at: Some(now),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NewNode {
    pub project: ProjectId,
    pub parent: Option<NodeId>,
    pub name: CompactString,
    pub body: NodeBody,
    pub now: u64,
}

#[derive(Clone, Debug, Default)]
pub struct NodePatch {
    pub name: Option<CompactString>,
    pub content: Option<String>,
    pub updated_at: Option<u64>,
}

pub trait WorkspaceBackend: Send + Sync {
    fn project(&self, id: ProjectId) -> Option<Project>;

    /// `by_owner` index scan, unordered.
    fn projects_by_owner(&self, owner: &OwnerId) -> Vec<Project>;

    fn insert_project(&self, new: NewProject) -> Project;

    fn patch_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<(), BackendError>;

    fn node(&self, id: NodeId) -> Option<WorkspaceNode>;

    /// `by_project` index scan, unordered.
    fn nodes_by_project(&self, project: ProjectId) -> Vec<WorkspaceNode>;

    /// `by_project_parent` index scan, unordered. `None` selects root nodes.
    fn nodes_by_parent(&self, project: ProjectId, parent: Option<NodeId>) -> Vec<WorkspaceNode>;

    fn insert_node(&self, new: NewNode) -> Result<NodeId, BackendError>;

    /// Applies a patch; text content is only accepted for text files.
    fn patch_node(&self, id: NodeId, patch: NodePatch) -> Result<(), BackendError>;

    fn delete_node(&self, id: NodeId) -> Result<(), BackendError>;
}
