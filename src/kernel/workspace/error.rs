use crate::kernel::services::ports::BackendError;
use crate::models::NodeKind;
use compact_str::CompactString;
use thiserror::Error;

/// Which write hit the unique sibling name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictOp {
    Create,
    Rename,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("Unauthorized access to this project")]
    Unauthorized,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{}", conflict_message(.kind, .op))]
    Conflict {
        kind: NodeKind,
        name: CompactString,
        op: ConflictOp,
    },
    #[error("{0}")]
    InvalidOperation(&'static str),
}

fn conflict_message(kind: &NodeKind, op: &ConflictOp) -> String {
    match (op, kind) {
        (ConflictOp::Create, NodeKind::File) => "File already exists".to_string(),
        (ConflictOp::Create, NodeKind::Folder) => "Folder already exists".to_string(),
        (ConflictOp::Rename, kind) => {
            format!("A {kind} with this name already exists in this project")
        }
    }
}

impl WorkspaceError {
    /// Re-tags a backend unique violation raised by a rename.
    pub(super) fn on_rename(self) -> Self {
        match self {
            WorkspaceError::Conflict { kind, name, .. } => WorkspaceError::Conflict {
                kind,
                name,
                op: ConflictOp::Rename,
            },
            other => other,
        }
    }
}

impl From<BackendError> for WorkspaceError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::UniqueViolation { kind, name } => WorkspaceError::Conflict {
                kind,
                name,
                op: ConflictOp::Create,
            },
            BackendError::Missing => WorkspaceError::NotFound("Item"),
        }
    }
}
