//! Workspace tree nodes.

use super::ids::{BlobRef, NodeId, ProjectId};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file is text XOR binary; a folder carries nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "body", rename_all = "lowercase")]
pub enum NodeBody {
    Folder,
    Text {
        content: String,
    },
    Binary {
        #[serde(rename = "storageId")]
        blob: BlobRef,
    },
}

impl NodeBody {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeBody::Folder => NodeKind::Folder,
            NodeBody::Text { .. } | NodeBody::Binary { .. } => NodeKind::File,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceNode {
    pub id: NodeId,
    pub project: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    pub name: CompactString,
    #[serde(flatten)]
    pub body: NodeBody,
    pub updated_at: u64,
}

impl WorkspaceNode {
    pub fn kind(&self) -> NodeKind {
        self.body.kind()
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    pub fn is_text_file(&self) -> bool {
        matches!(self.body, NodeBody::Text { .. })
    }

    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Text { content } => Some(content),
            _ => None,
        }
    }

    pub fn blob(&self) -> Option<&BlobRef> {
        match &self.body {
            NodeBody::Binary { blob } => Some(blob),
            _ => None,
        }
    }
}

/// One entry of a resolved path, root first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub id: NodeId,
    pub name: CompactString,
}
