//! Tree walks over a backend that only offers point lookups and index scans.

use crate::kernel::services::ports::{BlobStore, WorkspaceBackend};
use crate::models::{NodeId, PathSegment, WorkspaceNode};
use std::cmp::Ordering;

/// Deletes `root` and its whole subtree, children before parents, releasing
/// blobs on the way. Nodes that vanish mid-walk are skipped. Returns the number
/// of nodes this walk removed.
pub fn cascade_delete(backend: &dyn WorkspaceBackend, blobs: &dyn BlobStore, root: NodeId) -> usize {
    let mut removed = 0;
    // (node, children already pushed)
    let mut stack = vec![(root, false)];

    while let Some((id, expanded)) = stack.pop() {
        let Some(node) = backend.node(id) else {
            continue;
        };

        if node.is_folder() && !expanded {
            stack.push((id, true));
            for child in backend.nodes_by_parent(node.project, Some(id)) {
                stack.push((child.id, false));
            }
            continue;
        }

        if let Some(blob) = node.blob() {
            if let Err(e) = blobs.release(blob) {
                tracing::warn!(node = %id, blob = %blob, error = %e, "blob release failed");
            }
        }
        if backend.delete_node(id).is_ok() {
            removed += 1;
        }
    }

    removed
}

/// Ancestor chain from the root down to `start` inclusive. Empty when `start`
/// does not exist. A cycle in parent links stops the walk.
pub fn resolve_path(backend: &dyn WorkspaceBackend, start: NodeId) -> Vec<PathSegment> {
    let mut path = Vec::new();
    let mut current = Some(start);
    while let Some(id) = current {
        if path.iter().any(|seg: &PathSegment| seg.id == id) {
            tracing::warn!(node = %id, "parent cycle while resolving path");
            break;
        }
        let Some(node) = backend.node(id) else {
            break;
        };
        path.push(PathSegment {
            id: node.id,
            name: node.name,
        });
        current = node.parent;
    }
    path.reverse();
    path
}

/// Folders first, then by name ignoring case, then by exact name.
pub fn sort_for_tree(nodes: &mut [WorkspaceNode]) {
    nodes.sort_by(|a, b| match (a.is_folder(), b.is_folder()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    });
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/workspace/tree.rs"]
mod tests;
