//! In-process storage: slotmap tables plus the secondary indexes a document
//! database would keep (`by_owner`, `by_project_parent`, and the unique
//! `(project, parent, kind, name)` index).

use crate::kernel::services::ports::{
    BackendError, BlobError, BlobStore, NewNode, NewProject, NodePatch, ProjectPatch,
    WorkspaceBackend,
};
use crate::models::{BlobRef, NodeBody, NodeId, OwnerId, Project, ProjectId, WorkspaceNode};
use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type ParentKey = (ProjectId, Option<NodeId>);

#[derive(Default)]
struct Tables {
    projects: SlotMap<ProjectId, Project>,
    nodes: SlotMap<NodeId, WorkspaceNode>,
    by_parent: FxHashMap<ParentKey, Vec<NodeId>>,
}

impl Tables {
    fn sibling_named(
        &self,
        key: ParentKey,
        node: &WorkspaceNode,
        name: &str,
        except: Option<NodeId>,
    ) -> bool {
        self.by_parent.get(&key).is_some_and(|ids| {
            ids.iter()
                .filter(|id| Some(**id) != except)
                .filter_map(|id| self.nodes.get(*id))
                .any(|sibling| sibling.kind() == node.kind() && sibling.name == name)
        })
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorkspaceBackend for MemoryBackend {
    fn project(&self, id: ProjectId) -> Option<Project> {
        self.lock().projects.get(id).cloned()
    }

    fn projects_by_owner(&self, owner: &OwnerId) -> Vec<Project> {
        self.lock()
            .projects
            .values()
            .filter(|p| &p.owner == owner)
            .cloned()
            .collect()
    }

    fn insert_project(&self, new: NewProject) -> Project {
        let mut tables = self.lock();
        let id = tables.projects.insert_with_key(|id| Project {
            id,
            name: new.name,
            owner: new.owner,
            created_at: new.now,
            updated_at: new.now,
            import_status: None,
            export_status: None,
            export_repo_url: None,
        });
        tables.projects[id].clone()
    }

    fn patch_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<(), BackendError> {
        let mut tables = self.lock();
        let project = tables.projects.get_mut(id).ok_or(BackendError::Missing)?;
        if let Some(name) = patch.name {
            project.name = name;
        }
        if let Some(at) = patch.updated_at {
            project.updated_at = at;
        }
        Ok(())
    }

    fn node(&self, id: NodeId) -> Option<WorkspaceNode> {
        self.lock().nodes.get(id).cloned()
    }

    fn nodes_by_project(&self, project: ProjectId) -> Vec<WorkspaceNode> {
        self.lock()
            .nodes
            .values()
            .filter(|n| n.project == project)
            .cloned()
            .collect()
    }

    fn nodes_by_parent(&self, project: ProjectId, parent: Option<NodeId>) -> Vec<WorkspaceNode> {
        let tables = self.lock();
        let Some(ids) = tables.by_parent.get(&(project, parent)) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| tables.nodes.get(*id))
            .cloned()
            .collect()
    }

    fn insert_node(&self, new: NewNode) -> Result<NodeId, BackendError> {
        let mut tables = self.lock();
        let key = (new.project, new.parent);
        let kind = new.body.kind();
        let collides = tables.by_parent.get(&key).is_some_and(|ids| {
            ids.iter()
                .filter_map(|id| tables.nodes.get(*id))
                .any(|n| n.kind() == kind && n.name == new.name)
        });
        if collides {
            return Err(BackendError::UniqueViolation {
                kind,
                name: new.name,
            });
        }

        let id = tables.nodes.insert_with_key(|id| WorkspaceNode {
            id,
            project: new.project,
            parent: new.parent,
            name: new.name,
            body: new.body,
            updated_at: new.now,
        });
        tables.by_parent.entry(key).or_default().push(id);
        Ok(id)
    }

    fn patch_node(&self, id: NodeId, patch: NodePatch) -> Result<(), BackendError> {
        let mut tables = self.lock();
        let node = tables.nodes.get(id).ok_or(BackendError::Missing)?;
        let key = (node.project, node.parent);

        if patch.content.is_some() && !matches!(node.body, NodeBody::Text { .. }) {
            return Err(BackendError::Missing);
        }
        if let Some(name) = patch.name.as_deref() {
            if tables.sibling_named(key, node, name, Some(id)) {
                return Err(BackendError::UniqueViolation {
                    kind: node.kind(),
                    name: CompactString::from(name),
                });
            }
        }

        let node = tables.nodes.get_mut(id).ok_or(BackendError::Missing)?;
        if let Some(name) = patch.name {
            node.name = name;
        }
        if let (Some(content), NodeBody::Text { content: current }) =
            (patch.content, &mut node.body)
        {
            *current = content;
        }
        if let Some(at) = patch.updated_at {
            node.updated_at = at;
        }
        Ok(())
    }

    fn delete_node(&self, id: NodeId) -> Result<(), BackendError> {
        let mut tables = self.lock();
        let node = tables.nodes.remove(id).ok_or(BackendError::Missing)?;
        let key = (node.project, node.parent);
        if let Some(ids) = tables.by_parent.get_mut(&key) {
            ids.retain(|sibling| *sibling != id);
            if ids.is_empty() {
                tables.by_parent.remove(&key);
            }
        }
        Ok(())
    }
}

/// Blob references known to this process. Release drops the reference.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<FxHashSet<BlobRef>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, blob: BlobRef) {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(blob);
    }

    pub fn contains(&self, blob: &BlobRef) -> bool {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(blob)
    }
}

impl BlobStore for MemoryBlobStore {
    fn release(&self, blob: &BlobRef) -> Result<(), BlobError> {
        let removed = self
            .blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(blob);
        if removed {
            Ok(())
        } else {
            Err(BlobError::NotFound(blob.clone()))
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;
