//! Owner-scoped project and file tree operations.
//!
//! Every operation resolves the owning project first and checks the caller
//! against its owner. Sibling names are unique per `(parent, kind)`: a file and
//! a folder may share a name, two files (or two folders) may not. Each mutation
//! refreshes the project's `updated_at`.

mod error;
mod tree;

pub use error::{ConflictOp, WorkspaceError};
pub use tree::{cascade_delete, resolve_path, sort_for_tree};

use crate::kernel::services::ports::{
    BlobStore, Clock, NewNode, NewProject, NodePatch, ProjectPatch, WorkspaceBackend,
};
use crate::models::{
    BlobRef, NodeBody, NodeId, NodeKind, OwnerId, PathSegment, Project, ProjectId, WorkspaceNode,
};
use compact_str::CompactString;
use rustc_hash::FxHashSet;
use std::sync::Arc;

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Clone)]
pub struct WorkspaceStore {
    backend: Arc<dyn WorkspaceBackend>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
}

impl WorkspaceStore {
    pub fn new(
        backend: Arc<dyn WorkspaceBackend>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            blobs,
            clock,
        }
    }

    // ---- projects ----

    pub fn create_project(&self, caller: &OwnerId, name: &str) -> Project {
        let project = self.backend.insert_project(NewProject {
            name: name.to_string(),
            owner: caller.clone(),
            now: self.clock.now_ms(),
        });
        tracing::info!(project = %project.id, owner = %caller, "project created");
        project
    }

    /// Caller's projects, newest first.
    pub fn list_projects(&self, caller: &OwnerId) -> Vec<Project> {
        let mut projects = self.backend.projects_by_owner(caller);
        projects.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.token().cmp(&a.id.token()))
        });
        projects
    }

    pub fn list_projects_partial(&self, caller: &OwnerId, limit: usize) -> Vec<Project> {
        let mut projects = self.list_projects(caller);
        projects.truncate(limit);
        projects
    }

    pub fn get_project(&self, caller: &OwnerId, id: ProjectId) -> WorkspaceResult<Project> {
        self.owned_project(caller, id)
    }

    pub fn rename_project(
        &self,
        caller: &OwnerId,
        id: ProjectId,
        name: &str,
    ) -> WorkspaceResult<Project> {
        self.owned_project(caller, id)?;
        self.backend.patch_project(
            id,
            ProjectPatch {
                name: Some(name.to_string()),
                updated_at: Some(self.clock.now_ms()),
            },
        )?;
        self.backend
            .project(id)
            .ok_or(WorkspaceError::NotFound("Project"))
    }

    // ---- queries ----

    pub fn get_file(&self, caller: &OwnerId, id: NodeId) -> WorkspaceResult<WorkspaceNode> {
        self.owned_node(caller, id)
    }

    /// Every node of the project, unordered.
    pub fn list_by_project(
        &self,
        caller: &OwnerId,
        project: ProjectId,
    ) -> WorkspaceResult<Vec<WorkspaceNode>> {
        self.owned_project(caller, project)?;
        Ok(self.backend.nodes_by_project(project))
    }

    /// Direct children of `parent` (root when `None`), folders first then by
    /// name.
    pub fn list_children(
        &self,
        caller: &OwnerId,
        project: ProjectId,
        parent: Option<NodeId>,
    ) -> WorkspaceResult<Vec<WorkspaceNode>> {
        self.owned_project(caller, project)?;
        let mut children = self.backend.nodes_by_parent(project, parent);
        sort_for_tree(&mut children);
        Ok(children)
    }

    /// Root-to-node chain. A missing node yields an empty path.
    pub fn resolve_path(&self, caller: &OwnerId, id: NodeId) -> WorkspaceResult<Vec<PathSegment>> {
        let Some(node) = self.backend.node(id) else {
            return Ok(Vec::new());
        };
        self.owned_project(caller, node.project)?;
        Ok(resolve_path(self.backend.as_ref(), id))
    }

    // ---- mutations ----

    pub fn create_file(
        &self,
        caller: &OwnerId,
        project: ProjectId,
        parent: Option<NodeId>,
        name: &str,
        content: &str,
    ) -> WorkspaceResult<NodeId> {
        self.create_node(
            caller,
            project,
            parent,
            name,
            NodeBody::Text {
                content: content.to_string(),
            },
        )
    }

    pub fn create_folder(
        &self,
        caller: &OwnerId,
        project: ProjectId,
        parent: Option<NodeId>,
        name: &str,
    ) -> WorkspaceResult<NodeId> {
        self.create_node(caller, project, parent, name, NodeBody::Folder)
    }

    pub fn create_binary_file(
        &self,
        caller: &OwnerId,
        project: ProjectId,
        parent: Option<NodeId>,
        name: &str,
        blob: BlobRef,
    ) -> WorkspaceResult<NodeId> {
        self.create_node(caller, project, parent, name, NodeBody::Binary { blob })
    }

    /// Renames within the current parent. The node itself is excluded from
    /// the sibling check, so renaming to the current name succeeds.
    pub fn rename(&self, caller: &OwnerId, id: NodeId, new_name: &str) -> WorkspaceResult<()> {
        let node = self.owned_node(caller, id)?;
        let name = CompactString::from(new_name);
        let taken = self
            .backend
            .nodes_by_parent(node.project, node.parent)
            .iter()
            .any(|s| s.id != id && s.kind() == node.kind() && s.name == name);
        if taken {
            return Err(WorkspaceError::Conflict {
                kind: node.kind(),
                name,
                op: ConflictOp::Rename,
            });
        }

        let now = self.clock.now_ms();
        self.backend
            .patch_node(
                id,
                NodePatch {
                    name: Some(name),
                    updated_at: Some(now),
                    ..NodePatch::default()
                },
            )
            .map_err(|e| WorkspaceError::from(e).on_rename())?;
        self.touch(node.project, now);
        Ok(())
    }

    /// Removes a file, or a folder with its whole subtree. The project is
    /// touched once after the walk.
    pub fn delete_node(&self, caller: &OwnerId, id: NodeId) -> WorkspaceResult<usize> {
        let node = self.owned_node(caller, id)?;
        let removed = cascade_delete(self.backend.as_ref(), self.blobs.as_ref(), id);
        tracing::debug!(node = %id, removed, "node deleted");
        self.touch(node.project, self.clock.now_ms());
        Ok(removed)
    }

    pub fn update_content(
        &self,
        caller: &OwnerId,
        id: NodeId,
        content: &str,
    ) -> WorkspaceResult<()> {
        let node = self.owned_node(caller, id)?;
        if !node.is_text_file() {
            return Err(WorkspaceError::InvalidOperation(
                "Can only update content of text files",
            ));
        }

        let now = self.clock.now_ms();
        self.backend.patch_node(
            id,
            NodePatch {
                content: Some(content.to_string()),
                updated_at: Some(now),
                ..NodePatch::default()
            },
        )?;
        self.touch(node.project, now);
        Ok(())
    }

    /// Repairs an interrupted cascade: removes every subtree whose parent no
    /// longer exists. Returns the number of nodes removed.
    pub fn sweep_orphans(&self, caller: &OwnerId, project: ProjectId) -> WorkspaceResult<usize> {
        self.owned_project(caller, project)?;
        let nodes = self.backend.nodes_by_project(project);
        let alive: FxHashSet<NodeId> = nodes.iter().map(|n| n.id).collect();

        let mut removed = 0;
        for orphan in nodes
            .iter()
            .filter(|n| n.parent.is_some_and(|p| !alive.contains(&p)))
        {
            removed += cascade_delete(self.backend.as_ref(), self.blobs.as_ref(), orphan.id);
        }

        if removed > 0 {
            tracing::warn!(project = %project, removed, "orphaned nodes swept");
            self.touch(project, self.clock.now_ms());
        }
        Ok(removed)
    }

    // ---- helpers ----

    fn create_node(
        &self,
        caller: &OwnerId,
        project: ProjectId,
        parent: Option<NodeId>,
        name: &str,
        body: NodeBody,
    ) -> WorkspaceResult<NodeId> {
        self.owned_project(caller, project)?;
        if let Some(parent) = parent {
            let folder = self
                .backend
                .node(parent)
                .ok_or(WorkspaceError::NotFound("Parent folder"))?;
            if !folder.is_folder() || folder.project != project {
                return Err(WorkspaceError::InvalidOperation(
                    "Parent must be a folder in the same project",
                ));
            }
        }

        let kind = body.kind();
        let name = CompactString::from(name);
        if self.sibling_exists(project, parent, kind, &name) {
            return Err(WorkspaceError::Conflict {
                kind,
                name,
                op: ConflictOp::Create,
            });
        }

        let now = self.clock.now_ms();
        let id = self.backend.insert_node(NewNode {
            project,
            parent,
            name,
            body,
            now,
        })?;
        self.touch(project, now);
        tracing::debug!(project = %project, node = %id, %kind, "node created");
        Ok(id)
    }

    fn sibling_exists(
        &self,
        project: ProjectId,
        parent: Option<NodeId>,
        kind: NodeKind,
        name: &str,
    ) -> bool {
        self.backend
            .nodes_by_parent(project, parent)
            .iter()
            .any(|s| s.kind() == kind && s.name == name)
    }

    fn owned_project(&self, caller: &OwnerId, id: ProjectId) -> WorkspaceResult<Project> {
        let project = self
            .backend
            .project(id)
            .ok_or(WorkspaceError::NotFound("Project"))?;
        if !project.is_owned_by(caller) {
            return Err(WorkspaceError::Unauthorized);
        }
        Ok(project)
    }

    fn owned_node(&self, caller: &OwnerId, id: NodeId) -> WorkspaceResult<WorkspaceNode> {
        let node = self
            .backend
            .node(id)
            .ok_or(WorkspaceError::NotFound("Item"))?;
        self.owned_project(caller, node.project)?;
        Ok(node)
    }

    fn touch(&self, project: ProjectId, now: u64) {
        if let Err(e) = self.backend.patch_project(project, ProjectPatch::touch(now)) {
            tracing::warn!(project = %project, error = %e, "project timestamp not refreshed");
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/workspace/store.rs"]
mod tests;
