//! Project list as the home screen sees it: confirmed projects plus
//! provisional creates/renames that have not been acknowledged yet.

use crate::models::{OptimisticList, OwnerId, PendingId, Project, ProjectId};

#[derive(Debug, Default)]
pub struct ProjectListCache {
    list: OptimisticList<Project>,
}

impl ProjectListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the confirmed list (newest first).
    pub fn refresh(&mut self, projects: Vec<Project>) {
        self.list.set_confirmed(projects);
    }

    /// Shows a placeholder project immediately. It carries a null id until
    /// the real one arrives.
    pub fn begin_create(&mut self, name: &str, owner: &OwnerId, now: u64) -> PendingId {
        self.list.begin_insert(Project {
            id: ProjectId::default(),
            name: name.to_string(),
            owner: owner.clone(),
            created_at: now,
            updated_at: now,
            import_status: None,
            export_status: None,
            export_repo_url: None,
        })
    }

    pub fn begin_rename(&mut self, project: &Project, name: &str, now: u64) -> PendingId {
        let mut provisional = project.clone();
        provisional.name = name.to_string();
        provisional.updated_at = now;
        self.list.begin_replace(provisional)
    }

    /// `Some` confirms with the authoritative project, `None` rolls back.
    pub fn settle(&mut self, pending: PendingId, confirmed: Option<Project>) -> bool {
        self.list.reconcile(pending, confirmed)
    }

    pub fn has_pending(&self) -> bool {
        self.list.has_pending()
    }

    pub fn all(&self) -> Vec<Project> {
        self.list.view()
    }

    /// The first `limit` entries, as shown in the recent-projects strip.
    pub fn partial(&self, limit: usize) -> Vec<Project> {
        let mut items = self.list.view();
        items.truncate(limit);
        items
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/projects.rs"]
mod tests;
