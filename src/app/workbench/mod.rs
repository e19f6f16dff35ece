//! Workbench: the host that ties tab sessions, open editors and the assist
//! runtime to one signed-in owner.

use super::projects::ProjectListCache;
use crate::kernel::services::adapters::{AppMessage, AssistRuntime};
use crate::kernel::services::ports::{AssistClient, AssistSettings, Clock, MonotonicClock};
use crate::kernel::{
    EditorSession, Effect, SessionRegistry, TabAction, TabState, WorkspaceError, WorkspaceResult,
    WorkspaceStore,
};
use crate::models::{NodeId, OwnerId, Project, ProjectId};
use rustc_hash::FxHashMap;
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

mod tick;

const MAX_MESSAGE_DRAIN_PER_TICK: usize = 256;

pub struct Workbench {
    owner: OwnerId,
    store: WorkspaceStore,
    registry: Arc<SessionRegistry>,
    settings: AssistSettings,
    editors: FxHashMap<ProjectId, FxHashMap<NodeId, EditorSession>>,
    runtime: AssistRuntime,
    rx: Receiver<AppMessage>,
    projects: ProjectListCache,
    clock: MonotonicClock,
}

impl Workbench {
    /// Owns a dedicated tokio runtime for assist requests.
    pub fn new(
        owner: OwnerId,
        store: WorkspaceStore,
        client: Arc<dyn AssistClient>,
        settings: AssistSettings,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AssistRuntime::new(client, &settings, tx)?;
        Ok(Self::from_parts(owner, store, settings, runtime, rx))
    }

    /// Spawns assist requests onto an existing runtime.
    pub fn with_handle(
        owner: OwnerId,
        store: WorkspaceStore,
        client: Arc<dyn AssistClient>,
        settings: AssistSettings,
        handle: tokio::runtime::Handle,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let runtime = AssistRuntime::with_handle(handle, client, &settings, tx);
        Self::from_parts(owner, store, settings, runtime, rx)
    }

    fn from_parts(
        owner: OwnerId,
        store: WorkspaceStore,
        settings: AssistSettings,
        runtime: AssistRuntime,
        rx: Receiver<AppMessage>,
    ) -> Self {
        Self {
            owner,
            store,
            registry: Arc::new(SessionRegistry::new()),
            settings,
            editors: FxHashMap::default(),
            runtime,
            rx,
            projects: ProjectListCache::new(),
            clock: MonotonicClock::new(),
        }
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn store(&self) -> &WorkspaceStore {
        &self.store
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn tabs(&self, project: ProjectId) -> Arc<TabState> {
        self.registry.snapshot(project)
    }

    pub fn editor(&self, node: NodeId) -> Option<&EditorSession> {
        self.editors.values().find_map(|open| open.get(&node))
    }

    pub fn editor_mut(&mut self, node: NodeId) -> Option<&mut EditorSession> {
        self.editors.values_mut().find_map(|open| open.get_mut(&node))
    }

    pub fn active_editor_mut(&mut self, project: ProjectId) -> Option<&mut EditorSession> {
        let active = self.registry.snapshot(project).active()?;
        self.editors.get_mut(&project)?.get_mut(&active)
    }

    // ---- projects ----

    pub fn projects(&self) -> &ProjectListCache {
        &self.projects
    }

    pub fn refresh_projects(&mut self) {
        let projects = self.store.list_projects(&self.owner);
        self.projects.refresh(projects);
    }

    pub fn create_project(&mut self, name: &str) -> Project {
        let pending = self
            .projects
            .begin_create(name, &self.owner, self.clock.now_ms());
        let project = self.store.create_project(&self.owner, name);
        self.projects.settle(pending, Some(project.clone()));
        project
    }

    pub fn rename_project(&mut self, project: ProjectId, name: &str) -> WorkspaceResult<Project> {
        let current = self.store.get_project(&self.owner, project)?;
        let pending = self
            .projects
            .begin_rename(&current, name, self.clock.now_ms());
        match self.store.rename_project(&self.owner, project, name) {
            Ok(renamed) => {
                self.projects.settle(pending, Some(renamed.clone()));
                Ok(renamed)
            }
            Err(e) => {
                self.projects.settle(pending, None);
                Err(e)
            }
        }
    }

    // ---- tabs ----

    /// Opens a file tab and an editor for text content.
    pub fn open_file(&mut self, node: NodeId, pinned: bool) -> WorkspaceResult<Arc<TabState>> {
        let file = self.store.get_file(&self.owner, node)?;
        if file.is_folder() {
            return Err(WorkspaceError::InvalidOperation("Folders cannot be opened"));
        }

        let project = file.project;
        let (tabs, _) = self
            .registry
            .dispatch(project, TabAction::OpenFile { node, pinned });

        if let Some(content) = file.content() {
            let settings = &self.settings;
            self.editors
                .entry(project)
                .or_default()
                .entry(node)
                .or_insert_with(|| EditorSession::new(node, file.name.as_str(), content, settings));
        }
        self.sync_editors(project, &tabs);
        Ok(tabs)
    }

    pub fn close_tab(&mut self, project: ProjectId, node: NodeId) -> Arc<TabState> {
        let (tabs, _) = self.registry.dispatch(project, TabAction::CloseTab { node });
        self.sync_editors(project, &tabs);
        tabs
    }

    pub fn close_all(&mut self, project: ProjectId) -> Arc<TabState> {
        let (tabs, _) = self.registry.dispatch(project, TabAction::CloseAll);
        self.sync_editors(project, &tabs);
        tabs
    }

    pub fn set_active(&mut self, project: ProjectId, node: NodeId) -> Arc<TabState> {
        let (tabs, _) = self.registry.dispatch(project, TabAction::SetActive { node });
        tabs
    }

    /// Leaves the project view: saves and drops its editors, discards tabs.
    pub fn exit_project(&mut self, project: ProjectId) {
        if let Some(open) = self.editors.remove(&project) {
            for (_, mut editor) in open {
                self.close_editor(&mut editor);
            }
        }
        self.registry.discard(project);
    }

    // ---- editing ----

    pub fn submit_quick_edit(&mut self, node: NodeId) -> bool {
        let Some(effect) = self.editor_mut(node).and_then(|e| e.submit_quick_edit()) else {
            return false;
        };
        self.run_effect(effect);
        true
    }

    /// Writes a dirty editor back through the store.
    pub fn save(&mut self, node: NodeId) -> bool {
        let Some(effect) = self.editor_mut(node).and_then(|e| e.save()) else {
            return false;
        };
        self.run_effect(effect);
        true
    }

    pub(super) fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::RequestSuggestion { node, request } => {
                self.runtime.request_suggestion(node, request);
            }
            Effect::RequestQuickEdit { node, request } => {
                self.runtime.request_quick_edit(node, request);
            }
            Effect::PersistContent { node, content } => {
                if let Err(e) = self.store.update_content(&self.owner, node, &content) {
                    tracing::warn!(node = %node, error = %e, "save failed");
                    if let Some(editor) = self.editor_mut(node) {
                        editor.mark_dirty();
                    }
                }
            }
        }
    }

    /// Drops editors whose tab is gone, saving them first.
    fn sync_editors(&mut self, project: ProjectId, tabs: &TabState) {
        let Some(open) = self.editors.get_mut(&project) else {
            return;
        };
        let closed: Vec<NodeId> = open
            .keys()
            .copied()
            .filter(|node| !tabs.is_open(*node))
            .collect();
        let mut dropped = Vec::with_capacity(closed.len());
        for node in closed {
            if let Some(editor) = open.remove(&node) {
                dropped.push(editor);
            }
        }
        for mut editor in dropped {
            self.close_editor(&mut editor);
        }
    }

    fn close_editor(&mut self, editor: &mut EditorSession) {
        editor.teardown();
        if let Some(Effect::PersistContent { node, content }) = editor.save() {
            if let Err(e) = self.store.update_content(&self.owner, node, &content) {
                tracing::warn!(node = %node, error = %e, "save on close failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/app/workbench.rs"]
mod tests;
