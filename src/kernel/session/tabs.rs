use crate::models::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabAction {
    OpenFile { node: NodeId, pinned: bool },
    CloseTab { node: NodeId },
    CloseAll,
    SetActive { node: NodeId },
}

/// Open tabs of one project.
///
/// `preview` and `active`, when set, name members of `open` (`SetActive` is
/// the one caller-trusted exception).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabState {
    #[serde(rename = "openTabs")]
    open: Vec<NodeId>,
    #[serde(rename = "activeTabId")]
    active: Option<NodeId>,
    #[serde(rename = "previewTabId")]
    preview: Option<NodeId>,
}

impl TabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_tabs(&self) -> &[NodeId] {
        &self.open
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn preview(&self) -> Option<NodeId> {
        self.preview
    }

    pub fn is_open(&self, node: NodeId) -> bool {
        self.open.contains(&node)
    }

    pub fn dispatch(&mut self, action: TabAction) -> bool {
        match action {
            TabAction::OpenFile { node, pinned } => self.open_file(node, pinned),
            TabAction::CloseTab { node } => self.close_tab(node),
            TabAction::CloseAll => self.close_all(),
            TabAction::SetActive { node } => self.set_active(node),
        }
    }

    pub fn open_file(&mut self, node: NodeId, pinned: bool) -> bool {
        if self.is_open(node) {
            let mut changed = self.set_active(node);
            if pinned && self.preview == Some(node) {
                self.preview = None;
                changed = true;
            }
            return changed;
        }

        if pinned {
            self.open.push(node);
        } else {
            let slot = self
                .preview
                .and_then(|preview| self.open.iter().position(|id| *id == preview));
            match slot {
                Some(index) => self.open[index] = node,
                None => self.open.push(node),
            }
            self.preview = Some(node);
        }
        self.active = Some(node);
        true
    }

    /// Closing the active tab activates whichever tab slides into its index,
    /// or the new last tab when it was last.
    pub fn close_tab(&mut self, node: NodeId) -> bool {
        let Some(index) = self.open.iter().position(|id| *id == node) else {
            return false;
        };
        let was_last = index + 1 == self.open.len();
        self.open.remove(index);

        if self.preview == Some(node) {
            self.preview = None;
        }
        if self.active == Some(node) {
            self.active = if self.open.is_empty() {
                None
            } else if was_last {
                self.open.last().copied()
            } else {
                self.open.get(index).copied()
            };
        }
        true
    }

    pub fn close_all(&mut self) -> bool {
        if self.open.is_empty() && self.active.is_none() && self.preview.is_none() {
            return false;
        }
        *self = Self::default();
        true
    }

    pub fn set_active(&mut self, node: NodeId) -> bool {
        if self.active == Some(node) {
            return false;
        }
        self.active = Some(node);
        true
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/session/tabs.rs"]
mod tests;
