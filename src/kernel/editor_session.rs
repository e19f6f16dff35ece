//! One open document: buffer, dirty flag and both assist pipelines.

use crate::kernel::assist::{
    build_context, QuickEditOutcome, QuickEditSession, SuggestionSession, Ticket,
};
use crate::kernel::effect::Effect;
use crate::kernel::services::ports::AssistSettings;
use crate::models::{NodeId, TextBuffer, TextEdit};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    /// Not consumed; the editor's default binding applies.
    FallThrough,
}

pub struct EditorSession {
    node: NodeId,
    file_name: String,
    buffer: TextBuffer,
    dirty: bool,
    autosave: Duration,
    save_deadline: Option<Instant>,
    suggestion: SuggestionSession,
    quick_edit: QuickEditSession,
    lines_before: usize,
    lines_after: usize,
}

impl EditorSession {
    pub fn new(
        node: NodeId,
        file_name: impl Into<String>,
        content: &str,
        settings: &AssistSettings,
    ) -> Self {
        Self {
            node,
            file_name: file_name.into(),
            buffer: TextBuffer::from_text(content),
            dirty: false,
            autosave: settings.autosave(),
            save_deadline: None,
            suggestion: SuggestionSession::new(settings.debounce()),
            quick_edit: QuickEditSession::new(),
            lines_before: settings.lines_before,
            lines_after: settings.lines_after,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = name.into();
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn suggestion(&self) -> &SuggestionSession {
        &self.suggestion
    }

    pub fn quick_edit(&self) -> &QuickEditSession {
        &self.quick_edit
    }

    /// Suggestion text to draw after the cursor, if any.
    pub fn ghost_text(&self) -> Option<(usize, &str)> {
        self.suggestion
            .visible()
            .map(|text| (self.buffer.cursor(), text))
    }

    // ---- editing ----

    pub fn type_text(&mut self, text: &str, now: Instant) {
        let edit = self.buffer.insert_at_cursor(text);
        self.after_edit(edit, now);
    }

    pub fn replace_range(&mut self, range: std::ops::Range<usize>, text: &str, now: Instant) {
        let edit = self.buffer.replace(range, text);
        self.after_edit(edit, now);
    }

    pub fn move_cursor(&mut self, offset: usize, now: Instant) {
        self.buffer.set_cursor(offset);
        self.quick_edit.on_selection_changed(false);
        self.suggestion.on_change(now);
    }

    pub fn select(&mut self, anchor: usize, head: usize, now: Instant) {
        self.buffer.select(anchor, head);
        self.quick_edit
            .on_selection_changed(self.buffer.has_selection());
        self.suggestion.on_change(now);
    }

    /// Accept key (Tab): inserts the visible suggestion at the cursor.
    pub fn accept_suggestion(&mut self, now: Instant) -> KeyOutcome {
        let Some(text) = self.suggestion.accept() else {
            return KeyOutcome::FallThrough;
        };
        let at = self.buffer.cursor();
        let edit = self.buffer.replace(at..at, &text);
        self.after_edit(edit, now);
        KeyOutcome::Handled
    }

    // ---- quick edit ----

    /// Quick-edit key (Mod-k): opens the prompt over a non-empty selection.
    pub fn open_quick_edit(&mut self) -> KeyOutcome {
        if self.quick_edit.open(&self.buffer) {
            KeyOutcome::Handled
        } else {
            KeyOutcome::FallThrough
        }
    }

    pub fn set_instruction(&mut self, text: impl Into<String>) {
        self.quick_edit.set_instruction(text);
    }

    pub fn submit_quick_edit(&mut self) -> Option<Effect> {
        let request = self.quick_edit.submit(&self.buffer, &self.file_name)?;
        Some(Effect::RequestQuickEdit {
            node: self.node,
            request,
        })
    }

    pub fn cancel_quick_edit(&mut self) {
        self.quick_edit.cancel();
    }

    // ---- host callbacks ----

    /// Fires a due debounce.
    pub fn tick(&mut self, now: Instant) -> Option<Effect> {
        let buffer = &self.buffer;
        let file_name = &self.file_name;
        let (before, after) = (self.lines_before, self.lines_after);
        let request = self
            .suggestion
            .poll(now, || build_context(buffer, file_name, before, after))?;
        Some(Effect::RequestSuggestion {
            node: self.node,
            request,
        })
    }

    /// Writes the buffer back once edits have been quiet for the autosave delay.
    pub fn poll_autosave(&mut self, now: Instant) -> Option<Effect> {
        match self.save_deadline {
            Some(deadline) if now >= deadline => self.save(),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.suggestion.deadline(), self.save_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn apply_suggestion(&mut self, ticket: Ticket, suggestion: Option<String>) -> bool {
        self.suggestion.apply(ticket, suggestion)
    }

    /// Splices a rewrite into the span captured at submit time.
    pub fn apply_quick_edit(
        &mut self,
        ticket: Ticket,
        edited: Option<String>,
        now: Instant,
    ) -> bool {
        match self.quick_edit.apply(ticket, edited) {
            QuickEditOutcome::Replace { span, code } => {
                let edit = self.buffer.replace(span, &code);
                self.after_edit(edit, now);
                true
            }
            QuickEditOutcome::Retry => true,
            QuickEditOutcome::Stale => false,
        }
    }

    /// Content to write back, clearing the dirty flag.
    pub fn save(&mut self) -> Option<Effect> {
        self.save_deadline = None;
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(Effect::PersistContent {
            node: self.node,
            content: self.buffer.text(),
        })
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn teardown(&mut self) {
        self.suggestion.teardown();
        self.quick_edit.cancel();
    }

    fn after_edit(&mut self, edit: TextEdit, now: Instant) {
        self.dirty = true;
        self.save_deadline = Some(now + self.autosave);
        self.quick_edit.map_through(&edit);
        self.quick_edit
            .on_selection_changed(self.buffer.has_selection());
        self.suggestion.on_change(now);
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/editor_session.rs"]
mod tests;
