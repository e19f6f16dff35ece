//! Document buffer backing an open editor.
//!
//! - text storage (Rope)
//! - cursor and selection as char offsets (anchor/head)
//! - line access for the completion context window

use ropey::{Rope, RopeSlice};
use std::borrow::Cow;
use std::ops::Range;

/// Borrow a slice as `&str` when it is contiguous, copy otherwise.
pub fn slice_to_cow(slice: RopeSlice<'_>) -> Cow<'_, str> {
    match slice.as_str() {
        Some(s) => Cow::Borrowed(s),
        None => Cow::Owned(slice.to_string()),
    }
}

/// One applied mutation in char offsets: `removed` was replaced by
/// `inserted` chars starting at `removed.start`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub removed: Range<usize>,
    pub inserted: usize,
}

impl TextEdit {
    /// Carries `span` across this edit. Text inserted or removed before the
    /// span shifts it; an edit touching the span's interior stretches the span
    /// to cover the new text. Insertion exactly at `span.end` stays outside.
    pub fn map_range(&self, span: Range<usize>) -> Range<usize> {
        let Range { start, end } = self.removed;
        let removed = end - start;
        if end <= span.start && !(start == end && start == span.end) {
            let shift = |at: usize| at - removed + self.inserted;
            return shift(span.start)..shift(span.end);
        }
        if start >= span.end {
            return span;
        }
        let new_start = span.start.min(start);
        let new_end = if end <= span.end {
            span.end - removed + self.inserted
        } else {
            start + self.inserted
        };
        new_start..new_end.max(new_start)
    }
}

#[derive(Clone, Debug)]
pub struct TextBuffer {
    rope: Rope,
    head: usize,
    anchor: Option<usize>,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            head: 0,
            anchor: None,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            head: 0,
            anchor: None,
        }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_blank(&self) -> bool {
        self.rope.chars().all(char::is_whitespace)
    }

    /// Cursor position (selection head) as a char offset.
    pub fn cursor(&self) -> usize {
        self.head
    }

    /// Moves the cursor and collapses any selection.
    pub fn set_cursor(&mut self, offset: usize) {
        self.head = offset.min(self.len_chars());
        self.anchor = None;
    }

    pub fn select(&mut self, anchor: usize, head: usize) {
        let len = self.len_chars();
        self.anchor = Some(anchor.min(len));
        self.head = head.min(len);
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn has_selection(&self) -> bool {
        self.anchor.is_some_and(|anchor| anchor != self.head)
    }

    /// Selected span in document order, `None` when the selection is empty.
    pub fn selection(&self) -> Option<Range<usize>> {
        let anchor = self.anchor?;
        if anchor == self.head {
            return None;
        }
        Some(anchor.min(self.head)..anchor.max(self.head))
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection().map(|range| self.slice(range))
    }

    pub fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp(range);
        self.rope.slice(range).to_string()
    }

    pub fn cursor_line(&self) -> usize {
        self.rope.char_to_line(self.head)
    }

    pub fn line_start(&self, row: usize) -> usize {
        self.rope.line_to_char(row.min(self.len_lines().saturating_sub(1)))
    }

    /// Line text without its line terminator.
    pub fn line_text(&self, row: usize) -> Option<String> {
        if row >= self.rope.len_lines() {
            return None;
        }
        let line = slice_to_cow(self.rope.line(row));
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(&line);
        Some(line.to_string())
    }

    /// Inserts at `at` without moving the cursor unless it sits after the insertion point.
    pub fn insert(&mut self, at: usize, text: &str) -> TextEdit {
        let at = at.min(self.len_chars());
        self.rope.insert(at, text);
        let inserted = text.chars().count();
        if self.head > at {
            self.head += inserted;
        }
        if let Some(anchor) = self.anchor.as_mut() {
            if *anchor > at {
                *anchor += inserted;
            }
        }
        TextEdit {
            removed: at..at,
            inserted,
        }
    }

    /// Types `text` at the cursor, replacing the selection if there is one.
    pub fn insert_at_cursor(&mut self, text: &str) -> TextEdit {
        let removed = self.selection().unwrap_or(self.head..self.head);
        self.replace(removed, text)
    }

    /// Replaces `range` (clamped to the document) and places the cursor after the new text.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> TextEdit {
        let range = self.clamp(range);
        let start = range.start;
        if !range.is_empty() {
            self.rope.remove(range.clone());
        }
        self.rope.insert(start, text);
        let inserted = text.chars().count();
        self.head = start + inserted;
        self.anchor = None;
        TextEdit {
            removed: range,
            inserted,
        }
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.len_chars();
        let end = range.end.min(len);
        let start = range.start.min(end);
        start..end
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/text_buffer.rs"]
mod tests;
