//! Selection rewrite prompt: `Closed -> Open -> Submitting -> Closed | Open`.

use super::ticket::{InFlight, PendingRequest, Ticket, TicketCounter};
use crate::kernel::services::ports::QuickEditRequest;
use crate::models::{TextBuffer, TextEdit};
use std::ops::Range;

#[derive(Debug)]
pub enum QuickEditPhase {
    Closed,
    Open,
    Submitting {
        flight: InFlight,
        span: Range<usize>,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum QuickEditOutcome {
    /// Replace `span` with `code`; the prompt has closed.
    Replace { span: Range<usize>, code: String },
    /// The request failed; the prompt is open again for another try.
    Retry,
    /// Response for a cancelled or superseded request.
    Stale,
}

#[derive(Debug)]
pub struct QuickEditSession {
    phase: QuickEditPhase,
    instruction: String,
    tickets: TicketCounter,
}

impl Default for QuickEditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuickEditSession {
    pub fn new() -> Self {
        Self {
            phase: QuickEditPhase::Closed,
            instruction: String::new(),
            tickets: TicketCounter::default(),
        }
    }

    pub fn phase(&self) -> &QuickEditPhase {
        &self.phase
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.phase, QuickEditPhase::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, QuickEditPhase::Submitting { .. })
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Opens the prompt; requires a non-empty selection. Returns false when
    /// the key should fall through.
    pub fn open(&mut self, buffer: &TextBuffer) -> bool {
        if !buffer.has_selection() {
            return false;
        }
        if matches!(self.phase, QuickEditPhase::Closed) {
            self.instruction.clear();
            self.phase = QuickEditPhase::Open;
        }
        true
    }

    /// Prompt anchor: the end of the selection.
    pub fn anchor(&self, buffer: &TextBuffer) -> Option<usize> {
        match &self.phase {
            QuickEditPhase::Closed => None,
            QuickEditPhase::Open => buffer.selection().map(|s| s.end),
            QuickEditPhase::Submitting { span, .. } => Some(span.end),
        }
    }

    pub fn set_instruction(&mut self, text: impl Into<String>) {
        self.instruction = text.into();
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.phase, QuickEditPhase::Open) && !self.instruction.trim().is_empty()
    }

    /// Captures the selection span and packages the request.
    pub fn submit(
        &mut self,
        buffer: &TextBuffer,
        file_name: &str,
    ) -> Option<PendingRequest<QuickEditRequest>> {
        if !self.can_submit() {
            return None;
        }
        let span = buffer.selection()?;
        let payload = QuickEditRequest {
            file_name: file_name.to_string(),
            selected_code: buffer.slice(span.clone()),
            full_code: buffer.text(),
            instruction: self.instruction.trim().to_string(),
        };

        let flight = InFlight::new(self.tickets.next());
        let request = PendingRequest {
            ticket: flight.ticket(),
            cancel: flight.token(),
            payload,
        };
        self.phase = QuickEditPhase::Submitting { flight, span };
        Some(request)
    }

    /// Aborts any request and dismisses the prompt.
    pub fn cancel(&mut self) {
        if let QuickEditPhase::Submitting { flight, .. } =
            std::mem::replace(&mut self.phase, QuickEditPhase::Closed)
        {
            flight.abort();
        }
    }

    /// A collapsed selection dismisses an idle prompt. A submitted request
    /// keeps its captured span and is left running.
    pub fn on_selection_changed(&mut self, has_selection: bool) {
        if !has_selection && matches!(self.phase, QuickEditPhase::Open) {
            self.phase = QuickEditPhase::Closed;
        }
    }

    /// Keeps a submitted span on the same text while the document changes
    /// under the pending request.
    pub fn map_through(&mut self, edit: &TextEdit) {
        if let QuickEditPhase::Submitting { span, .. } = &mut self.phase {
            *span = edit.map_range(span.clone());
        }
    }

    pub fn apply(&mut self, ticket: Ticket, result: Option<String>) -> QuickEditOutcome {
        let QuickEditPhase::Submitting { flight, .. } = &self.phase else {
            return QuickEditOutcome::Stale;
        };
        if !flight.accepts(ticket) {
            return QuickEditOutcome::Stale;
        }

        match result.filter(|code| !code.is_empty()) {
            Some(code) => match std::mem::replace(&mut self.phase, QuickEditPhase::Closed) {
                QuickEditPhase::Submitting { span, .. } => QuickEditOutcome::Replace { span, code },
                _ => QuickEditOutcome::Stale,
            },
            None => {
                self.phase = QuickEditPhase::Open;
                QuickEditOutcome::Retry
            }
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/assist/quick_edit.rs"]
mod tests;
