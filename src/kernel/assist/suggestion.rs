//! Inline suggestion pipeline: `Idle -> Debouncing -> Awaiting -> Idle | Rendering`.
//!
//! The session never touches timers or the network. The host polls it with the
//! current instant, starts the request it hands out, and feeds the response
//! back with the ticket it was issued under.

use super::ticket::{InFlight, PendingRequest, Ticket, TicketCounter};
use crate::kernel::services::ports::SuggestionRequest;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub enum SuggestionPhase {
    Idle,
    Debouncing { deadline: Instant },
    Awaiting { flight: InFlight },
    Rendering,
}

#[derive(Debug)]
pub struct SuggestionSession {
    phase: SuggestionPhase,
    suggestion: Option<String>,
    tickets: TicketCounter,
    debounce: Duration,
}

impl SuggestionSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            phase: SuggestionPhase::Idle,
            suggestion: None,
            tickets: TicketCounter::default(),
            debounce,
        }
    }

    pub fn phase(&self) -> &SuggestionPhase {
        &self.phase
    }

    pub fn is_waiting(&self) -> bool {
        matches!(
            self.phase,
            SuggestionPhase::Debouncing { .. } | SuggestionPhase::Awaiting { .. }
        )
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.phase {
            SuggestionPhase::Debouncing { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Document change or cursor move: abort the live request and restart the
    /// quiet period.
    pub fn on_change(&mut self, now: Instant) {
        self.abort_flight();
        self.phase = SuggestionPhase::Debouncing {
            deadline: now + self.debounce,
        };
    }

    /// Fires a due debounce. `build` produces the context window; `None`
    /// (blank document) clears the suggestion without issuing a request.
    pub fn poll(
        &mut self,
        now: Instant,
        build: impl FnOnce() -> Option<SuggestionRequest>,
    ) -> Option<PendingRequest<SuggestionRequest>> {
        let SuggestionPhase::Debouncing { deadline } = self.phase else {
            return None;
        };
        if now < deadline {
            return None;
        }

        let Some(payload) = build() else {
            self.suggestion = None;
            self.phase = SuggestionPhase::Idle;
            return None;
        };

        let flight = InFlight::new(self.tickets.next());
        let request = PendingRequest {
            ticket: flight.ticket(),
            cancel: flight.token(),
            payload,
        };
        self.phase = SuggestionPhase::Awaiting { flight };
        Some(request)
    }

    /// Stores a response. Returns false (and changes nothing) unless `ticket`
    /// names the live request. Empty or failed results clear the suggestion.
    pub fn apply(&mut self, ticket: Ticket, result: Option<String>) -> bool {
        let SuggestionPhase::Awaiting { flight } = &self.phase else {
            return false;
        };
        if !flight.accepts(ticket) {
            return false;
        }
        self.suggestion = result.filter(|s| !s.is_empty());
        self.phase = SuggestionPhase::Rendering;
        true
    }

    /// Suggestion to render after the cursor. Hidden while a newer request is
    /// pending even if an older value lingers.
    pub fn visible(&self) -> Option<&str> {
        match self.phase {
            SuggestionPhase::Rendering => self.suggestion.as_deref(),
            _ => None,
        }
    }

    /// Takes the visible suggestion for insertion. `None` means the accept key
    /// should fall through to the editor's default binding.
    pub fn accept(&mut self) -> Option<String> {
        if self.visible().is_none() {
            return None;
        }
        self.phase = SuggestionPhase::Idle;
        self.suggestion.take()
    }

    pub fn teardown(&mut self) {
        self.abort_flight();
        self.suggestion = None;
        self.phase = SuggestionPhase::Idle;
    }

    fn abort_flight(&mut self) {
        if let SuggestionPhase::Awaiting { flight } =
            std::mem::replace(&mut self.phase, SuggestionPhase::Idle)
        {
            flight.abort();
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/assist/suggestion.rs"]
mod tests;
