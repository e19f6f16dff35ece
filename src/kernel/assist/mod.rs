//! Debounced, cancellable assist pipelines (pure state, no IO).

mod context;
mod quick_edit;
mod suggestion;
mod ticket;
mod urls;

pub use context::build_context;
pub use quick_edit::{QuickEditOutcome, QuickEditPhase, QuickEditSession};
pub use suggestion::{SuggestionPhase, SuggestionSession};
pub use ticket::{InFlight, PendingRequest, Ticket, TicketCounter};
pub use urls::extract_urls;
