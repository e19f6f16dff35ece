use crate::kernel::assist::Ticket;
use crate::models::NodeId;

/// Results sent back from background tasks to the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    SuggestionReady {
        node: NodeId,
        ticket: Ticket,
        suggestion: Option<String>,
    },
    QuickEditReady {
        node: NodeId,
        ticket: Ticket,
        edited: Option<String>,
    },
}
