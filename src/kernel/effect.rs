use crate::kernel::assist::PendingRequest;
use crate::kernel::services::ports::{QuickEditRequest, SuggestionRequest};
use crate::models::NodeId;

/// Side effects produced by editor sessions, executed by the host.
#[derive(Debug, Clone)]
pub enum Effect {
    RequestSuggestion {
        node: NodeId,
        request: PendingRequest<SuggestionRequest>,
    },
    RequestQuickEdit {
        node: NodeId,
        request: PendingRequest<QuickEditRequest>,
    },
    PersistContent {
        node: NodeId,
        content: String,
    },
}
