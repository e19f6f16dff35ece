use super::message::AppMessage;
use crate::kernel::assist::PendingRequest;
use crate::kernel::services::ports::{
    AiError, AssistClient, AssistSettings, QuickEditRequest, SuggestionRequest,
};
use crate::models::NodeId;
use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

/// Runs assist requests on tokio and reports results over a channel.
///
/// Cancelled requests report nothing; failures and timeouts report `None`.
pub struct AssistRuntime {
    runtime: Option<tokio::runtime::Runtime>,
    handle: tokio::runtime::Handle,
    client: Arc<dyn AssistClient>,
    tx: Sender<AppMessage>,
    suggestion_timeout: Duration,
    quick_edit_timeout: Duration,
}

impl AssistRuntime {
    /// Owns a dedicated runtime.
    pub fn new(
        client: Arc<dyn AssistClient>,
        settings: &AssistSettings,
        tx: Sender<AppMessage>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        let handle = runtime.handle().clone();
        let mut rt = Self::with_handle(handle, client, settings, tx);
        rt.runtime = Some(runtime);
        Ok(rt)
    }

    /// Spawns onto an existing runtime.
    pub fn with_handle(
        handle: tokio::runtime::Handle,
        client: Arc<dyn AssistClient>,
        settings: &AssistSettings,
        tx: Sender<AppMessage>,
    ) -> Self {
        Self {
            runtime: None,
            handle,
            client,
            tx,
            suggestion_timeout: settings.suggestion_timeout(),
            quick_edit_timeout: settings.quick_edit_timeout(),
        }
    }

    pub fn tokio_handle(&self) -> tokio::runtime::Handle {
        self.handle.clone()
    }

    pub fn owns_runtime(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn request_suggestion(&self, node: NodeId, request: PendingRequest<SuggestionRequest>) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let limit = self.suggestion_timeout;
        self.handle.spawn(async move {
            let PendingRequest {
                ticket,
                cancel,
                payload,
            } = request;
            let call = client.suggest(payload, cancel.clone());
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return,
                outcome = tokio::time::timeout(limit, call) => outcome,
            };
            let Some(suggestion) = settle("suggestion", outcome, limit) else {
                return;
            };
            let _ = tx.send(AppMessage::SuggestionReady {
                node,
                ticket,
                suggestion: suggestion.filter(|s| !s.is_empty()),
            });
        });
    }

    pub fn request_quick_edit(&self, node: NodeId, request: PendingRequest<QuickEditRequest>) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let limit = self.quick_edit_timeout;
        self.handle.spawn(async move {
            let PendingRequest {
                ticket,
                cancel,
                payload,
            } = request;
            let call = client.quick_edit(payload, cancel.clone());
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return,
                outcome = tokio::time::timeout(limit, call) => outcome,
            };
            let Some(edited) = settle("quick_edit", outcome, limit) else {
                return;
            };
            let _ = tx.send(AppMessage::QuickEditReady {
                node,
                ticket,
                edited: edited.filter(|s| !s.is_empty()),
            });
        });
    }
}

/// Outer `None`: cancelled, report nothing. Inner `None`: failed.
fn settle(
    op: &'static str,
    outcome: Result<Result<String, AiError>, tokio::time::error::Elapsed>,
    limit: Duration,
) -> Option<Option<String>> {
    match outcome {
        Ok(Ok(text)) => Some(Some(text)),
        Ok(Err(e)) if e.is_cancelled() => None,
        Ok(Err(e)) => {
            tracing::debug!(op, error = %e, "assist request failed");
            Some(None)
        }
        Err(_) => {
            tracing::debug!(op, timeout_ms = limit.as_millis() as u64, "assist request timed out");
            Some(None)
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/runtime.rs"]
mod tests;
