//! HTTP surface: assist endpoints and the workspace REST routes.

mod assist;
mod error;
mod workspace;

pub use assist::parse_body;
pub use error::{ApiError, CLIENT_CLOSED_REQUEST};

use crate::kernel::services::ports::{AssistClient, IdentityGate};
use crate::kernel::WorkspaceStore;
use crate::models::OwnerId;
use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<dyn IdentityGate>,
    pub assist: Arc<dyn AssistClient>,
    pub store: WorkspaceStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/suggestion", post(assist::suggestion_handler))
        .route("/api/quick-edit", post(assist::quick_edit_handler))
        .route(
            "/api/projects",
            get(workspace::list_projects).post(workspace::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(workspace::get_project).patch(workspace::rename_project),
        )
        .route(
            "/api/projects/{id}/files",
            get(workspace::list_files).post(workspace::create_file),
        )
        .route("/api/projects/{id}/children", get(workspace::list_children))
        .route("/api/projects/{id}/folders", post(workspace::create_folder))
        .route("/api/projects/{id}/sweep", post(workspace::sweep_orphans))
        .route(
            "/api/files/{id}",
            get(workspace::get_file)
                .patch(workspace::rename_file)
                .delete(workspace::delete_file),
        )
        .route("/api/files/{id}/path", get(workspace::file_path))
        .route(
            "/api/files/{id}/content",
            axum::routing::put(workspace::update_content),
        )
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "zspace server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health_handler() -> &'static str {
    "ok"
}

pub(crate) fn authorize(state: &AppState, headers: &HeaderMap) -> Result<OwnerId, ApiError> {
    let credentials = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    Ok(state.gate.verify(credentials)?)
}
