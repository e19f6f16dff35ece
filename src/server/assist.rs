//! `POST /api/suggestion` and `POST /api/quick-edit`.

use super::error::ApiError;
use super::{authorize, AppState};
use crate::kernel::services::ports::{
    QuickEditRequest, QuickEditResponse, SuggestionRequest, SuggestionResponse,
};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

pub async fn suggestion_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SuggestionResponse>, ApiError> {
    authorize(&state, &headers)?;
    let request: SuggestionRequest = parse_body(&body)?;

    // Dropping the handler (client disconnect) cancels the model call.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let suggestion = state
        .assist
        .suggest(request, cancel)
        .await
        .map_err(|e| ApiError::from_assist(e, "Failed to generate suggestion"))?;
    Ok(Json(SuggestionResponse { suggestion }))
}

pub async fn quick_edit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<QuickEditResponse>, ApiError> {
    authorize(&state, &headers)?;
    let request: QuickEditRequest = parse_body(&body)?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();
    let edited_code = state
        .assist
        .quick_edit(request, cancel)
        .await
        .map_err(|e| ApiError::from_assist(e, "Failed to generate edited code"))?;
    Ok(Json(QuickEditResponse { edited_code }))
}

/// Empty body, malformed JSON and schema mismatch are reported separately.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("Empty request body"));
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Invalid JSON"))?;
    serde_json::from_value(value).map_err(|_| ApiError::bad_request("Invalid request"))
}

#[cfg(test)]
#[path = "../../tests/unit/server/assist.rs"]
mod tests;
