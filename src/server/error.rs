use crate::kernel::services::ports::{AiError, Unauthenticated};
use crate::kernel::WorkspaceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Status reported when the client went away before the response was ready.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Empty-bodied 499.
    pub fn client_closed() -> Self {
        Self {
            status: StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: None,
        }
    }

    /// Assist failure: cancellation becomes 499, anything else a generic 500.
    /// The underlying error is logged, never returned.
    pub fn from_assist(err: AiError, public: &'static str) -> Self {
        if err.is_cancelled() {
            return Self::client_closed();
        }
        tracing::error!(error = %err, "{public}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, public)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl From<Unauthenticated> for ApiError {
    fn from(_: Unauthenticated) -> Self {
        Self::unauthorized()
    }
}

impl From<WorkspaceError> for ApiError {
    fn from(err: WorkspaceError) -> Self {
        let status = match err {
            WorkspaceError::Unauthorized => StatusCode::UNAUTHORIZED,
            WorkspaceError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkspaceError::Conflict { .. } => StatusCode::CONFLICT,
            WorkspaceError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.message {
            Some(message) => {
                let body = serde_json::json!({ "error": message });
                (self.status, Json(body)).into_response()
            }
            None => self.status.into_response(),
        }
    }
}
