use super::*;
use crate::kernel::services::adapters::{MemoryBackend, MemoryBlobStore, StaticTokenGate};
use crate::kernel::services::ports::{AiError, AssistClient, MonotonicClock};
use crate::kernel::WorkspaceStore;
use crate::models::OwnerId;
use crate::server::CLIENT_CLOSED_REQUEST;
use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Copy)]
enum Behavior {
    Echo,
    Fail,
    Cancelled,
    Hang,
}

struct StubAssist {
    behavior: Behavior,
    seen: Mutex<Option<CancellationToken>>,
}

impl StubAssist {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            seen: Mutex::new(None),
        })
    }

    async fn run(&self, echo: String, cancel: CancellationToken) -> Result<String, AiError> {
        *self.seen.lock().unwrap() = Some(cancel.clone());
        match self.behavior {
            Behavior::Echo => Ok(echo),
            Behavior::Fail => Err(AiError::Provider("upstream exploded: key=sk-123".into())),
            Behavior::Cancelled => Err(AiError::Cancelled),
            Behavior::Hang => {
                cancel.cancelled().await;
                Err(AiError::Cancelled)
            }
        }
    }
}

#[async_trait]
impl AssistClient for StubAssist {
    async fn suggest(
        &self,
        request: SuggestionRequest,
        cancel: CancellationToken,
    ) -> Result<String, AiError> {
        self.run(format!("after:{}", request.text_before_cursor), cancel)
            .await
    }

    async fn quick_edit(
        &self,
        request: QuickEditRequest,
        cancel: CancellationToken,
    ) -> Result<String, AiError> {
        self.run(request.instruction, cancel).await
    }
}

fn state(assist: Arc<StubAssist>) -> AppState {
    let mut gate = StaticTokenGate::new();
    gate.insert("tok", OwnerId::new("alice"));
    AppState {
        gate: Arc::new(gate),
        assist,
        store: WorkspaceStore::new(
            Arc::new(MemoryBackend::new()),
            Arc::new(MemoryBlobStore::new()),
            Arc::new(MonotonicClock::new()),
        ),
    }
}

fn authed() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
    headers
}

async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const SUGGESTION: &str = r#"{"fileName":"a.js","previousLines":"","textBeforeCursor":"let x =","textAfterCursor":"","nextLines":""}"#;
const QUICK_EDIT: &str =
    r#"{"fileName":"a.js","selectedCode":"x","fullCode":"let x = 1;","instruction":"rename"}"#;

#[test]
fn parse_body_distinguishes_the_three_failures() {
    let empty = parse_body::<SuggestionRequest>(b"  \n").unwrap_err();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    assert_eq!(empty.message(), Some("Empty request body"));

    let broken = parse_body::<SuggestionRequest>(b"{\"fileName\":").unwrap_err();
    assert_eq!(broken.message(), Some("Invalid JSON"));

    let wrong = parse_body::<SuggestionRequest>(br#"{"fileName":"a.js"}"#).unwrap_err();
    assert_eq!(wrong.message(), Some("Invalid request"));

    let ok: SuggestionRequest = parse_body(SUGGESTION.as_bytes()).unwrap();
    assert_eq!(ok.text_before_cursor, "let x =");
}

#[tokio::test]
async fn suggestion_success_returns_json() {
    let resp = suggestion_handler(
        State(state(StubAssist::new(Behavior::Echo))),
        authed(),
        Bytes::from_static(SUGGESTION.as_bytes()),
    )
    .await
    .into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({ "suggestion": "after:let x =" })
    );
}

#[tokio::test]
async fn quick_edit_success_returns_edited_code() {
    let resp = quick_edit_handler(
        State(state(StubAssist::new(Behavior::Echo))),
        authed(),
        Bytes::from_static(QUICK_EDIT.as_bytes()),
    )
    .await
    .into_response();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({ "editedCode": "rename" })
    );
}

#[tokio::test]
async fn missing_or_bad_token_is_401_before_body_parsing() {
    let assist = StubAssist::new(Behavior::Echo);
    let resp = suggestion_handler(
        State(state(assist.clone())),
        HeaderMap::new(),
        Bytes::new(),
    )
    .await
    .into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({ "error": "Unauthorized" })
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
    let resp = quick_edit_handler(
        State(state(assist.clone())),
        headers,
        Bytes::from_static(QUICK_EDIT.as_bytes()),
    )
    .await
    .into_response();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(assist.seen.lock().unwrap().is_none());
}

#[tokio::test]
async fn malformed_bodies_are_400_with_specific_messages() {
    for (body, message) in [
        ("", "Empty request body"),
        ("not json", "Invalid JSON"),
        (r#"{"fileName":1}"#, "Invalid request"),
    ] {
        let resp = quick_edit_handler(
            State(state(StubAssist::new(Behavior::Echo))),
            authed(),
            Bytes::from(body),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, serde_json::json!({ "error": message }));
    }
}

#[tokio::test]
async fn provider_failure_is_a_generic_500() {
    let resp = suggestion_handler(
        State(state(StubAssist::new(Behavior::Fail))),
        authed(),
        Bytes::from_static(SUGGESTION.as_bytes()),
    )
    .await
    .into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({ "error": "Failed to generate suggestion" })
    );

    let resp = quick_edit_handler(
        State(state(StubAssist::new(Behavior::Fail))),
        authed(),
        Bytes::from_static(QUICK_EDIT.as_bytes()),
    )
    .await
    .into_response();
    assert_eq!(
        body_json(resp).await,
        serde_json::json!({ "error": "Failed to generate edited code" })
    );
}

#[tokio::test]
async fn cancelled_generation_is_499_with_empty_body() {
    let resp = suggestion_handler(
        State(state(StubAssist::new(Behavior::Cancelled))),
        authed(),
        Bytes::from_static(SUGGESTION.as_bytes()),
    )
    .await
    .into_response();
    assert_eq!(resp.status().as_u16(), CLIENT_CLOSED_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn dropping_the_handler_cancels_generation() {
    let assist = StubAssist::new(Behavior::Hang);
    let task = tokio::spawn(quick_edit_handler(
        State(state(assist.clone())),
        authed(),
        Bytes::from_static(QUICK_EDIT.as_bytes()),
    ));

    let mut token = None;
    for _ in 0..200 {
        token = assist.seen.lock().unwrap().clone();
        if token.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let token = token.unwrap();
    assert!(!token.is_cancelled());

    task.abort();
    let _ = task.await;
    assert!(token.is_cancelled());
}

#[test]
fn workspace_errors_map_to_statuses() {
    use crate::kernel::{ConflictOp, WorkspaceError};
    use crate::models::NodeKind;

    let cases = [
        (WorkspaceError::Unauthorized, StatusCode::UNAUTHORIZED),
        (WorkspaceError::NotFound("Item"), StatusCode::NOT_FOUND),
        (
            WorkspaceError::Conflict {
                kind: NodeKind::File,
                name: "a".into(),
                op: ConflictOp::Rename,
            },
            StatusCode::CONFLICT,
        ),
        (
            WorkspaceError::InvalidOperation("Can only update content of text files"),
            StatusCode::BAD_REQUEST,
        ),
    ];
    for (err, status) in cases {
        let message = err.to_string();
        let api = ApiError::from(err);
        assert_eq!(api.status(), status);
        assert_eq!(api.message(), Some(message.as_str()));
    }
}
