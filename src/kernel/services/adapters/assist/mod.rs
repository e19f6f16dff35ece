//! Assist backends: the in-process service (prompts + model) and the HTTP
//! client used by editors talking to a remote server.

mod http_client;
pub mod prompts;
mod service;

pub use http_client::HttpAssistClient;
pub use service::{strip_code_fence, AssistService};
