//! Async runtime adapter: executes assist effects and sends messages back to the host loop.

mod message;
mod runtime;

pub use message::AppMessage;
pub use runtime::AssistRuntime;
