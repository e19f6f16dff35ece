//! zspace - project workspace core
//!
//! Module layout:
//! - models: ids, projects, tree nodes, text buffer, optimistic overlays
//! - kernel: workspace store, tab sessions, assist pipelines, service ports/adapters
//! - app: Workbench host (editors, runtime messages, effects)
//! - server: HTTP endpoints (feature `server`)

pub mod app;
pub mod kernel;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
