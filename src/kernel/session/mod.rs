//! Editor tab sessions, one per project.

mod registry;
mod tabs;

pub use registry::SessionRegistry;
pub use tabs::{TabAction, TabState};
