//! Host layer: owns sessions and runtimes, executes effects.

pub mod projects;
pub mod workbench;

pub use projects::ProjectListCache;
pub use workbench::Workbench;
