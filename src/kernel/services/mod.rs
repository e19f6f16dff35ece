//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the app (kernel-facing).
//! - `adapters`: storage, HTTP and async runtime implementations.

pub mod adapters;
pub mod ports;
