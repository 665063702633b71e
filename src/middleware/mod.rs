//! Middleware layer.
//!
//! Middleware wraps the router and is the place for cross-cutting concerns
//! that apply to every request regardless of which handler answers it.
//!
//! - [`trace`]: per-request span with method, path, request id, status and latency

pub mod trace;
