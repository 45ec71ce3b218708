//! HTTP middleware for request admission, CORS and observability.

pub mod admission;
pub mod cors;
pub mod tracing;
