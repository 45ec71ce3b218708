//! REST API layer for HTTP request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extract`] - Custom extractors (optional caller identity)
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Admission, CORS and tracing layers
//! - [`routes`] - Route table

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
