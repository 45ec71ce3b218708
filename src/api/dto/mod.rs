//! Data Transfer Objects for API requests and responses.
//!
//! DTOs use Serde for JSON and validator for input checks.

pub mod auth;
pub mod health;
pub mod shorten;
