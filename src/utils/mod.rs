//! Helper functions used across the application.
//!
//! - [`code_generator`] - Short key generation
//! - [`db_error`] - Database constraint classification
//! - [`password`] - Password hashing and verification

pub mod code_generator;
pub mod db_error;
pub mod password;
