//! Core domain entities.
//!
//! Entities are plain data structures. Each has a companion `New*` struct used
//! when creating records:
//!
//! - [`User`] / [`NewUser`] - a registered account
//! - [`ShortLink`] / [`NewShortLink`] - an expiring short URL mapping
//!
//! [`KeyClaim`] describes the outcome of storing a link under a generated key.

pub mod link;
pub mod user;

pub use link::{KeyClaim, NewShortLink, SHORT_KEY_LEN, ShortLink, link_ttl};
pub use user::{NewUser, User};
