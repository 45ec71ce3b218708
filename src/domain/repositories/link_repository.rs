//! Repository trait for short link data access.

use crate::domain::entities::{KeyClaim, NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Tries to store a link under `new_link.short_key`.
    ///
    /// A unique violation on the short key is not an error: it is reported as
    /// [`KeyClaim::Taken`] so the caller can retry with a fresh key. An owner
    /// id with no user row is reported as [`KeyClaim::UnknownOwner`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on any other database error.
    async fn claim_key(&self, new_link: NewShortLink) -> Result<KeyClaim, AppError>;

    /// Finds a link by key that is still live at `now`.
    ///
    /// Key match and the `expires_at > now` predicate are evaluated in one query.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if the key exists and has not expired
    /// - `Ok(None)` if the key is unknown or expired
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_active(
        &self,
        short_key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortLink>, AppError>;

    /// Deletes every link whose expiry is at or before `now`.
    ///
    /// Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts links, optionally only those still live at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, live_at: Option<DateTime<Utc>>) -> Result<i64, AppError>;

    /// Round-trips to the store without touching any rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the database is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
