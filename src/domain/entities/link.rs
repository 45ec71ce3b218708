//! Short link entity mapping a public key to a destination URL.

use chrono::{DateTime, Duration, Utc};

/// Length of every generated short key.
pub const SHORT_KEY_LEN: usize = 8;

/// How long a link stays resolvable after creation.
pub fn link_ttl() -> Duration {
    Duration::hours(24)
}

/// A shortened URL with optional owner and a fixed expiry.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub id: i64,
    pub short_key: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: i64,
        short_key: String,
        original_url: String,
        owner_id: Option<i64>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_key,
            original_url,
            owner_id,
            created_at,
            expires_at,
        }
    }

    /// Returns true if the link was created without an owner.
    pub fn is_anonymous(&self) -> bool {
        self.owner_id.is_none()
    }
}

/// Input data for creating a new short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub short_key: String,
    pub original_url: String,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewShortLink {
    /// Builds a link created at `now` that expires one TTL later.
    pub fn starting_at(
        short_key: String,
        original_url: String,
        owner_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            short_key,
            original_url,
            owner_id,
            created_at: now,
            expires_at: now + link_ttl(),
        }
    }
}

/// Outcome of trying to persist a link under a freshly generated key.
#[derive(Debug, Clone)]
pub enum KeyClaim {
    /// The key was free and the link is stored.
    Created(ShortLink),
    /// Another link already owns the key; nothing was written.
    Taken,
    /// The owner id has no user row; nothing was written.
    UnknownOwner,
}
