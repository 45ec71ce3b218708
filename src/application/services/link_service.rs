//! Link creation and resolution service.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{KeyClaim, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::telemetry;
use crate::utils::code_generator::{generate_key, is_well_formed};

/// Attempts at finding a free key before giving up.
const MAX_KEY_ATTEMPTS: usize = 5;

/// Service for creating and resolving short links.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    base_url: String,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are built on, e.g.
    /// `https://s.example.com`.
    pub fn new(link_repository: Arc<L>, base_url: impl Into<String>) -> Self {
        Self {
            link_repository,
            base_url: base_url.into(),
        }
    }

    /// Creates a short link for `url`, owned by `owner_id` when present.
    ///
    /// The URL is stored as given; only emptiness is checked. If `owner_id`
    /// names no user, the link is stored anonymously instead.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `url` is empty.
    /// Returns [`AppError::Internal`] on database errors or if no free key was found.
    pub async fn shorten(&self, url: &str, owner_id: Option<i64>) -> Result<ShortLink, AppError> {
        self.shorten_at(url, owner_id, Utc::now()).await
    }

    /// Same as [`Self::shorten`] with an explicit creation time.
    pub async fn shorten_at(
        &self,
        url: &str,
        owner_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<ShortLink, AppError> {
        if url.is_empty() {
            return Err(AppError::bad_request("URL is required", json!({})));
        }

        let mut owner_id = owner_id;

        for attempt in 1..=MAX_KEY_ATTEMPTS {
            let new_link =
                NewShortLink::starting_at(generate_key()?, url.to_owned(), owner_id, now);

            match self.link_repository.claim_key(new_link).await? {
                KeyClaim::Created(link) => {
                    metrics::counter!(telemetry::LINKS_CREATED).increment(1);
                    tracing::info!(
                        short_key = %link.short_key,
                        owner_id = ?link.owner_id,
                        "short link created"
                    );
                    return Ok(link);
                }
                KeyClaim::Taken => {
                    metrics::counter!(telemetry::SHORT_KEY_COLLISIONS).increment(1);
                    tracing::warn!(attempt, "short key collision, retrying");
                }
                KeyClaim::UnknownOwner => {
                    // A valid token for a user that no longer exists.
                    tracing::warn!(
                        owner_id = ?owner_id,
                        "token subject has no user, storing anonymously"
                    );
                    owner_id = None;
                }
            }
        }

        tracing::error!(attempts = MAX_KEY_ATTEMPTS, "no free short key found");
        Err(AppError::internal("Failed to shorten URL"))
    }

    /// Resolves a key to its link if it exists and has not expired.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown and expired keys alike.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve(&self, short_key: &str) -> Result<ShortLink, AppError> {
        self.resolve_at(short_key, Utc::now()).await
    }

    /// Same as [`Self::resolve`] evaluated at `now`.
    pub async fn resolve_at(
        &self,
        short_key: &str,
        now: DateTime<Utc>,
    ) -> Result<ShortLink, AppError> {
        let link = if is_well_formed(short_key) {
            self.link_repository.find_active(short_key, now).await?
        } else {
            None
        };

        link.ok_or_else(|| AppError::not_found("URL not found or expired", json!({})))
    }

    /// Constructs the full short URL for a key.
    pub fn short_url(&self, short_key: &str) -> String {
        format!("{}/url/{}", self.base_url.trim_end_matches('/'), short_key)
    }

    /// Deletes links that expired at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let removed = self.link_repository.purge_expired(now).await?;
        tracing::info!(removed, "expired links purged");
        Ok(removed)
    }

    /// Checks that the link store is reachable.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{SHORT_KEY_LEN, link_ttl};
    use crate::domain::repositories::MockLinkRepository;
    use std::sync::Mutex;

    fn created(new_link: NewShortLink) -> KeyClaim {
        KeyClaim::Created(ShortLink::new(
            1,
            new_link.short_key,
            new_link.original_url,
            new_link.owner_id,
            new_link.created_at,
            new_link.expires_at,
        ))
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_claim_key()
            .withf(|new_link| {
                new_link.short_key.len() == SHORT_KEY_LEN
                    && new_link.original_url == "https://example.com"
                    && new_link.owner_id == Some(3)
                    && new_link.expires_at - new_link.created_at == link_ttl()
            })
            .times(1)
            .returning(|new_link| Ok(created(new_link)));

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let link = service
            .shorten("https://example.com", Some(3))
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.owner_id, Some(3));
    }

    #[tokio::test]
    async fn test_shorten_anonymous() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_claim_key()
            .withf(|new_link| new_link.owner_id.is_none())
            .times(1)
            .returning(|new_link| Ok(created(new_link)));

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let link = service.shorten("ftp://whatever", None).await.unwrap();
        assert!(link.is_anonymous());
    }

    #[tokio::test]
    async fn test_shorten_empty_url() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_claim_key().times(0);

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let result = service.shorten("", None).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_shorten_retries_with_fresh_key_on_collision() {
        let mut mock_repo = MockLinkRepository::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_mock = seen.clone();

        let mut calls = 0;
        mock_repo
            .expect_claim_key()
            .times(3)
            .returning(move |new_link| {
                calls += 1;
                seen_in_mock.lock().unwrap().push(new_link.short_key.clone());
                if calls < 3 {
                    Ok(KeyClaim::Taken)
                } else {
                    Ok(created(new_link))
                }
            });

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let link = service.shorten("https://example.com", None).await.unwrap();

        let keys = seen.lock().unwrap();
        assert_eq!(keys.len(), 3);
        assert_ne!(keys[0], keys[1]);
        assert_eq!(link.short_key, keys[2]);
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_max_attempts() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_claim_key()
            .times(MAX_KEY_ATTEMPTS)
            .returning(|_| Ok(KeyClaim::Taken));

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let result = service.shorten("https://example.com", None).await;
        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_shorten_unknown_owner_falls_back_to_anonymous() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_claim_key()
            .withf(|new_link| new_link.owner_id == Some(999_999))
            .times(1)
            .returning(|_| Ok(KeyClaim::UnknownOwner));
        mock_repo
            .expect_claim_key()
            .withf(|new_link| new_link.owner_id.is_none())
            .times(1)
            .returning(|new_link| Ok(created(new_link)));

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let link = service
            .shorten("https://example.com", Some(999_999))
            .await
            .unwrap();

        assert!(link.is_anonymous());
    }

    #[tokio::test]
    async fn test_shorten_store_failure_is_not_retried() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_claim_key()
            .times(1)
            .returning(|_| Err(AppError::internal("Internal server error")));

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let result = service.shorten("https://example.com", None).await;
        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut mock_repo = MockLinkRepository::new();
        let now = Utc::now();

        mock_repo
            .expect_find_active()
            .withf(|key, _| key == "abcd1234")
            .times(1)
            .returning(move |key, _| {
                Ok(Some(ShortLink::new(
                    1,
                    key.to_string(),
                    "https://example.com".to_string(),
                    None,
                    now,
                    now + link_ttl(),
                )))
            });

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let link = service.resolve("abcd1234").await.unwrap();
        assert_eq!(link.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_resolve_missing_is_not_found() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_active()
            .times(1)
            .returning(|_, _| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let result = service.resolve("abcd1234").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_malformed_key_skips_store() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_active().times(0);

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        let result = service.resolve("way-too-long-key").await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_purge_expired_reports_removed_count() {
        let mut mock_repo = MockLinkRepository::new();
        let now = Utc::now();

        mock_repo
            .expect_purge_expired()
            .withf(move |at| *at == now)
            .times(1)
            .returning(|_| Ok(4));

        let service = LinkService::new(Arc::new(mock_repo), "http://localhost:8080");

        assert_eq!(service.purge_expired(now).await.unwrap(), 4);
    }

    #[test]
    fn test_short_url() {
        let service = LinkService::new(Arc::new(MockLinkRepository::new()), "https://s.example.com/");
        assert_eq!(
            service.short_url("abcd1234"),
            "https://s.example.com/url/abcd1234"
        );
    }
}
