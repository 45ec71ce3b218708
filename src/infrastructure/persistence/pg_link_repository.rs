//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{KeyClaim, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::{
    OWNER_CONSTRAINT, SHORT_KEY_CONSTRAINT, is_foreign_key_violation_on, is_unique_violation_on,
};

/// PostgreSQL repository for short link storage and resolution.
///
/// Every method is a single statement, so no write can be left half-applied.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: i64,
    short_key: String,
    original_url: String,
    user_id: Option<i64>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<LinkRow> for ShortLink {
    fn from(r: LinkRow) -> Self {
        ShortLink::new(
            r.id,
            r.short_key,
            r.original_url,
            r.user_id,
            r.created_at,
            r.expires_at,
        )
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn claim_key(&self, new_link: NewShortLink) -> Result<KeyClaim, AppError> {
        let result = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO urls (short_key, original_url, user_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, short_key, original_url, user_id, created_at, expires_at
            "#,
        )
        .bind(&new_link.short_key)
        .bind(&new_link.original_url)
        .bind(new_link.owner_id)
        .bind(new_link.created_at)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(KeyClaim::Created(row.into())),
            Err(e) if is_unique_violation_on(&e, SHORT_KEY_CONSTRAINT) => Ok(KeyClaim::Taken),
            Err(e) if is_foreign_key_violation_on(&e, OWNER_CONSTRAINT) => {
                Ok(KeyClaim::UnknownOwner)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_active(
        &self,
        short_key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, short_key, original_url, user_id, created_at, expires_at
            FROM urls
            WHERE short_key = $1 AND expires_at > $2
            "#,
        )
        .bind(short_key)
        .bind(now)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self, live_at: Option<DateTime<Utc>>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM urls WHERE ($1::timestamptz IS NULL OR expires_at > $1)",
        )
        .bind(live_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
