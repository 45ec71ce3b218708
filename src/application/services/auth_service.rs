//! Account registration, login and identity resolution.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::application::services::TokenService;
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::telemetry;
use crate::utils::password::{hash_password, verify_password};

/// Upper bound on username length, matching the `users.username` column.
pub const MAX_USERNAME_LEN: usize = 50;

/// Service for user registration and credential checks.
///
/// Password hashing and verification run on the blocking pool so a slow hash
/// never stalls the async executor.
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R: UserRepository> AuthService<R> {
    /// Creates a new authentication service.
    pub fn new(repository: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repository, tokens }
    }

    /// Registers a new user.
    ///
    /// Emptiness is checked before any hashing work. There is no existence
    /// pre-check: the store's unique constraint decides duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if either field is empty or the username is too long.
    /// Returns [`AppError::Conflict`] if the username is taken.
    /// Returns [`AppError::Internal`] on hashing or database errors.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::bad_request(
                "Username and password are required",
                json!({}),
            ));
        }

        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(AppError::bad_request(
                "Username is too long",
                json!({ "max_length": MAX_USERNAME_LEN }),
            ));
        }

        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing task failed");
                AppError::internal("Internal server error")
            })?
            .map_err(|e| {
                tracing::error!(error = %e, "password hashing failed");
                AppError::internal("Internal server error")
            })?;

        let user = self
            .repository
            .create(NewUser {
                username: username.to_owned(),
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        metrics::counter!(telemetry::USERS_REGISTERED).increment(1);
        tracing::info!(user_id = user.id, username = %user.username, "user registered");

        Ok(user)
    }

    /// Checks credentials and issues a bearer token for the user.
    ///
    /// An unknown username and a wrong password produce the same error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] on bad credentials.
    /// Returns [`AppError::Internal`] on database, verification or signing errors.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let Some(user) = self.repository.find_by_username(username).await? else {
            tracing::warn!(username = %username, "login for unknown user");
            return Err(invalid_credentials());
        };

        let password = password.to_owned();
        let stored_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "password verification task failed");
                    AppError::internal("Internal server error")
                })?
                .map_err(|e| {
                    tracing::error!(user_id = user.id, error = %e, "stored password hash is unreadable");
                    AppError::internal("Internal server error")
                })?;

        if !matches {
            tracing::warn!(user_id = user.id, "login with wrong password");
            return Err(invalid_credentials());
        }

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = user.id, "token issued");

        Ok(token)
    }

    /// Resolves an optional bearer token to a user id.
    ///
    /// Total: any invalid, expired or missing token yields `None`.
    pub fn identify(&self, token: Option<&str>) -> Option<i64> {
        token.and_then(|t| self.tokens.verify(t))
    }
}

fn invalid_credentials() -> AppError {
    metrics::counter!(telemetry::LOGINS_FAILED).increment(1);
    AppError::unauthorized("Invalid credentials", json!({}))
}
