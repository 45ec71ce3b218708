//! Bearer token issuance and verification.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The only algorithm tokens are issued with or accepted under.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// How long an issued token stays valid.
pub fn token_ttl() -> Duration {
    Duration::hours(24)
}

/// Claims carried by every token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, as a decimal string.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 tokens with a process-wide secret.
///
/// Holds no store reference: verification is purely local.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a token service from the shared signing secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked exactly against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `user_id` valid for 24 hours from now.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing fails.
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + token_ttl()).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            AppError::internal("Internal server error")
        })
    }

    /// Resolves a token to its subject, or `None` if it is not valid now.
    pub fn verify(&self, token: &str) -> Option<i64> {
        self.verify_at(token, Utc::now())
    }

    /// Resolves a token to its subject as of `now`.
    ///
    /// Never fails: a bad signature, foreign algorithm, malformed token,
    /// non-numeric subject, or `now >= exp` all yield `None`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<i64> {
        let data =
            match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
                Ok(data) => data,
                Err(e) => {
                    tracing::debug!(error = %e, "token rejected");
                    return None;
                }
            };

        if now.timestamp() >= data.claims.exp {
            tracing::debug!("token expired");
            return None;
        }

        data.claims.sub.parse().ok()
    }
}
