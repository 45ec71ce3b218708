//! Short key generation.
//!
//! Keys are drawn from OS randomness and encoded as URL-safe base64 without
//! padding. Six random bytes give an 8-character key over a 48-bit space.

use crate::domain::entities::SHORT_KEY_LEN;
use crate::error::AppError;
use base64::Engine as _;

/// Length of random bytes before base64 encoding.
const KEY_BYTES: usize = SHORT_KEY_LEN / 4 * 3;

/// Generates a random short key of [`SHORT_KEY_LEN`] characters.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let key = generate_key()?;
/// assert_eq!(key.len(), 8);
/// assert!(key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
/// ```
pub fn generate_key() -> Result<String, AppError> {
    let mut buffer = [0u8; KEY_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        tracing::error!(error = %e, "system RNG failed");
        AppError::internal("Internal server error")
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Returns true if `key` has the shape of a generated key.
///
/// Lookups for keys that could never have been generated skip the database.
pub fn is_well_formed(key: &str) -> bool {
    key.len() == SHORT_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
