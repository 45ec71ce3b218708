//! Request extractors shared by handlers.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use std::convert::Infallible;

use crate::state::AppState;

/// Optional caller identity resolved from the `Authorization` header.
///
/// Never rejects: a missing, malformed, expired or forged token yields
/// `MaybeUser(None)`. Handlers that require identity must reject on `None`
/// themselves.
///
/// The header value is taken as the raw token. A leading `Bearer ` scheme is
/// accepted and stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeUser(pub Option<i64>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = raw_token(&parts.headers);
        Ok(MaybeUser(state.auth_service.identify(token)))
    }
}

/// Extracts the token from the `Authorization` header, if any.
pub fn raw_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };

    (!token.is_empty()).then_some(token)
}
