/**
 * Caller Identity
 *
 * Tokens are issued and validated by an external identity provider. The
 * server only needs a stable owner id, so the bearer token itself is taken
 * as the caller's `ownerId`.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::backend::error::BackendError;

/// Owner id of the caller, taken from `Authorization: Bearer <token>`
///
/// Rejects with 401 when the header is missing, not `Bearer`, or empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller(pub String);

impl Caller {
    pub fn owner_id(&self) -> &str {
        &self.0
    }
}

/// Extract the bearer token from request headers
pub fn extract_caller(headers: &HeaderMap) -> Result<Caller, BackendError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| BackendError::unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| BackendError::unauthorized("Invalid Authorization header format"))?;

    Ok(Caller(token.to_string()))
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_caller(&parts.headers)
    }
}
