//! Request authentication guard
//!
//! First stage of the protected-route chain. Extracts the bearer
//! credential from the Authorization header, verifies it, and hands the
//! claims to the handler. Authorization itself happens in the handler
//! via `Claims::require`, so each route names the permission it needs.

use super::error::ApiError;
use crate::auth::{bearer_token, AuthError, Claims, TokenValidator};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use std::sync::Arc;

/// Extractor that authenticates the request's bearer credential
///
/// Rejects with the authorization error envelope when the credential is
/// missing, malformed, or fails verification.
pub struct BearerClaims(pub Claims);

impl std::ops::Deref for BearerClaims {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for BearerClaims
where
    Arc<TokenValidator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let validator = Arc::<TokenValidator>::from_ref(state);

        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::InvalidHeader)?;

        let token = bearer_token(header)?;
        let claims = validator.decode(token)?;

        Ok(BearerClaims(claims))
    }
}
