//! Token types for the menu's authorization flow
//!
//! Provides:
//! - Permission enum naming the gated operations
//! - Claims struct for the decoded bearer payload
//! - Header parsing for the `bearer` scheme

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authorization errors
///
/// Each variant knows the HTTP status it surfaces as; the web layer
/// serializes status and message verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header missing or malformed")]
    InvalidHeader,

    #[error("token expired")]
    TokenExpired,

    #[error("incorrect claims, check the audience and issuer")]
    InvalidClaims,

    #[error("unable to parse authentication token")]
    VerificationFailed,

    #[error("permissions not included in token")]
    MissingPermissions,

    #[error("permission '{0}' not granted")]
    Forbidden(Permission),

    #[error("unable to fetch signing keys: {0}")]
    KeyFetch(String),
}

impl AuthError {
    /// HTTP status code this error surfaces as
    pub fn status(&self) -> u16 {
        match self {
            AuthError::InvalidHeader => 401,
            AuthError::TokenExpired => 401,
            AuthError::InvalidClaims => 401,
            AuthError::VerificationFailed => 400,
            AuthError::MissingPermissions => 400,
            AuthError::Forbidden(_) => 403,
            AuthError::KeyFetch(_) => 503,
        }
    }
}

/// Permissions understood by the menu endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Read the menu with full recipes
    ReadDetail,
    /// Add a drink to the menu
    Create,
    /// Edit an existing drink
    Update,
    /// Remove a drink from the menu
    Delete,
}

impl Permission {
    /// The wire spelling carried in token permission lists
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ReadDetail => "get:drinks-detail",
            Permission::Create => "post:drinks",
            Permission::Update => "patch:drinks",
            Permission::Delete => "delete:drinks",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token audience: issuers emit either a single service name or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Validated claim set decoded from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject the token was granted to
    pub sub: String,
    /// Intended audience
    pub aud: Audience,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Permissions granted to the subject, absent when the issuer
    /// attached none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    /// Require a permission, failing with the matching authorization error
    pub fn require(&self, permission: Permission) -> Result<(), AuthError> {
        let granted = self
            .permissions
            .as_ref()
            .ok_or(AuthError::MissingPermissions)?;

        if granted.iter().any(|p| p == permission.as_str()) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(permission))
        }
    }
}

/// Extract the raw token from an Authorization header value
///
/// The header must be exactly two space-separated parts with the literal
/// `bearer` scheme, matching what the menu's token service issues.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::InvalidHeader),
    }
}
