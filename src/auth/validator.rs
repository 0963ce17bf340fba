//! Bearer token verification
//!
//! Implements the validation sequence for incoming credentials: check the
//! unverified header against the algorithm allow-list, match its key ID
//! against the trusted key set, then verify signature, expiry, audience,
//! and issuer in one pass.

use super::keys::KeySet;
use super::token::{AuthError, Claims};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

/// Verifies bearer tokens against the issuer's key set
pub struct TokenValidator {
    keys: KeySet,
    algorithms: Vec<Algorithm>,
    audience: String,
    issuer: String,
}

impl TokenValidator {
    /// Create a validator for the given key set and expectations
    pub fn new(
        keys: KeySet,
        algorithms: Vec<Algorithm>,
        audience: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            keys,
            algorithms,
            audience: audience.into(),
            issuer: issuer.into(),
        }
    }

    /// Decode and verify a raw bearer token, returning its claim set
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidHeader)?;

        if !self.algorithms.contains(&header.alg) {
            return Err(AuthError::InvalidHeader);
        }

        let kid = header.kid.as_deref().ok_or(AuthError::InvalidHeader)?;
        let key = self.keys.find(kid).ok_or(AuthError::InvalidHeader)?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);

        match decode::<Claims>(token, &key.decoding_key()?, &validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::TokenExpired),
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => {
                    Err(AuthError::InvalidClaims)
                }
                _ => Err(AuthError::VerificationFailed),
            },
        }
    }
}
