//! Bearer-token authorization for the menu endpoints
//!
//! Provides role-gated access to the management routes:
//! - Extract bearer credentials from Authorization headers
//! - Verify signatures against the issuer's published key set
//! - Check the permissions a token grants against what a route requires

mod keys;
mod token;
mod validator;

pub use keys::{Jwk, KeySet};
pub use token::{bearer_token, Audience, AuthError, Claims, Permission};
pub use validator::TokenValidator;
