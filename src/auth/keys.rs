//! Trusted signing keys
//!
//! Fetches the key set published by the token issuer and maps key IDs
//! from token headers to verification keys.

use super::token::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::DecodingKey;
use serde::Deserialize;

/// A single signing key from the issuer's published key set
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type ("RSA" for issuer keys, "oct" for symmetric test keys)
    pub kty: String,
    /// Key identifier, matched against the token header
    pub kid: String,
    /// Intended key use ("sig")
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
    /// Algorithm hint from the issuer
    #[serde(default)]
    pub alg: Option<String>,
    /// RSA modulus, base64url
    #[serde(default)]
    pub n: Option<String>,
    /// RSA public exponent, base64url
    #[serde(default)]
    pub e: Option<String>,
    /// Symmetric key material, base64url
    #[serde(default)]
    pub k: Option<String>,
}

impl Jwk {
    /// Build a verification key from the JWK parameters
    ///
    /// A key that cannot be turned into usable verification material is
    /// treated the same as an unknown key.
    pub fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        match self.kty.as_str() {
            "RSA" => {
                let n = self.n.as_deref().ok_or(AuthError::InvalidHeader)?;
                let e = self.e.as_deref().ok_or(AuthError::InvalidHeader)?;
                DecodingKey::from_rsa_components(n, e).map_err(|_| AuthError::InvalidHeader)
            }
            "oct" => {
                let k = self.k.as_deref().ok_or(AuthError::InvalidHeader)?;
                let secret = URL_SAFE_NO_PAD
                    .decode(k)
                    .map_err(|_| AuthError::InvalidHeader)?;
                Ok(DecodingKey::from_secret(&secret))
            }
            _ => Err(AuthError::InvalidHeader),
        }
    }
}

/// The issuer's published key set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeySet {
    pub keys: Vec<Jwk>,
}

impl KeySet {
    /// Fetch the key set from the issuer's distribution endpoint
    pub async fn fetch(url: &str) -> Result<Self, AuthError> {
        let response = reqwest::get(url)
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        response
            .json::<KeySet>()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))
    }

    /// Look up a key by its ID
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issuer_key_set() {
        let json = r#"{
            "keys": [
                {
                    "kty": "RSA",
                    "kid": "menu-signing-1",
                    "use": "sig",
                    "alg": "RS256",
                    "n": "xGOr-H7A-PWG3_K8dFhT",
                    "e": "AQAB"
                },
                {
                    "kty": "RSA",
                    "kid": "menu-signing-2",
                    "use": "sig",
                    "alg": "RS256",
                    "n": "0vx7agoebGcQSuuPiLJX",
                    "e": "AQAB"
                }
            ]
        }"#;

        let keys: KeySet = serde_json::from_str(json).unwrap();
        assert_eq!(keys.keys.len(), 2);
        assert!(keys.find("menu-signing-1").is_some());
        assert!(keys.find("menu-signing-2").is_some());
        assert!(keys.find("rotated-away").is_none());
    }

    #[test]
    fn test_symmetric_key_material() {
        let jwk = Jwk {
            kty: "oct".to_string(),
            kid: "test".to_string(),
            key_use: Some("sig".to_string()),
            alg: Some("HS256".to_string()),
            n: None,
            e: None,
            k: Some(URL_SAFE_NO_PAD.encode(b"a-shared-secret")),
        };

        assert!(jwk.decoding_key().is_ok());
    }

    #[test]
    fn test_unsupported_key_type_rejected() {
        let jwk = Jwk {
            kty: "EC".to_string(),
            kid: "ec-key".to_string(),
            key_use: None,
            alg: None,
            n: None,
            e: None,
            k: None,
        };

        assert!(matches!(jwk.decoding_key(), Err(AuthError::InvalidHeader)));
    }

    #[test]
    fn test_rsa_key_without_modulus_rejected() {
        let jwk = Jwk {
            kty: "RSA".to_string(),
            kid: "partial".to_string(),
            key_use: None,
            alg: None,
            n: None,
            e: Some("AQAB".to_string()),
            k: None,
        };

        assert!(matches!(jwk.decoding_key(), Err(AuthError::InvalidHeader)));
    }
}
