//! Access-token decoding for requests arriving from the identity provider.
//!
//! Tokens are issued and refreshed by the external identity provider; this
//! service only verifies the shared-secret signature and reads the claims it
//! needs to resolve a principal. It never mints tokens of its own.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config;

/// Claims read from the identity provider's access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
}

/// Verify an access token's signature and expiry and return its claims.
pub fn decode_access_token(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid access token: {}", e))
}
