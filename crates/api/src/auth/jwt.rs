//! Verification of bearer tokens issued by the hosted auth provider.
//!
//! Tokens are HS256-signed with a shared secret. Only the email claim is used
//! to resolve the caller; role and discipline come from the database.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims read from every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the auth provider's user id.
    pub sub: String,
    pub email: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
    /// Expected `aud` claim. `None` skips the audience check.
    pub audience: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var        | Required | Default |
    /// |----------------|----------|---------|
    /// | `JWT_SECRET`   | **yes**  | --      |
    /// | `JWT_AUDIENCE` | no       | unset   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let audience = std::env::var("JWT_AUDIENCE")
            .ok()
            .filter(|a| !a.trim().is_empty());

        Self { secret, audience }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature, expiration and, when configured, the audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    match &config.audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign `claims` with the configured secret.
///
/// Production tokens come from the auth provider; this is used by local
/// tooling and tests.
pub fn sign_token(claims: &Claims, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
