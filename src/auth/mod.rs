use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::config::JwtConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token decoding failed")]
    Decode,

    #[error("Invalid authentication scheme")]
    Scheme,

    #[error("Missing authorization credentials")]
    MissingCredentials,

    #[error("Invalid or expired token")]
    Invalid,

    #[error("Unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token generation error: {0}")]
    TokenGeneration(String),
}

/// Signed token payload. Validity is derived solely by re-decoding and
/// comparing `expires` to the current time; nothing is persisted.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPayload {
    pub expires: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Issues and verifies bearer tokens with a shared secret and fixed algorithm.
#[derive(Clone)]
pub struct TokenHandler {
    secret: String,
    algorithm: Algorithm,
    expiration_secs: i64,
}

impl TokenHandler {
    pub fn new(config: &JwtConfig) -> Result<Self, AuthError> {
        let algorithm = config
            .algorithm
            .parse()
            .map_err(|_| AuthError::UnsupportedAlgorithm(config.algorithm.clone()))?;
        Ok(Self {
            secret: config.secret.clone(),
            algorithm,
            expiration_secs: config.expiration_secs,
        })
    }

    /// Sign a payload expiring `expiration_secs` from now.
    pub fn create_token(&self) -> Result<TokenResponse, AuthError> {
        let payload = TokenPayload {
            expires: Utc::now().timestamp() + self.expiration_secs,
        };
        let token = encode(
            &Header::new(self.algorithm),
            &payload,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|err| {
            error!("Caught error during JWT token creation: {}", err);
            AuthError::TokenGeneration(err.to_string())
        })?;
        Ok(TokenResponse {
            access_token: token,
        })
    }

    /// Verify signature and algorithm, then check the embedded expiration.
    ///
    /// Returns `Ok(None)` when the token decodes but `expires` has passed:
    /// an invalid token, not an error.
    pub fn decode_token(&self, token: &str) -> Result<Option<TokenPayload>, AuthError> {
        // The payload carries `expires`, not the registered `exp` claim,
        // so spec-claim validation is disabled and expiry checked by hand.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<TokenPayload>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|err| {
            error!("Caught exception during JWT token decoding: {}", err);
            AuthError::Decode
        })?;

        if data.claims.expires >= Utc::now().timestamp() {
            Ok(Some(data.claims))
        } else {
            Ok(None)
        }
    }
}
