//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use tokengate_core::config::auth::AuthConfig;
use tokengate_entity::user::Identity;

use super::claims::Claims;
use crate::error::AuthError;

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL.
    access_ttl: Duration,
    /// Refresh token TTL.
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    ///
    /// Fails if the secret is blank or a TTL is not positive.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(AuthError::NotInitialized("signing secret is empty".into()));
        }
        if config.access_ttl_hours <= 0 || config.refresh_ttl_hours <= 0 {
            return Err(AuthError::NotInitialized(
                "token TTLs must be positive".into(),
            ));
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::hours(config.access_ttl_hours),
            refresh_ttl: Duration::hours(config.refresh_ttl_hours),
        })
    }

    /// Issues an access + refresh token pair for the identity, as of now.
    pub fn issue(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a token pair as of `now`. Output is deterministic in
    /// (identity, secret, `now` truncated to seconds).
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<TokenPair, AuthError> {
        let access_expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let access_token = self.sign(&Claims::for_identity(identity, now, access_expires_at))?;
        let refresh_token = self.sign(&Claims::for_identity(identity, now, refresh_expires_at))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("failed to sign token: {e}")))
    }
}
