//! JWT token verification.
//!
//! Verification is a pure function of the token, the secret and the clock.
//! No store lookup happens here, so an issued token stays valid until it
//! expires.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use tokengate_core::config::auth::AuthConfig;

use super::claims::Claims;
use crate::error::AuthError;

/// The only accepted signing algorithm.
const EXPECTED_ALG: &str = "HS256";

/// Just enough of the JOSE header to check the algorithm.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Validates JWT tokens into [`Claims`].
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Signature-only validation; time checks are done against an explicit clock.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(AuthError::NotInitialized("signing secret is empty".into()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "nbf"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        })
    }

    /// Verifies a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as of `now`.
    ///
    /// Checks run in order: structure, algorithm, signature, expiry,
    /// not-before. An expired token with a valid signature is therefore
    /// always reported as [`AuthError::Expired`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let segments: Vec<&str> = token.split('.').collect();
        let [header, payload, _signature] = segments.as_slice() else {
            return Err(AuthError::Malformed);
        };

        let header: RawHeader = decode_segment(header)?;
        if header.alg != EXPECTED_ALG {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }
        decode_segment::<Claims>(payload)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::Base64(_) => {
                    AuthError::SignatureInvalid
                }
                JwtErrorKind::InvalidAlgorithm => {
                    AuthError::UnsupportedAlgorithm(EXPECTED_ALG.to_string())
                }
                _ => AuthError::Malformed,
            })?
            .claims;

        let now = now.timestamp();
        if now >= claims.exp {
            return Err(AuthError::Expired);
        }
        if now < claims.nbf {
            return Err(AuthError::NotYetValid);
        }
        Ok(claims)
    }
}

/// Decodes a base64url JSON segment, mapping any failure to `Malformed`.
fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)
}
