//! Argon2id password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use tokengate_core::config::auth::AuthConfig;

use crate::error::AuthError;

/// Plaintext behind the dummy hash burned on malformed hashes and unknown users.
const DUMMY_PASSWORD: &str = "tokengate-dummy-password";

/// Handles password hashing and verification using Argon2id.
///
/// The configured cost is the Argon2 time cost (iterations). Stored hashes
/// are PHC strings carrying their own salt and parameters.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash of [`DUMMY_PASSWORD`] with the configured parameters.
    dummy_hash: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl PasswordHasher {
    /// Creates a hasher with the configured work factor.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let params = Params::new(
            Params::DEFAULT_M_COST,
            config.password_hash_cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| AuthError::NotInitialized(format!("invalid password hash cost: {e}")))?;

        let mut hasher = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(hasher)
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verifies a candidate password against a stored hash.
    ///
    /// A malformed stored hash is treated as a mismatch, after running a
    /// verification of equal cost.
    pub fn verify(&self, hashed: &str, candidate: &str) -> bool {
        match PasswordHash::new(hashed) {
            Ok(parsed) => self
                .argon2
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                self.burn(candidate);
                false
            }
        }
    }

    /// Runs one verification against the dummy hash and discards the result.
    pub fn burn(&self, candidate: &str) {
        if let Ok(parsed) = PasswordHash::new(&self.dummy_hash) {
            let _ = self.argon2.verify_password(candidate.as_bytes(), &parsed);
        }
    }
}
