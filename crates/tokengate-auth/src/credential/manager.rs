//! Credential manager: password login and signup.
//!
//! Both flows end with a freshly issued token pair recorded in the store.
//! Hashing runs on the blocking pool.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use tokengate_core::error::AppError;
use tokengate_entity::user::{User, UserRole};

use crate::error::AuthError;
use crate::jwt::{JwtEncoder, TokenPair};
use crate::password::{PasswordHasher, PasswordValidator};
use crate::store::{CredentialStore, bounded};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number.
    pub phone: String,
    /// Requested role name, `ADMIN` or `USER`.
    pub user_type: String,
}

/// An identity record together with the pair just issued for it.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    /// Stored identity record.
    pub user: User,
    /// The issued token pair.
    pub tokens: TokenPair,
}

/// Orchestrates login and signup.
#[derive(Clone)]
pub struct CredentialManager {
    /// Identity and token persistence.
    store: Arc<dyn CredentialStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy.
    validator: PasswordValidator,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
    /// Deadline for each store call.
    store_timeout: Duration,
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

impl CredentialManager {
    /// Creates a new credential manager.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        validator: PasswordValidator,
        encoder: Arc<JwtEncoder>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            validator,
            encoder,
            store_timeout,
        }
    }

    /// Creates an account and issues its first token pair.
    ///
    /// The identity and the pair are persisted in one store call.
    pub async fn signup(&self, request: SignupRequest) -> Result<IssuedCredentials, AppError> {
        self.validator.validate(&request.password)?;
        let role: UserRole = request.user_type.parse()?;

        let password_hash = self.hash_password(request.password).await?;

        let now = Utc::now();
        let mut user = User {
            id: Uuid::new_v4(),
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            password_hash,
            user_type: role,
            token: None,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };

        let tokens = self.encoder.issue_at(&user.identity(), now)?;
        user.token = Some(tokens.access_token.clone());
        user.refresh_token = Some(tokens.refresh_token.clone());

        let user = bounded(
            self.store_timeout,
            "insert_user",
            self.store.insert_user(&user),
        )
        .await
        .inspect_err(|e| warn!(email = %user.email, error = %e, "Signup rejected"))?;

        info!(user_id = %user.id, user_type = %user.user_type, "User signed up");
        Ok(IssuedCredentials { user, tokens })
    }

    /// Authenticates by email and password and issues a new token pair.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedCredentials, AppError> {
        let found = bounded(
            self.store_timeout,
            "find_by_email",
            self.store.find_by_email(email),
        )
        .await?;

        let hasher = Arc::clone(&self.hasher);
        let candidate = password.to_string();
        let stored_hash = found.as_ref().map(|u| u.password_hash.clone());
        let matched = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&hash, &candidate),
            None => {
                hasher.burn(&candidate);
                false
            }
        })
        .await
        .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))?;

        let user = match found {
            Some(user) if matched => user,
            _ => {
                warn!(
                    email = %email,
                    code = AuthError::CredentialsInvalid.code(),
                    "Login failed"
                );
                return Err(AuthError::CredentialsInvalid.into());
            }
        };

        let subject_id = user.subject_id();
        let now = Utc::now();
        let tokens = self.encoder.issue_at(&user.identity(), now)?;
        bounded(
            self.store_timeout,
            "record_issued_pair",
            self.store.record_issued_pair(
                &subject_id,
                &tokens.access_token,
                &tokens.refresh_token,
                now,
            ),
        )
        .await?;

        let fresh = bounded(
            self.store_timeout,
            "find_by_subject_id",
            self.store.find_by_subject_id(&subject_id),
        )
        .await?;
        let user = fresh.unwrap_or_else(|| User {
            token: Some(tokens.access_token.clone()),
            refresh_token: Some(tokens.refresh_token.clone()),
            ..user
        });

        info!(user_id = %subject_id, "User logged in");
        Ok(IssuedCredentials { user, tokens })
    }

    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task failed: {e}")))?
    }
}
