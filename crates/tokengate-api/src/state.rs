//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use tokengate_auth::{
    AccountService, AuthError, AuthorizationPolicy, CredentialManager, CredentialStore,
    JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator,
};
use tokengate_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Bearer token verifier.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Signup and login.
    pub credential_manager: Arc<CredentialManager>,
    /// User management.
    pub account_service: Arc<AccountService>,
}

impl AppState {
    /// Wires the credential components over `store`.
    ///
    /// Fails with [`AuthError::NotInitialized`] when the signing secret is
    /// blank or the hashing parameters are invalid.
    pub fn build(config: AppConfig, store: Arc<dyn CredentialStore>) -> Result<Self, AuthError> {
        let hasher = Arc::new(PasswordHasher::new(&config.auth)?);
        let validator = PasswordValidator::new(&config.auth);
        let encoder = Arc::new(JwtEncoder::new(&config.auth)?);
        let decoder = Arc::new(JwtDecoder::new(&config.auth)?);
        let store_timeout = Duration::from_secs(config.database.operation_timeout_seconds);

        let credential_manager = Arc::new(CredentialManager::new(
            Arc::clone(&store),
            Arc::clone(&hasher),
            validator.clone(),
            encoder,
            store_timeout,
        ));
        let account_service = Arc::new(AccountService::new(
            store,
            hasher,
            validator,
            AuthorizationPolicy::new(),
            store_timeout,
        ));

        Ok(Self {
            config: Arc::new(config),
            jwt_decoder: decoder,
            credential_manager,
            account_service,
        })
    }
}
