//! Credential lifecycle error taxonomy.

use thiserror::Error;

use tokengate_core::error::{AppError, ErrorKind};

/// Message returned for every failed password login.
pub const CREDENTIALS_INVALID_MESSAGE: &str = "Email or password is incorrect";

/// Message returned for every failed token verification.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Errors raised while hashing, issuing, verifying or persisting credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A component was constructed without its required material.
    #[error("credential component not initialized: {0}")]
    NotInitialized(String),

    /// The token could not be decoded.
    #[error("token is malformed")]
    Malformed,

    /// The token header names an algorithm other than HS256.
    #[error("unsupported token algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    /// The token signature does not match.
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// The token is past its expiry.
    #[error("token has expired")]
    Expired,

    /// The token's not-before instant is in the future.
    #[error("token is not yet valid")]
    NotYetValid,

    /// Email/password pair rejected. Deliberately carries no detail.
    #[error("invalid credentials")]
    CredentialsInvalid,

    /// The credential store could not be reached in time.
    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),

    /// A unique identity attribute is already taken.
    #[error("{0}")]
    Conflict(String),

    /// Anything else.
    #[error("internal credential error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Stable machine code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized(_) => "NOT_INITIALIZED",
            Self::Malformed => "MALFORMED",
            Self::UnsupportedAlgorithm(_) => "UNSUPPORTED_ALGORITHM",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::Expired => "EXPIRED",
            Self::NotYetValid => "NOT_YET_VALID",
            Self::CredentialsInvalid => "CREDENTIALS_INVALID",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Returns `true` for failures of token verification.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::Malformed
                | Self::UnsupportedAlgorithm(_)
                | Self::SignatureInvalid
                | Self::Expired
                | Self::NotYetValid
        )
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            e if e.is_verification_failure() => {
                AppError::with_source(ErrorKind::Authentication, UNAUTHORIZED_MESSAGE, e)
            }
            AuthError::CredentialsInvalid => {
                AppError::authentication(CREDENTIALS_INVALID_MESSAGE)
            }
            AuthError::Conflict(message) => AppError::conflict(message),
            e @ AuthError::StoreUnavailable(_) => AppError::with_source(
                ErrorKind::ServiceUnavailable,
                "Service temporarily unavailable",
                e,
            ),
            e @ AuthError::NotInitialized(_) => {
                AppError::with_source(ErrorKind::Configuration, e.to_string(), e)
            }
            e => AppError::with_source(ErrorKind::Internal, "Internal server error", e),
        }
    }
}

/// Errors reported by a [`CredentialStore`](crate::store::CredentialStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Timed out or lost the connection.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A unique email or phone constraint was violated.
    #[error("{0}")]
    Conflict(String),

    /// Any other backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<AppError> for StoreError {
    fn from(err: AppError) -> Self {
        match err.kind {
            ErrorKind::Conflict => Self::Conflict(err.message),
            ErrorKind::ServiceUnavailable => Self::Unavailable(err.message),
            _ => Self::Backend(err.message),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => Self::Internal(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AuthError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_failures_share_one_message() {
        for err in [
            AuthError::Malformed,
            AuthError::UnsupportedAlgorithm("none".into()),
            AuthError::SignatureInvalid,
            AuthError::Expired,
            AuthError::NotYetValid,
        ] {
            let code = err.code();
            let app: AppError = err.into();
            assert!(app.is(ErrorKind::Authentication), "{code}");
            assert_eq!(app.message, UNAUTHORIZED_MESSAGE);
            assert!(app.source.is_some());
        }
    }

    #[test]
    fn test_credentials_invalid_message() {
        let app: AppError = AuthError::CredentialsInvalid.into();
        assert!(app.is(ErrorKind::Authentication));
        assert_eq!(app.message, CREDENTIALS_INVALID_MESSAGE);
    }

    #[test]
    fn test_store_error_mapping() {
        let err: AuthError = StoreError::Unavailable("timeout".into()).into();
        assert_eq!(err.code(), "STORE_UNAVAILABLE");

        let app: AppError = StoreError::Conflict("Email already exists".into()).into();
        assert!(app.is(ErrorKind::Conflict));
        assert_eq!(app.message, "Email already exists");

        let store: StoreError = AppError::service_unavailable("pool timed out").into();
        assert!(matches!(store, StoreError::Unavailable(_)));
    }
}
