//! The error type shared by every TokenGate crate.
//!
//! Lower layers keep their own error enums and convert into [`AppError`]
//! at the crate boundary; the API layer turns the [`ErrorKind`] into an
//! HTTP status.

use std::fmt;
use thiserror::Error;

/// Error category. Decides the HTTP status and whether the message may be
/// shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No record with the requested id.
    NotFound,
    /// The caller could not be identified (bad credentials or bearer).
    Authentication,
    /// The caller was identified but the policy denied the action.
    Authorization,
    /// Malformed or out-of-policy input.
    Validation,
    /// Email or phone number already held by another record.
    Conflict,
    /// Unexpected failure inside the process.
    Internal,
    /// The database rejected a query.
    Database,
    /// Missing or invalid configuration.
    Configuration,
    /// A dependency could not be reached in time.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Upper-case name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Configuration => "CONFIGURATION",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Whether the failure is on the server side; such messages are not
    /// returned to callers.
    pub const fn is_server_side(self) -> bool {
        matches!(
            self,
            Self::Internal | Self::Database | Self::Configuration | Self::ServiceUnavailable
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified application error.
///
/// `message` is what a caller may see; `source` keeps the underlying cause
/// for logs.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Category.
    pub kind: ErrorKind,
    /// Caller-safe message.
    pub message: String,
    /// Underlying cause, if any.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Error of `kind` without a cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Error of `kind` wrapping `source`.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

/// Clones kind and message; the boxed cause is not cloneable and is dropped.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        let message = format!("Configuration error: {err}");
        Self::with_source(ErrorKind::Configuration, message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = AppError::conflict("Email already exists");
        assert_eq!(err.to_string(), "CONFLICT: Email already exists");
    }

    #[test]
    fn test_server_side_kinds() {
        assert!(ErrorKind::Database.is_server_side());
        assert!(ErrorKind::ServiceUnavailable.is_server_side());
        assert!(!ErrorKind::Authorization.is_server_side());
        assert!(!ErrorKind::Validation.is_server_side());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("boom");
        let err = AppError::with_source(ErrorKind::Database, "query failed", io);
        assert!(err.source.is_some());

        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert!(cloned.is(ErrorKind::Database));
    }
}
