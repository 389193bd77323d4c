//! Convenience result type alias for TokenGate.

use crate::error::AppError;

/// A specialized `Result` type for TokenGate operations.
pub type AppResult<T> = Result<T, AppError>;
