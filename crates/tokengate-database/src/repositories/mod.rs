//! Repository implementations for TokenGate entities.

pub mod user;

pub use user::UserRepository;

use tokengate_core::error::{AppError, ErrorKind};

/// SQLSTATE for a statement cancelled by `statement_timeout`.
const QUERY_CANCELED: &str = "57014";

/// Map a sqlx error into an [`AppError`], treating pool exhaustion,
/// connection loss and server-side statement timeouts as a transient outage.
pub(crate) fn map_sqlx_error(context: &'static str, err: sqlx::Error) -> AppError {
    let kind = match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            ErrorKind::ServiceUnavailable
        }
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(QUERY_CANCELED) => {
            ErrorKind::ServiceUnavailable
        }
        _ => ErrorKind::Database,
    };
    AppError::with_source(kind, context, err)
}
