//! Credential store contract and its implementations.
//!
//! The store durably records the latest issued token pair per subject and
//! holds the identity records themselves. It is never consulted during
//! token verification.

pub mod memory;
pub mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tokengate_core::types::pagination::{PageRequest, PageResponse};
use tokengate_entity::user::{UpdateUser, User};

use crate::error::StoreError;

/// Persistence collaborator for identities and their issued tokens.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Upsert the latest issued pair for a subject.
    async fn record_issued_pair(
        &self,
        subject_id: &str,
        access_token: &str,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Look up an identity record by subject id.
    async fn find_by_subject_id(&self, subject_id: &str) -> Result<Option<User>, StoreError>;

    /// Look up an identity record by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new identity with its token fields already set, atomically.
    ///
    /// Fails with [`StoreError::Conflict`] if the email or phone is taken.
    async fn insert_user(&self, user: &User) -> Result<User, StoreError>;

    /// List identities, newest first.
    async fn list_users(&self, page: &PageRequest) -> Result<PageResponse<User>, StoreError>;

    /// Apply a partial update. Returns `None` if the subject does not exist.
    async fn update_user(
        &self,
        subject_id: &str,
        changes: &UpdateUser,
    ) -> Result<Option<User>, StoreError>;

    /// Delete an identity and its token record. Returns `false` if absent.
    async fn delete_user(&self, subject_id: &str) -> Result<bool, StoreError>;
}

/// Runs a store call under a deadline, reporting a timeout as unavailability.
pub async fn bounded<T, F>(timeout: Duration, operation: &'static str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!(
                operation,
                timeout_ms = timeout.as_millis() as u64,
                "Credential store call timed out"
            );
            Err(StoreError::Unavailable(format!(
                "{operation} timed out after {}s",
                timeout.as_secs()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, StoreError>(())
        };
        let result = bounded(Duration::from_secs(10), "find_by_email", slow).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_bounded_passes_through() {
        let fast = async { Ok::<_, StoreError>(7) };
        assert_eq!(bounded(Duration::from_secs(1), "op", fast).await.unwrap(), 7);

        let failing = async { Err::<(), _>(StoreError::Conflict("Email already exists".into())) };
        assert!(matches!(
            bounded(Duration::from_secs(1), "op", failing).await,
            Err(StoreError::Conflict(_))
        ));
    }
}
