//! PostgreSQL-backed credential store wrapping the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use tokengate_core::types::pagination::{PageRequest, PageResponse};
use tokengate_database::repositories::UserRepository;
use tokengate_entity::user::{CreateUser, UpdateUser, User};

use super::CredentialStore;
use crate::error::StoreError;

/// Credential store over the `users` and `issued_tokens` tables.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    /// User database repository.
    repo: Arc<UserRepository>,
}

impl PgCredentialStore {
    /// Creates a new store.
    pub fn new(repo: Arc<UserRepository>) -> Self {
        Self { repo }
    }
}

/// Subject ids are UUIDs in this store; anything else cannot exist.
fn parse_subject(subject_id: &str) -> Option<Uuid> {
    Uuid::parse_str(subject_id).ok()
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn record_issued_pair(
        &self,
        subject_id: &str,
        access_token: &str,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let id = parse_subject(subject_id)
            .ok_or_else(|| StoreError::Backend(format!("invalid subject id '{subject_id}'")))?;
        self.repo
            .upsert_tokens(id, access_token, refresh_token, issued_at)
            .await
            .map_err(StoreError::from)
    }

    async fn find_by_subject_id(&self, subject_id: &str) -> Result<Option<User>, StoreError> {
        let Some(id) = parse_subject(subject_id) else {
            return Ok(None);
        };
        self.repo.find_by_id(id).await.map_err(StoreError::from)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.repo.find_by_email(email).await.map_err(StoreError::from)
    }

    async fn insert_user(&self, user: &User) -> Result<User, StoreError> {
        let (Some(token), Some(refresh_token)) = (&user.token, &user.refresh_token) else {
            return Err(StoreError::Backend(
                "new users must carry an issued token pair".into(),
            ));
        };
        let data = CreateUser {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            password_hash: user.password_hash.clone(),
            user_type: user.user_type,
        };
        self.repo
            .create(&data, token, refresh_token, user.created_at)
            .await
            .map_err(StoreError::from)
    }

    async fn list_users(&self, page: &PageRequest) -> Result<PageResponse<User>, StoreError> {
        self.repo.find_all(page).await.map_err(StoreError::from)
    }

    async fn update_user(
        &self,
        subject_id: &str,
        changes: &UpdateUser,
    ) -> Result<Option<User>, StoreError> {
        let Some(id) = parse_subject(subject_id) else {
            return Ok(None);
        };
        self.repo.update(id, changes).await.map_err(StoreError::from)
    }

    async fn delete_user(&self, subject_id: &str) -> Result<bool, StoreError> {
        let Some(id) = parse_subject(subject_id) else {
            return Ok(false);
        };
        self.repo.delete(id).await.map_err(StoreError::from)
    }
}
