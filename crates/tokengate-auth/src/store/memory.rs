//! In-memory credential store for tests and local runs.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use tokengate_core::types::pagination::{PageRequest, PageResponse};
use tokengate_entity::user::{UpdateUser, User};

use super::CredentialStore;
use crate::error::StoreError;

/// Latest issued pair for one subject.
#[derive(Debug, Clone)]
struct IssuedPair {
    token: String,
    refresh_token: String,
    issued_at: DateTime<Utc>,
}

/// Email equality as the Postgres `LOWER()` index sees it.
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Credential store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    /// Identity records keyed by subject id, without token fields.
    users: DashMap<String, User>,
    /// Issued pairs keyed by subject id.
    tokens: DashMap<String, IssuedPair>,
    /// Serializes writes that must check email/phone uniqueness.
    write_lock: Mutex<()>,
}

impl MemoryCredentialStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if no identity is stored.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// When the latest pair for `subject_id` was recorded.
    pub fn issued_at(&self, subject_id: &str) -> Option<DateTime<Utc>> {
        self.tokens.get(subject_id).map(|pair| pair.issued_at)
    }

    fn with_tokens(&self, mut user: User) -> User {
        if let Some(pair) = self.tokens.get(&user.subject_id()) {
            user.token = Some(pair.token.clone());
            user.refresh_token = Some(pair.refresh_token.clone());
        }
        user
    }

    /// Checks uniqueness of email and phone against everyone but `except`.
    fn ensure_unique(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        except: Option<&str>,
    ) -> Result<(), StoreError> {
        for entry in self.users.iter() {
            if Some(entry.key().as_str()) == except {
                continue;
            }
            if email.is_some_and(|e| same_email(&entry.email, e)) {
                return Err(StoreError::Conflict("Email already exists".into()));
            }
            if phone.is_some_and(|p| entry.phone == p) {
                return Err(StoreError::Conflict("Phone number already exists".into()));
            }
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn record_issued_pair(
        &self,
        subject_id: &str,
        access_token: &str,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.tokens.insert(
            subject_id.to_string(),
            IssuedPair {
                token: access_token.to_string(),
                refresh_token: refresh_token.to_string(),
                issued_at,
            },
        );
        Ok(())
    }

    async fn find_by_subject_id(&self, subject_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .get(subject_id)
            .map(|u| u.clone())
            .map(|u| self.with_tokens(u)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let found = self
            .users
            .iter()
            .find(|entry| same_email(&entry.email, email))
            .map(|entry| entry.value().clone());
        Ok(found.map(|u| self.with_tokens(u)))
    }

    async fn insert_user(&self, user: &User) -> Result<User, StoreError> {
        let _guard = self.lock()?;
        let subject_id = user.subject_id();
        if self.users.contains_key(&subject_id) {
            return Err(StoreError::Conflict("User already exists".into()));
        }
        self.ensure_unique(Some(&user.email), Some(&user.phone), None)?;

        if let (Some(token), Some(refresh_token)) = (&user.token, &user.refresh_token) {
            self.tokens.insert(
                subject_id.clone(),
                IssuedPair {
                    token: token.clone(),
                    refresh_token: refresh_token.clone(),
                    issued_at: user.created_at,
                },
            );
        }
        let mut stored = user.clone();
        stored.token = None;
        stored.refresh_token = None;
        self.users.insert(subject_id, stored);
        Ok(user.clone())
    }

    async fn list_users(&self, page: &PageRequest) -> Result<PageResponse<User>, StoreError> {
        let mut all: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        let total = all.len() as u64;

        let items = all
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .map(|u| self.with_tokens(u))
            .collect();
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn update_user(
        &self,
        subject_id: &str,
        changes: &UpdateUser,
    ) -> Result<Option<User>, StoreError> {
        let _guard = self.lock()?;
        if !self.users.contains_key(subject_id) {
            return Ok(None);
        }
        self.ensure_unique(
            changes.email.as_deref(),
            changes.phone.as_deref(),
            Some(subject_id),
        )?;

        let updated = self.users.get_mut(subject_id).map(|mut user| {
            if let Some(first_name) = &changes.first_name {
                user.first_name = first_name.clone();
            }
            if let Some(last_name) = &changes.last_name {
                user.last_name = last_name.clone();
            }
            if let Some(email) = &changes.email {
                user.email = email.clone();
            }
            if let Some(phone) = &changes.phone {
                user.phone = phone.clone();
            }
            if let Some(password_hash) = &changes.password_hash {
                user.password_hash = password_hash.clone();
            }
            user.updated_at = Utc::now();
            user.clone()
        });
        Ok(updated.map(|u| self.with_tokens(u)))
    }

    async fn delete_user(&self, subject_id: &str) -> Result<bool, StoreError> {
        let _guard = self.lock()?;
        self.tokens.remove(subject_id);
        Ok(self.users.remove(subject_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tokengate_entity::user::UserRole;
    use uuid::Uuid;

    fn user(email: &str, phone: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: email.into(),
            first_name: "Test".into(),
            last_name: "User".into(),
            phone: phone.into(),
            password_hash: "hash".into(),
            user_type: UserRole::User,
            token: Some("access".into()),
            refresh_token: Some("refresh".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryCredentialStore::new();
        let u = user("a@example.com", "1");
        store.insert_user(&u).await.unwrap();

        let by_id = store.find_by_subject_id(&u.subject_id()).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@example.com");
        assert_eq!(by_id.token.as_deref(), Some("access"));

        let by_email = store.find_by_email("A@EXAMPLE.COM").await.unwrap().unwrap();
        assert_eq!(by_email.id, u.id);
        assert!(store.find_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_or_phone_conflicts() {
        let store = MemoryCredentialStore::new();
        store.insert_user(&user("a@example.com", "1")).await.unwrap();

        let err = store.insert_user(&user("a@example.com", "2")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m == "Email already exists"));

        let err = store.insert_user(&user("b@example.com", "1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m == "Phone number already exists"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_non_ascii_email_matches_case_insensitively() {
        let store = MemoryCredentialStore::new();
        store.insert_user(&user("ÉLODIE@example.com", "1")).await.unwrap();

        let found = store.find_by_email("élodie@example.com").await.unwrap();
        assert!(found.is_some());

        let err = store
            .insert_user(&user("élodie@EXAMPLE.com", "2"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref m) if m == "Email already exists"));
    }

    #[tokio::test]
    async fn test_record_issued_pair_upserts() {
        let store = MemoryCredentialStore::new();
        let u = user("a@example.com", "1");
        store.insert_user(&u).await.unwrap();

        let issued_at = Utc::now() + Duration::minutes(5);
        store
            .record_issued_pair(&u.subject_id(), "access-2", "refresh-2", issued_at)
            .await
            .unwrap();
        assert_eq!(store.issued_at(&u.subject_id()), Some(issued_at));
        let found = store.find_by_subject_id(&u.subject_id()).await.unwrap().unwrap();
        assert_eq!(found.token.as_deref(), Some("access-2"));
        assert_eq!(found.refresh_token.as_deref(), Some("refresh-2"));

        // Unknown subjects get a token row without an identity.
        store
            .record_issued_pair("ghost", "a", "r", Utc::now())
            .await
            .unwrap();
        assert!(store.find_by_subject_id("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_checks_other_records() {
        let store = MemoryCredentialStore::new();
        let a = user("a@example.com", "1");
        let b = user("b@example.com", "2");
        store.insert_user(&a).await.unwrap();
        store.insert_user(&b).await.unwrap();

        let taken = UpdateUser {
            email: Some("b@example.com".into()),
            ..Default::default()
        };
        assert!(matches!(
            store.update_user(&a.subject_id(), &taken).await,
            Err(StoreError::Conflict(_))
        ));

        // Re-submitting one's own email is not a conflict.
        let same = UpdateUser {
            email: Some("a@example.com".into()),
            first_name: Some("Ann".into()),
            ..Default::default()
        };
        let updated = store.update_user(&a.subject_id(), &same).await.unwrap().unwrap();
        assert_eq!(updated.first_name, "Ann");

        assert!(store.update_user("missing", &same).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_and_delete() {
        let store = MemoryCredentialStore::new();
        let mut older = user("old@example.com", "1");
        older.created_at = Utc::now() - Duration::hours(1);
        let newer = user("new@example.com", "2");
        store.insert_user(&older).await.unwrap();
        store.insert_user(&newer).await.unwrap();

        let page = store.list_users(&PageRequest::new(1, 1)).await.unwrap();
        assert_eq!(page.total_items, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].email, "new@example.com");

        assert!(store.delete_user(&older.subject_id()).await.unwrap());
        assert!(!store.delete_user(&older.subject_id()).await.unwrap());
        assert_eq!(store.len(), 1);
    }
}
