//! Account service: list, read, update and delete users on behalf of a
//! verified caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tokengate_core::error::AppError;
use tokengate_core::types::pagination::{PageRequest, PageResponse};
use tokengate_entity::user::{UpdateUser, User, UserRole};

use crate::context::RequestContext;
use crate::error::AuthError;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::rbac::AuthorizationPolicy;
use crate::store::{CredentialStore, bounded};

/// Profile fields a caller may change. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New plaintext password.
    pub password: Option<String>,
}

/// User management gated by the authorization policy.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<PasswordHasher>,
    validator: PasswordValidator,
    policy: AuthorizationPolicy,
    store_timeout: Duration,
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

impl AccountService {
    /// Creates a new account service.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        validator: PasswordValidator,
        policy: AuthorizationPolicy,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            validator,
            policy,
            store_timeout,
        }
    }

    /// Lists users. Admin only.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> Result<PageResponse<User>, AppError> {
        self.policy.authorize_role(ctx.role, UserRole::Admin)?;
        Ok(bounded(self.store_timeout, "list_users", self.store.list_users(page)).await?)
    }

    /// Fetches one user. Owner or admin.
    pub async fn get_user(&self, ctx: &RequestContext, user_id: &str) -> Result<User, AppError> {
        self.policy
            .authorize_owner(ctx.role, &ctx.subject_id, user_id)?;
        bounded(
            self.store_timeout,
            "find_by_subject_id",
            self.store.find_by_subject_id(user_id),
        )
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Updates a user's profile. Owner or admin; the role cannot change here.
    ///
    /// A new password is validated and hashed, then written together with
    /// the other fields.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        changes: ProfileChanges,
    ) -> Result<User, AppError> {
        self.policy
            .authorize_owner(ctx.role, &ctx.subject_id, user_id)?;

        let password_hash = match changes.password {
            Some(password) => {
                self.validator.validate(&password)?;
                let hasher = Arc::clone(&self.hasher);
                let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
                    .await
                    .map_err(|e| {
                        AuthError::Internal(format!("password hashing task failed: {e}"))
                    })??;
                Some(hash)
            }
            None => None,
        };

        let update = UpdateUser {
            first_name: changes.first_name,
            last_name: changes.last_name,
            email: changes.email,
            phone: changes.phone,
            password_hash,
        };
        let password_changed = update.password_hash.is_some();

        let user = bounded(
            self.store_timeout,
            "update_user",
            self.store.update_user(user_id, &update),
        )
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(
            user_id = %user_id,
            actor = %ctx.subject_id,
            password_changed,
            "User updated"
        );
        Ok(user)
    }

    /// Deletes a user. Admin only.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: &str) -> Result<(), AppError> {
        self.policy.authorize_role(ctx.role, UserRole::Admin)?;
        let deleted = bounded(
            self.store_timeout,
            "delete_user",
            self.store.delete_user(user_id),
        )
        .await?;
        if !deleted {
            return Err(AppError::not_found("User not found"));
        }
        info!(user_id = %user_id, actor = %ctx.subject_id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokengate_core::config::auth::AuthConfig;
    use tokengate_core::error::ErrorKind;
    use uuid::Uuid;

    use crate::store::MemoryCredentialStore;

    struct Fixture {
        service: AccountService,
        hasher: Arc<PasswordHasher>,
        admin: RequestContext,
        alice: User,
        bob: User,
    }

    fn context(user: &User) -> RequestContext {
        RequestContext {
            subject_id: user.subject_id(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: Some(user.user_type),
            issued_at: None,
            expires_at: None,
        }
    }

    fn user(email: &str, phone: &str, role: UserRole, hasher: &PasswordHasher) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: email.into(),
            first_name: "First".into(),
            last_name: "Last".into(),
            phone: phone.into(),
            password_hash: hasher.hash("original-pass").unwrap(),
            user_type: role,
            token: Some("t".into()),
            refresh_token: Some("r".into()),
            created_at: now,
            updated_at: now,
        }
    }

    async fn fixture() -> Fixture {
        let config = AuthConfig {
            password_hash_cost: 1,
            ..AuthConfig::default()
        };
        let hasher = Arc::new(PasswordHasher::new(&config).unwrap());
        let store = Arc::new(MemoryCredentialStore::new());

        let admin = user("admin@example.com", "100", UserRole::Admin, &hasher);
        let alice = user("alice@example.com", "101", UserRole::User, &hasher);
        let bob = user("bob@example.com", "102", UserRole::User, &hasher);
        for u in [&admin, &alice, &bob] {
            store.insert_user(u).await.unwrap();
        }

        let service = AccountService::new(
            store,
            Arc::clone(&hasher),
            PasswordValidator::new(&config),
            AuthorizationPolicy::new(),
            Duration::from_secs(5),
        );
        Fixture {
            service,
            hasher,
            admin: context(&admin),
            alice,
            bob,
        }
    }

    #[tokio::test]
    async fn test_list_is_admin_only() {
        let f = fixture().await;
        let page = f.service.list_users(&f.admin, &PageRequest::default()).await.unwrap();
        assert_eq!(page.total_items, 3);

        let err = f
            .service
            .list_users(&context(&f.alice), &PageRequest::default())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
    }

    #[tokio::test]
    async fn test_get_owner_or_admin() {
        let f = fixture().await;
        let alice = context(&f.alice);

        assert!(f.service.get_user(&alice, &f.alice.subject_id()).await.is_ok());
        assert!(f.service.get_user(&f.admin, &f.bob.subject_id()).await.is_ok());
        assert!(
            f.service
                .get_user(&alice, &f.bob.subject_id())
                .await
                .unwrap_err()
                .is(ErrorKind::Authorization)
        );
    }

    #[tokio::test]
    async fn test_get_missing_after_authorization() {
        let f = fixture().await;
        let missing = Uuid::new_v4().to_string();

        assert!(
            f.service
                .get_user(&f.admin, &missing)
                .await
                .unwrap_err()
                .is(ErrorKind::NotFound)
        );
        // A non-admin probing someone else's id learns nothing.
        assert!(
            f.service
                .get_user(&context(&f.alice), &missing)
                .await
                .unwrap_err()
                .is(ErrorKind::Authorization)
        );
    }

    #[tokio::test]
    async fn test_update_replaces_password_hash() {
        let f = fixture().await;
        let alice = context(&f.alice);
        let changes = ProfileChanges {
            first_name: Some("Alicia".into()),
            password: Some("brand-new-pass".into()),
            ..Default::default()
        };

        let updated = f
            .service
            .update_user(&alice, &f.alice.subject_id(), changes)
            .await
            .unwrap();
        assert_eq!(updated.first_name, "Alicia");
        assert_eq!(updated.user_type, UserRole::User);
        assert!(f.hasher.verify(&updated.password_hash, "brand-new-pass"));
        assert!(!f.hasher.verify(&updated.password_hash, "original-pass"));
    }

    #[tokio::test]
    async fn test_update_rejects_short_password_and_taken_email() {
        let f = fixture().await;
        let alice = context(&f.alice);

        let short = ProfileChanges {
            password: Some("123".into()),
            ..Default::default()
        };
        assert!(
            f.service
                .update_user(&alice, &f.alice.subject_id(), short)
                .await
                .unwrap_err()
                .is(ErrorKind::Validation)
        );

        let taken = ProfileChanges {
            email: Some("bob@example.com".into()),
            ..Default::default()
        };
        let err = f
            .service
            .update_user(&alice, &f.alice.subject_id(), taken)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
        assert_eq!(err.message, "Email already exists");
    }

    #[tokio::test]
    async fn test_delete_admin_only() {
        let f = fixture().await;
        let bob_id = f.bob.subject_id();

        assert!(
            f.service
                .delete_user(&context(&f.alice), &bob_id)
                .await
                .unwrap_err()
                .is(ErrorKind::Authorization)
        );
        // Users cannot delete themselves either.
        assert!(f.service.delete_user(&context(&f.bob), &bob_id).await.is_err());

        f.service.delete_user(&f.admin, &bob_id).await.unwrap();
        assert!(
            f.service
                .delete_user(&f.admin, &bob_id)
                .await
                .unwrap_err()
                .is(ErrorKind::NotFound)
        );
    }
}
