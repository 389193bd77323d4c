//! Authorization policy mapping a verified identity to access rights.
//!
//! | role    | condition                     | decision |
//! |---------|-------------------------------|----------|
//! | ADMIN   | any                           | allow    |
//! | USER    | subject owns the resource     | allow    |
//! | USER    | otherwise                     | deny     |
//! | missing | any                           | deny     |

use tokengate_core::error::AppError;
use tokengate_entity::user::UserRole;

/// Reason attached to every denial surfaced to callers.
pub const DENIED_MESSAGE: &str = "unauthorized to access this resource";

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    /// Whether access is granted.
    pub allow: bool,
    /// Short human-readable explanation, for logs.
    pub reason: String,
}

impl AuthorizationDecision {
    fn allow(reason: impl Into<String>) -> Self {
        Self {
            allow: true,
            reason: reason.into(),
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allow: false,
            reason: reason.into(),
        }
    }
}

/// Stateless authorization policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationPolicy;

impl AuthorizationPolicy {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }

    /// Decides whether `subject_id` acting with `role` may act on the
    /// resource owned by `owner_id`.
    pub fn evaluate(
        &self,
        role: Option<UserRole>,
        subject_id: &str,
        owner_id: &str,
    ) -> AuthorizationDecision {
        match role {
            Some(UserRole::Admin) => AuthorizationDecision::allow("admin"),
            Some(UserRole::User) if !subject_id.is_empty() && subject_id == owner_id => {
                AuthorizationDecision::allow("owner")
            }
            Some(UserRole::User) => AuthorizationDecision::deny("not the resource owner"),
            None => AuthorizationDecision::deny("unknown role"),
        }
    }

    /// Returns `true` if `role` is exactly `required`.
    pub fn has_role(&self, role: Option<UserRole>, required: UserRole) -> bool {
        role == Some(required)
    }

    /// Owner-or-admin check, surfaced as an `Authorization` error on deny.
    pub fn authorize_owner(
        &self,
        role: Option<UserRole>,
        subject_id: &str,
        owner_id: &str,
    ) -> Result<(), AppError> {
        let decision = self.evaluate(role, subject_id, owner_id);
        if decision.allow {
            Ok(())
        } else {
            tracing::warn!(
                subject_id = %subject_id,
                owner_id = %owner_id,
                reason = %decision.reason,
                "Access denied"
            );
            Err(AppError::authorization(DENIED_MESSAGE))
        }
    }

    /// Exact-role check, surfaced as an `Authorization` error on deny.
    pub fn authorize_role(
        &self,
        role: Option<UserRole>,
        required: UserRole,
    ) -> Result<(), AppError> {
        if self.has_role(role, required) {
            Ok(())
        } else {
            tracing::warn!(
                role = ?role,
                required = %required,
                "Access denied: role mismatch"
            );
            Err(AppError::authorization(DENIED_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokengate_core::error::ErrorKind;

    #[test]
    fn test_admin_always_allowed() {
        let policy = AuthorizationPolicy::new();
        assert!(policy.evaluate(Some(UserRole::Admin), "a", "b").allow);
        assert!(policy.evaluate(Some(UserRole::Admin), "a", "a").allow);
        assert!(policy.evaluate(Some(UserRole::Admin), "", "b").allow);
    }

    #[test]
    fn test_user_only_self() {
        let policy = AuthorizationPolicy::new();
        assert!(policy.evaluate(Some(UserRole::User), "u1", "u1").allow);
        let denied = policy.evaluate(Some(UserRole::User), "u1", "u2");
        assert!(!denied.allow);
        assert_eq!(denied.reason, "not the resource owner");
    }

    #[test]
    fn test_empty_subject_never_matches() {
        let policy = AuthorizationPolicy::new();
        assert!(!policy.evaluate(Some(UserRole::User), "", "").allow);
    }

    #[test]
    fn test_unknown_role_denied() {
        let policy = AuthorizationPolicy::new();
        assert!(!policy.evaluate(None, "u1", "u1").allow);
        assert!(!policy.has_role(None, UserRole::User));
    }

    #[test]
    fn test_authorize_role_is_exact() {
        let policy = AuthorizationPolicy::new();
        assert!(policy.authorize_role(Some(UserRole::Admin), UserRole::Admin).is_ok());
        let err = policy
            .authorize_role(Some(UserRole::User), UserRole::Admin)
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));
        assert_eq!(err.message, DENIED_MESSAGE);
        // USER-only endpoints do not admit admins.
        assert!(policy.authorize_role(Some(UserRole::Admin), UserRole::User).is_err());
    }

    #[test]
    fn test_authorize_owner_errors() {
        let policy = AuthorizationPolicy::new();
        assert!(policy.authorize_owner(Some(UserRole::User), "u1", "u1").is_ok());
        assert!(
            policy
                .authorize_owner(Some(UserRole::User), "u1", "u2")
                .unwrap_err()
                .is(ErrorKind::Authorization)
        );
    }
}
