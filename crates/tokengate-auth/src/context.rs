//! Typed request context derived from verified claims.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tokengate_entity::user::UserRole;

use crate::jwt::Claims;

/// The authenticated caller of a request.
///
/// Built once from verified [`Claims`] and passed explicitly to the policy
/// and the account service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    /// Authenticated subject id.
    pub subject_id: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role, `None` when the token names an unknown one.
    pub role: Option<UserRole>,
    /// Issue time of the presented token.
    pub issued_at: Option<DateTime<Utc>>,
    /// Expiry of the presented token.
    pub expires_at: Option<DateTime<Utc>>,
}

impl RequestContext {
    /// Returns `true` if the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }
}

impl From<Claims> for RequestContext {
    fn from(claims: Claims) -> Self {
        let role = claims.role();
        let issued_at = claims.issued_at();
        let expires_at = claims.expires_at();
        Self {
            subject_id: claims.uid,
            email: claims.email,
            first_name: claims.first_name,
            last_name: claims.last_name,
            role,
            issued_at,
            expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Timelike};
    use tokengate_core::config::auth::AuthConfig;
    use tokengate_entity::user::Identity;

    use crate::jwt::{JwtDecoder, JwtEncoder};
    use crate::rbac::AuthorizationPolicy;

    #[test]
    fn test_issue_verify_authorize() {
        let config = AuthConfig {
            jwt_secret: "context-secret".into(),
            ..AuthConfig::default()
        };
        let u1 = Identity {
            subject_id: "u1".into(),
            email: "u1@example.com".into(),
            first_name: "U".into(),
            last_name: "One".into(),
            role: UserRole::User,
        };
        let now = Utc::now();
        let pair = JwtEncoder::new(&config).unwrap().issue_at(&u1, now).unwrap();
        let claims = JwtDecoder::new(&config)
            .unwrap()
            .verify_at(&pair.access_token, now + Duration::minutes(1))
            .unwrap();

        let ctx = RequestContext::from(claims);
        assert_eq!(ctx.subject_id, "u1");
        assert_eq!(ctx.role, Some(UserRole::User));
        assert!(!ctx.is_admin());
        assert_eq!(ctx.expires_at, Some(pair.access_expires_at.with_nanosecond(0).unwrap()));

        let policy = AuthorizationPolicy::new();
        assert!(policy.evaluate(ctx.role, &ctx.subject_id, "u1").allow);
        assert!(!policy.evaluate(ctx.role, &ctx.subject_id, "u2").allow);
    }
}
