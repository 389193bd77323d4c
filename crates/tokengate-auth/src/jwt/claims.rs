//! JWT claims structure shared by access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokengate_entity::user::{Identity, UserRole};

/// JWT claims payload embedded in every issued token.
///
/// `user_type` is kept as the raw string so a signed token with an unknown
/// role still decodes; [`Claims::role`] returns `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Subject id.
    pub uid: String,
    /// Role name (`ADMIN` or `USER`).
    #[serde(default)]
    pub user_type: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Builds claims for `identity` valid over `[issued_at, expires_at)`.
    pub fn for_identity(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email: identity.email.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            uid: identity.subject_id.clone(),
            user_type: identity.role.as_str().to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// The role, if it names a known one.
    pub fn role(&self) -> Option<UserRole> {
        self.user_type.parse().ok()
    }

    /// Returns the issue time as a `DateTime<Utc>`.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
