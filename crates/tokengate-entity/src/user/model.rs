//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::identity::Identity;
use super::role::UserRole;

/// A registered user together with the latest issued token pair.
///
/// The token columns come from the `issued_tokens` table and are `None`
/// until a pair has been recorded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Email address, unique across users.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number, unique across users.
    pub phone: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User role (RBAC).
    #[sqlx(try_from = "String")]
    pub user_type: UserRole,
    /// Latest issued access token.
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Latest issued refresh token.
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The subject id used in issued claims.
    pub fn subject_id(&self) -> String {
        self.id.to_string()
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.user_type.is_admin()
    }

    /// Project the identity fields carried in credentials.
    pub fn identity(&self) -> Identity {
        Identity {
            subject_id: self.subject_id(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.user_type,
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Pre-assigned user id.
    pub id: Uuid,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number.
    pub phone: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub user_type: UserRole,
}

/// Partial update of a user's profile. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// Replacement password hash.
    pub password_hash: Option<String>,
}

impl UpdateUser {
    /// Returns `true` if no field would change.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.password_hash.is_none()
    }
}
