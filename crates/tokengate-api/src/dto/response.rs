//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tokengate_auth::IssuedCredentials;
use tokengate_core::types::pagination::PageResponse;
use tokengate_entity::user::User;

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Signup response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    /// Confirmation message.
    pub message: String,
    /// New user id.
    pub user_id: Uuid,
    /// Access token.
    pub token: String,
    /// Refresh token.
    pub refresh_token: String,
}

impl From<IssuedCredentials> for SignupResponse {
    fn from(issued: IssuedCredentials) -> Self {
        Self {
            message: "User created successfully".to_string(),
            user_id: issued.user.id,
            token: issued.tokens.access_token,
            refresh_token: issued.tokens.refresh_token,
        }
    }
}

/// Login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Confirmation message.
    pub message: String,
    /// User id.
    pub user_id: Uuid,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role.
    pub user_type: String,
    /// Access token.
    pub token: String,
    /// Refresh token.
    pub refresh_token: String,
}

impl From<IssuedCredentials> for LoginResponse {
    fn from(issued: IssuedCredentials) -> Self {
        let user = issued.user;
        Self {
            message: "Login successful".to_string(),
            user_id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            user_type: user.user_type.to_string(),
            token: issued.tokens.access_token,
            refresh_token: issued.tokens.refresh_token,
        }
    }
}

/// Public view of a user; never carries the password hash or tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User id.
    pub user_id: Uuid,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone number.
    pub phone: String,
    /// Role.
    pub user_type: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            user_type: user.user_type.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Single-user envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    /// The user.
    pub user: UserResponse,
}

/// Paginated user list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    /// Total number of users.
    pub total_count: u64,
    /// Users on this page.
    pub users: Vec<UserResponse>,
    /// Current page (1-based).
    pub page: u64,
    /// Page size.
    pub per_page: u64,
}

impl From<PageResponse<User>> for UserListResponse {
    fn from(page: PageResponse<User>) -> Self {
        Self {
            total_count: page.total_items,
            page: page.page,
            per_page: page.page_size,
            users: page.items.into_iter().map(UserResponse::from).collect(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Human-readable status message.
    pub message: String,
    /// Server version.
    pub version: String,
}
