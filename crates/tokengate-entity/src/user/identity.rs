//! Authenticated identity value object.

use serde::{Deserialize, Serialize};

use super::role::UserRole;

/// The identity fields carried inside issued credentials.
///
/// Built from a stored [`User`](super::User) at login or signup and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque subject identifier (the user id rendered as a string).
    pub subject_id: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Assigned role.
    pub role: UserRole,
}
