//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the RBAC system.
///
/// Stored and transmitted as the upper-case strings `ADMIN` and `USER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Full administrator; may act on any account.
    Admin,
    /// Regular account; may only act on itself.
    User,
}

impl UserRole {
    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role names are matched exactly: `"admin"` is not a role.
impl FromStr for UserRole {
    type Err = tokengate_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            _ => Err(tokengate_core::AppError::validation(format!(
                "Invalid user type: '{s}'. Expected one of: ADMIN, USER"
            ))),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = tokengate_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_exact() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("USER".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("admin".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
        assert!("SUPERUSER".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_uses_upper_case() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        let role: UserRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, UserRole::User);
    }
}
