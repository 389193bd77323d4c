//! Request DTOs with validation.
//!
//! Field names are snake_case; the camelCase spellings are accepted too.

use serde::{Deserialize, Serialize};
use validator::Validate;

use tokengate_auth::{ProfileChanges, SignupRequest as SignupInput};

/// Signup request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address.
    #[serde(default)]
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    /// Password. Length policy is enforced by the credential manager.
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Given name.
    #[serde(default, alias = "firstName")]
    #[validate(length(min = 2, max = 100, message = "First name must be 2-100 characters"))]
    pub first_name: String,
    /// Family name.
    #[serde(default, alias = "lastName")]
    #[validate(length(min = 2, max = 100, message = "Last name must be 2-100 characters"))]
    pub last_name: String,
    /// Phone number.
    #[serde(default)]
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    /// Role: `ADMIN` or `USER`.
    #[serde(default, alias = "userType")]
    #[validate(length(min = 1, message = "User type is required"))]
    pub user_type: String,
}

impl From<SignupRequest> for SignupInput {
    fn from(req: SignupRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            user_type: req.user_type,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Partial user update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New given name.
    #[serde(default, alias = "firstName")]
    #[validate(length(min = 2, max = 100, message = "First name must be 2-100 characters"))]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(default, alias = "lastName")]
    #[validate(length(min = 2, max = 100, message = "Last name must be 2-100 characters"))]
    pub last_name: Option<String>,
    /// New email.
    #[serde(default)]
    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,
    /// New phone number.
    #[serde(default)]
    #[validate(length(min = 1, message = "Phone cannot be empty"))]
    pub phone: Option<String>,
    /// New password.
    #[serde(default)]
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for ProfileChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            password: req.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_aliases() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"a@example.com","password":"secret1","firstName":"Ada",
                "lastName":"Lovelace","phone":"555","userType":"USER"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name, "Ada");
        assert_eq!(req.user_type, "USER");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_signup_rules() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"email":"nope","password":"x"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("phone"));
    }

    #[test]
    fn test_update_fields_optional() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_ok());

        let req: UpdateUserRequest = serde_json::from_str(r#"{"email":"bad"}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
