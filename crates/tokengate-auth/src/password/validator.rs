//! Password policy enforcement for new passwords.

use tokengate_core::config::auth::AuthConfig;
use tokengate_core::error::AppError;

/// Validates new passwords against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length, in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Returns `Ok(())` if the password satisfies the policy.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length() {
        let validator = PasswordValidator::new(&AuthConfig::default());
        assert!(validator.validate("12345").is_err());
        assert!(validator.validate("123456").is_ok());
        assert!(validator.validate("ééééé").is_err());
    }
}
