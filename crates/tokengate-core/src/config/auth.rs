//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
///
/// `jwt_secret` has no usable default: a blank secret is rejected by
/// [`AppConfig::validate`](super::AppConfig::validate) before the server
/// accepts any traffic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token TTL in hours.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_hours: i64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: i64,
    /// Password hashing work factor (Argon2 time cost).
    #[serde(default = "default_hash_cost")]
    pub password_hash_cost: u32,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_ttl_hours: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
            password_hash_cost: default_hash_cost(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_access_ttl() -> i64 {
    24
}

fn default_refresh_ttl() -> i64 {
    168
}

fn default_hash_cost() -> u32 {
    14
}

fn default_password_min() -> usize {
    6
}
