//! Password storage: Argon2id hashing and the length policy applied on
//! signup and password change.

pub mod hasher;
pub mod validator;

pub use hasher::PasswordHasher;
pub use validator::PasswordValidator;
