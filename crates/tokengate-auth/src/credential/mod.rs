//! Signup and login orchestration.

pub mod manager;

pub use manager::{CredentialManager, IssuedCredentials, SignupRequest};
