//! # tokengate-auth
//!
//! The credential lifecycle: password hashing, token issuance and
//! verification, authorization decisions, and credential persistence.
//!
//! ## Modules
//!
//! - `password` — Argon2id hashing and the password length policy
//! - `jwt` — HS256 token pair issuance and verification
//! - `rbac` — owner-or-admin and exact-role decisions
//! - `store` — the credential store contract, Postgres and in-memory
//! - `credential` — signup and login
//! - `account` — user management for authenticated callers

pub mod account;
pub mod context;
pub mod credential;
pub mod error;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod store;

pub use account::{AccountService, ProfileChanges};
pub use context::RequestContext;
pub use credential::{CredentialManager, IssuedCredentials, SignupRequest};
pub use error::{AuthError, StoreError};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{AuthorizationDecision, AuthorizationPolicy};
pub use store::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
