//! Role-based access decisions.

pub mod policy;

pub use policy::{AuthorizationDecision, AuthorizationPolicy};
