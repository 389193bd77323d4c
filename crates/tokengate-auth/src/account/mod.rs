//! Account management for authenticated callers.

pub mod service;

pub use service::{AccountService, ProfileChanges};
