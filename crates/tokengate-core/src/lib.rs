//! # tokengate-core
//!
//! Core crate for TokenGate. Contains configuration schemas, the unified
//! error system, and pagination types shared by every other crate.
//!
//! This crate has **no** internal dependencies on other TokenGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
