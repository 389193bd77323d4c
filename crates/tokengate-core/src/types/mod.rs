//! Core type definitions used across the TokenGate workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
