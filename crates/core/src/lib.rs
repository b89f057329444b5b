//! Shared domain types for the toolhub platform.
//!
//! Contains the common ID/timestamp aliases, the domain error enum, the
//! static category catalog, and the in-memory verification-code store used
//! to gate registration and password reset.

pub mod categories;
pub mod error;
pub mod types;
pub mod verification;
