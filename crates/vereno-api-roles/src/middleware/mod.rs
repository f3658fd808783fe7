//! Middleware for the role reconciliation API.

pub mod admin_guard;

pub use admin_guard::{admin_guard, ADMIN_ROLE};
