//! Vereno Core Library
//!
//! Shared types for the Vereno membership administration platform.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (`IdentityId`, `MemberId`)
//!
//! # Example
//!
//! ```
//! use vereno_core::IdentityId;
//!
//! let identity: IdentityId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
//! println!("identity: {identity}");
//! ```

pub mod ids;

pub use ids::{IdentityId, MemberId, ParseIdError};
