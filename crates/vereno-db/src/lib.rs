//! Vereno database layer.
//!
//! Postgres access for the membership registry and the role reconciliation
//! engine: connection pool, embedded migrations, and row models with their
//! query functions.
//!
//! # Modules
//!
//! - [`pool`] - Connection pool wrapper ([`DbPool`])
//! - [`migrations`] - Versioned SQL migrations, embedded at compile time
//! - [`models`] - Row models: members, role assignments, collector links,
//!   audit log
//! - [`error`] - [`DbError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use vereno_db::{DbPool, run_migrations};
//!
//! let pool = DbPool::connect("postgres://localhost/vereno").await?;
//! run_migrations(&pool).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use pool::DbPool;
