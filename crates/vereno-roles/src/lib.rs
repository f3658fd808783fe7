//! Role & membership consistency reconciliation engine.
//!
//! Detects and repairs divergence between three data surfaces of the
//! Vereno membership platform: the member registry, the role-assignment
//! table and the collector-role linkage table. Every corrective mutation
//! is recorded in an append-only audit trail, inside the same transaction
//! as the mutation itself.
//!
//! # Services
//!
//! - [`RoleScanService`] - read-only validation pass classifying every
//!   linked member against a fixed set of consistency checks
//! - [`RoleRepairService`] - single-identity corrective mutation
//!   (delete-all roles, insert the requested one, append audit), atomic
//!   per identity
//! - [`BulkReconcileService`] - best-effort batch repair over all detected
//!   issues plus the collector-role sync pass
//!
//! # Stores
//!
//! Services run against the [`store::ReconcileStore`] trait:
//!
//! - [`store::PgReconcileStore`] - production Postgres implementation;
//!   per-identity serialization comes from a `FOR UPDATE` row lock
//! - [`store::InMemoryReconcileStore`] - in-memory implementation for
//!   tests, with failure injection
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vereno_roles::{BulkReconcileService, RoleScanService};
//! use vereno_roles::store::PgReconcileStore;
//!
//! let store = Arc::new(PgReconcileStore::new(pool));
//! let scanner = RoleScanService::new(store.clone());
//! let issues = scanner.scan().await?;
//!
//! let bulk = BulkReconcileService::new(store);
//! let report = bulk.fix_all(None).await?;
//! println!("fixed {}, failed {}", report.success_count, report.failed_count);
//! ```

pub mod bulk;
pub mod error;
pub mod repair;
pub mod scanner;
pub mod store;
pub mod types;

pub use bulk::BulkReconcileService;
pub use error::{Result, RolesError};
pub use repair::RoleRepairService;
pub use scanner::{effective_role, IdentityReport, RoleScanService};
pub use types::{
    BulkFailure, BulkFixReport, CheckType, IssueDetails, IssueSeverity, RepairAction,
    RepairOutcome, RequestedFix, Role, ValidationIssue,
};
