//! Row models and query functions.
//!
//! One module per table. Query functions are generic over
//! [`sqlx::PgExecutor`] so they compose into transactions.

pub mod audit_log;
pub mod collector_link;
pub mod member;
pub mod role_assignment;

pub use audit_log::{AuditLogEntry, AuditLogFilter, AuditOperation, AuditSeverity, NewAuditLogEntry};
pub use collector_link::CollectorLink;
pub use member::{Member, MemberStatus};
pub use role_assignment::RoleAssignment;
