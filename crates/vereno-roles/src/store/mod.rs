//! Store abstraction for the reconciliation engine.
//!
//! The engine never talks to tables directly; it goes through
//! [`ReconcileStore`], which gives it a read view of the three data
//! surfaces and one atomic mutation primitive, [`ReconcileStore::replace_roles`].
//!
//! The mutation primitive carries the whole contract the repair engine
//! relies on: delete-all/insert-one/audit-append happen together or not at
//! all, and the caller's expected role set is re-checked under the store's
//! per-identity lock so a concurrent change surfaces as
//! [`RolesError::Conflict`](crate::RolesError::Conflict) instead of a lost
//! update.

pub mod memory;
pub mod pg;

pub use memory::InMemoryReconcileStore;
pub use pg::PgReconcileStore;

use async_trait::async_trait;

use vereno_core::{IdentityId, MemberId};
use vereno_db::models::{AuditLogEntry, AuditLogFilter, MemberStatus, NewAuditLogEntry};

use crate::error::Result;
use crate::types::Role;

/// A linked member together with its current role set.
#[derive(Debug, Clone)]
pub struct MemberRoles {
    /// Member registry key.
    pub member_id: MemberId,
    /// Linked identity.
    pub identity: IdentityId,
    /// Human-facing member number.
    pub member_number: i32,
    /// Full name.
    pub full_name: String,
    /// Membership status.
    pub status: MemberStatus,
    /// Assigned roles, highest precedence first.
    pub roles: Vec<Role>,
}

/// An active collector link.
#[derive(Debug, Clone)]
pub struct ActiveCollector {
    /// The identity acting as collector.
    pub identity: IdentityId,
    /// Display name of the collector assignment.
    pub collector_name: String,
}

/// Atomic role replacement request.
#[derive(Debug, Clone)]
pub struct ReplaceRoles {
    /// The identity whose role set is replaced.
    pub identity: IdentityId,
    /// The role set the caller observed; the replacement aborts with a
    /// conflict if the stored set no longer matches.
    pub expected_roles: Vec<Role>,
    /// The single role to insert after deleting, or `None` to leave the
    /// set empty.
    pub new_role: Option<Role>,
    /// Audit entry to append in the same transaction.
    pub audit: NewAuditLogEntry,
}

/// Data access used by the scanner, repair engine and bulk reconciler.
#[async_trait]
pub trait ReconcileStore: Send + Sync {
    /// Every member with a linked identity, with its role set.
    async fn linked_members(&self) -> Result<Vec<MemberRoles>>;

    /// One member by identity, with its role set.
    async fn member_roles(&self, identity: IdentityId) -> Result<Option<MemberRoles>>;

    /// Every active collector link.
    async fn active_collectors(&self) -> Result<Vec<ActiveCollector>>;

    /// The active collector link for one identity, if any.
    async fn active_collector_for(&self, identity: IdentityId) -> Result<Option<ActiveCollector>>;

    /// Atomically replace an identity's role set and append the audit
    /// entry. All-or-nothing; returns the written audit entry.
    async fn replace_roles(&self, request: ReplaceRoles) -> Result<AuditLogEntry>;

    /// Query the audit trail, newest first.
    async fn audit_trail(&self, filter: &AuditLogFilter, limit: i64) -> Result<Vec<AuditLogEntry>>;
}

/// Sort a role set into canonical order (highest precedence first).
pub(crate) fn sort_roles(roles: &mut [Role]) {
    roles.sort_by(|a, b| b.precedence().cmp(&a.precedence()));
}
