//! In-memory store for tests.
//!
//! Mirrors the transactional contract of the Postgres store: a single
//! write lock covers the expected-set check, the role replacement and the
//! audit append, so `replace_roles` is observable only as all-or-nothing.
//! Includes failure injection for exercising partial-failure paths.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use vereno_core::{IdentityId, MemberId};
use vereno_db::models::{AuditLogEntry, AuditLogFilter, MemberStatus};

use super::{sort_roles, ActiveCollector, MemberRoles, ReconcileStore, ReplaceRoles};
use crate::error::{Result, RolesError};
use crate::types::Role;

#[derive(Debug, Clone)]
struct MemberRecord {
    member_id: MemberId,
    member_number: i32,
    full_name: String,
    status: MemberStatus,
}

#[derive(Debug, Clone)]
struct CollectorRecord {
    identity: IdentityId,
    collector_name: String,
    is_active: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    members: HashMap<IdentityId, MemberRecord>,
    roles: HashMap<IdentityId, Vec<Role>>,
    collectors: Vec<CollectorRecord>,
    audit: Vec<AuditLogEntry>,
    fail_replace: HashSet<IdentityId>,
}

/// In-memory reconcile store for testing.
#[derive(Debug, Default)]
pub struct InMemoryReconcileStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryReconcileStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a member with a linked identity. Returns the identity key.
    pub async fn insert_member(
        &self,
        member_number: i32,
        full_name: &str,
        status: MemberStatus,
    ) -> IdentityId {
        let identity = IdentityId::new();
        let mut state = self.state.write().await;
        state.members.insert(
            identity,
            MemberRecord {
                member_id: MemberId::new(),
                member_number,
                full_name: full_name.to_string(),
                status,
            },
        );
        identity
    }

    /// Grant a role directly, bypassing the repair path (seed data).
    pub async fn grant_role(&self, identity: IdentityId, role: Role) {
        let mut state = self.state.write().await;
        let roles = state.roles.entry(identity).or_default();
        if !roles.contains(&role) {
            roles.push(role);
            sort_roles(roles);
        }
    }

    /// Declare an active collector link.
    pub async fn link_collector(&self, identity: IdentityId, collector_name: &str) {
        let mut state = self.state.write().await;
        state.collectors.push(CollectorRecord {
            identity,
            collector_name: collector_name.to_string(),
            is_active: true,
        });
    }

    /// Deactivate every collector link of an identity.
    pub async fn deactivate_collector(&self, identity: IdentityId) {
        let mut state = self.state.write().await;
        for link in state
            .collectors
            .iter_mut()
            .filter(|c| c.identity == identity)
        {
            link.is_active = false;
        }
    }

    /// Make every subsequent `replace_roles` for this identity fail
    /// before mutating anything.
    pub async fn fail_replace_for(&self, identity: IdentityId) {
        let mut state = self.state.write().await;
        state.fail_replace.insert(identity);
    }

    /// Current role set of an identity (assertion helper).
    pub async fn role_set(&self, identity: IdentityId) -> Vec<Role> {
        let state = self.state.read().await;
        state.roles.get(&identity).cloned().unwrap_or_default()
    }

    /// All audit entries, oldest first (assertion helper).
    pub async fn audit_entries(&self) -> Vec<AuditLogEntry> {
        let state = self.state.read().await;
        state.audit.clone()
    }

    /// Number of audit entries.
    pub async fn audit_count(&self) -> usize {
        let state = self.state.read().await;
        state.audit.len()
    }
}

fn to_member_roles(identity: IdentityId, record: &MemberRecord, roles: &[Role]) -> MemberRoles {
    let mut roles = roles.to_vec();
    sort_roles(&mut roles);
    MemberRoles {
        member_id: record.member_id,
        identity,
        member_number: record.member_number,
        full_name: record.full_name.clone(),
        status: record.status,
        roles,
    }
}

#[async_trait]
impl ReconcileStore for InMemoryReconcileStore {
    async fn linked_members(&self) -> Result<Vec<MemberRoles>> {
        let state = self.state.read().await;
        let mut members: Vec<MemberRoles> = state
            .members
            .iter()
            .map(|(identity, record)| {
                let roles = state.roles.get(identity).cloned().unwrap_or_default();
                to_member_roles(*identity, record, &roles)
            })
            .collect();
        members.sort_by_key(|m| m.member_number);
        Ok(members)
    }

    async fn member_roles(&self, identity: IdentityId) -> Result<Option<MemberRoles>> {
        let state = self.state.read().await;
        Ok(state.members.get(&identity).map(|record| {
            let roles = state.roles.get(&identity).cloned().unwrap_or_default();
            to_member_roles(identity, record, &roles)
        }))
    }

    async fn active_collectors(&self) -> Result<Vec<ActiveCollector>> {
        let state = self.state.read().await;
        Ok(state
            .collectors
            .iter()
            .filter(|c| c.is_active)
            .map(|c| ActiveCollector {
                identity: c.identity,
                collector_name: c.collector_name.clone(),
            })
            .collect())
    }

    async fn active_collector_for(&self, identity: IdentityId) -> Result<Option<ActiveCollector>> {
        let state = self.state.read().await;
        Ok(state
            .collectors
            .iter()
            .find(|c| c.is_active && c.identity == identity)
            .map(|c| ActiveCollector {
                identity: c.identity,
                collector_name: c.collector_name.clone(),
            }))
    }

    async fn replace_roles(&self, request: ReplaceRoles) -> Result<AuditLogEntry> {
        let mut state = self.state.write().await;

        if state.fail_replace.contains(&request.identity) {
            return Err(RolesError::Store(format!(
                "injected failure for {}",
                request.identity
            )));
        }

        let mut current = state
            .roles
            .get(&request.identity)
            .cloned()
            .unwrap_or_default();
        sort_roles(&mut current);

        let mut expected = request.expected_roles.clone();
        sort_roles(&mut expected);

        if current != expected {
            return Err(RolesError::Conflict {
                identity: request.identity,
            });
        }

        match request.new_role {
            Some(role) => {
                state.roles.insert(request.identity, vec![role]);
            }
            None => {
                state.roles.remove(&request.identity);
            }
        }

        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            table_name: request.audit.table_name,
            operation: request.audit.operation.to_string(),
            record_id: request.audit.record_id,
            actor_identity: request.audit.actor_identity,
            old_values: request.audit.old_values,
            new_values: request.audit.new_values,
            severity: request.audit.severity.to_string(),
            created_at: Utc::now(),
        };
        state.audit.push(entry.clone());

        Ok(entry)
    }

    async fn audit_trail(&self, filter: &AuditLogFilter, limit: i64) -> Result<Vec<AuditLogEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<AuditLogEntry> = state
            .audit
            .iter()
            .filter(|e| filter.record_id.is_none_or(|id| e.record_id == id))
            .filter(|e| {
                filter
                    .table_name
                    .as_ref()
                    .is_none_or(|t| &e.table_name == t)
            })
            .filter(|e| filter.operation.as_ref().is_none_or(|o| &e.operation == o))
            .filter(|e| filter.start_date.is_none_or(|d| e.created_at >= d))
            .filter(|e| filter.end_date.is_none_or(|d| e.created_at <= d))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(entries)
    }
}
