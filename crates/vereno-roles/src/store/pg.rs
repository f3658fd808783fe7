//! Postgres reconcile store.
//!
//! Production implementation over [`sqlx::PgPool`] using the `vereno-db`
//! row models. `replace_roles` runs delete-all/insert-one/audit-append in
//! one transaction with the identity's role rows locked `FOR UPDATE`, which
//! serializes concurrent repairs of the same identity.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use vereno_core::{IdentityId, MemberId};
use vereno_db::models::{
    AuditLogEntry, AuditLogFilter, CollectorLink, Member, RoleAssignment,
};

use super::{sort_roles, ActiveCollector, MemberRoles, ReconcileStore, ReplaceRoles};
use crate::error::{Result, RolesError};
use crate::types::Role;

/// Reconcile store backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgReconcileStore {
    pool: PgPool,
}

impl PgReconcileStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_role(raw: &str, identity: Uuid) -> Result<Role> {
    raw.parse().map_err(|_| {
        RolesError::Store(format!(
            "unknown role '{raw}' stored for identity {identity}"
        ))
    })
}

fn parse_roles(assignments: &[RoleAssignment]) -> Result<Vec<Role>> {
    let mut roles = assignments
        .iter()
        .map(|a| parse_role(&a.role, a.identity_id))
        .collect::<Result<Vec<Role>>>()?;
    sort_roles(&mut roles);
    Ok(roles)
}

fn to_member_roles(member: &Member, roles: Vec<Role>) -> Result<MemberRoles> {
    let identity = member.identity_id.ok_or_else(|| {
        RolesError::Store(format!("member {} has no linked identity", member.id))
    })?;
    let status = member.status_enum().ok_or_else(|| {
        RolesError::Store(format!(
            "unknown member status '{}' for member {}",
            member.status, member.id
        ))
    })?;

    Ok(MemberRoles {
        member_id: MemberId::from_uuid(member.id),
        identity: IdentityId::from_uuid(identity),
        member_number: member.member_number,
        full_name: member.full_name.clone(),
        status,
        roles,
    })
}

#[async_trait]
impl ReconcileStore for PgReconcileStore {
    async fn linked_members(&self) -> Result<Vec<MemberRoles>> {
        let members = Member::list_linked(&self.pool).await?;
        let assignments = RoleAssignment::list_all(&self.pool).await?;

        let mut by_identity: HashMap<Uuid, Vec<Role>> = HashMap::new();
        for assignment in &assignments {
            let role = parse_role(&assignment.role, assignment.identity_id)?;
            by_identity.entry(assignment.identity_id).or_default().push(role);
        }

        members
            .iter()
            .map(|member| {
                let mut roles = member
                    .identity_id
                    .and_then(|id| by_identity.get(&id).cloned())
                    .unwrap_or_default();
                sort_roles(&mut roles);
                to_member_roles(member, roles)
            })
            .collect()
    }

    async fn member_roles(&self, identity: IdentityId) -> Result<Option<MemberRoles>> {
        let Some(member) = Member::get_by_identity(&self.pool, identity.into_inner()).await? else {
            return Ok(None);
        };

        let assignments =
            RoleAssignment::list_for_identity(&self.pool, identity.into_inner()).await?;
        let roles = parse_roles(&assignments)?;

        Ok(Some(to_member_roles(&member, roles)?))
    }

    async fn active_collectors(&self) -> Result<Vec<ActiveCollector>> {
        let links = CollectorLink::list_active(&self.pool).await?;
        Ok(links
            .into_iter()
            .map(|link| ActiveCollector {
                identity: IdentityId::from_uuid(link.identity_id),
                collector_name: link.collector_name,
            })
            .collect())
    }

    async fn active_collector_for(&self, identity: IdentityId) -> Result<Option<ActiveCollector>> {
        let link =
            CollectorLink::get_active_for_identity(&self.pool, identity.into_inner()).await?;
        Ok(link.map(|link| ActiveCollector {
            identity: IdentityId::from_uuid(link.identity_id),
            collector_name: link.collector_name,
        }))
    }

    async fn replace_roles(&self, request: ReplaceRoles) -> Result<AuditLogEntry> {
        let identity = request.identity.into_inner();
        let mut tx = self.pool.begin().await?;

        // Row lock: concurrent repairs of the same identity queue here.
        let locked = RoleAssignment::lock_for_identity(&mut *tx, identity).await?;
        let current = parse_roles(&locked)?;

        let mut expected = request.expected_roles.clone();
        sort_roles(&mut expected);

        if current != expected {
            // Dropping the transaction rolls back; nothing was written.
            return Err(RolesError::Conflict {
                identity: request.identity,
            });
        }

        RoleAssignment::delete_for_identity(&mut *tx, identity).await?;

        if let Some(role) = request.new_role {
            RoleAssignment::insert(&mut *tx, identity, role.as_str()).await?;
        }

        let entry = AuditLogEntry::create(&mut *tx, request.audit).await?;

        tx.commit().await?;

        Ok(entry)
    }

    async fn audit_trail(&self, filter: &AuditLogFilter, limit: i64) -> Result<Vec<AuditLogEntry>> {
        Ok(AuditLogEntry::list(&self.pool, filter, limit).await?)
    }
}
