//! Repair engine.
//!
//! Applies a single corrective mutation to one identity's role set. The
//! store executes the mutation atomically (delete-all, insert-one, audit
//! append, one transaction); this module decides what to mutate and what
//! the audit entry says.

use std::sync::Arc;

use serde_json::json;

use vereno_core::IdentityId;
use vereno_db::models::{AuditOperation, AuditSeverity, NewAuditLogEntry};

use crate::error::{Result, RolesError};
use crate::store::{ReconcileStore, ReplaceRoles};
use crate::types::{CheckType, RepairAction, RepairOutcome, RequestedFix, Role};

/// Table the engine mutates; recorded in every audit entry.
const ROLE_TABLE: &str = "role_assignments";

/// Single-identity corrective mutations.
#[derive(Clone)]
pub struct RoleRepairService {
    store: Arc<dyn ReconcileStore>,
}

impl RoleRepairService {
    /// Create a repair service over a store.
    #[must_use]
    pub fn new(store: Arc<dyn ReconcileStore>) -> Self {
        Self { store }
    }

    /// The fix bulk mode applies for a check when the operator supplied
    /// none.
    ///
    /// # Errors
    ///
    /// Returns [`RolesError::AmbiguousFix`] for checks where any automatic
    /// choice would guess which role to keep: *Multiple Roles Assigned*
    /// and *Inconsistent Member Status* require an operator decision.
    pub fn default_fix(check_type: CheckType) -> Result<RequestedFix> {
        match check_type {
            CheckType::MemberWithoutRole => Ok(RequestedFix::Member),
            CheckType::CollectorMissingRole => Ok(RequestedFix::Collector),
            CheckType::MultipleRolesAssigned | CheckType::InconsistentMemberStatus => {
                Err(RolesError::AmbiguousFix { check_type })
            }
        }
    }

    /// Apply a fix to one identity.
    ///
    /// Reads the current role set, and unless it already satisfies the
    /// requested fix, replaces it atomically together with the audit
    /// entry. A role set that changed between the read and the replacement
    /// surfaces as [`RolesError::Conflict`] with nothing written.
    ///
    /// # Errors
    ///
    /// [`RolesError::NotFound`] when the identity has no member record;
    /// [`RolesError::Conflict`] on concurrent mutation;
    /// [`RolesError::Store`] when the underlying store aborts.
    pub async fn fix(
        &self,
        identity: IdentityId,
        check_type: CheckType,
        requested_fix: RequestedFix,
        actor: Option<IdentityId>,
    ) -> Result<RepairOutcome> {
        let member = self
            .store
            .member_roles(identity)
            .await?
            .ok_or(RolesError::NotFound { identity })?;

        let current = member.roles;
        let target = requested_fix.target_role();
        let action = match target {
            Some(_) => RepairAction::RoleChange,
            None => RepairAction::RemoveRole,
        };

        if already_satisfied(&current, target) {
            tracing::debug!(
                %identity,
                check = %check_type,
                fix = %requested_fix,
                "Issue already resolved; no repair needed"
            );
            return Ok(RepairOutcome {
                identity,
                action,
                previous_roles: current,
                new_role: target,
                changed: false,
                audit_id: None,
            });
        }

        let audit = audit_entry(identity, actor, &current, target, action, check_type);

        let entry = self
            .store
            .replace_roles(ReplaceRoles {
                identity,
                expected_roles: current.clone(),
                new_role: target,
                audit,
            })
            .await?;

        tracing::info!(
            %identity,
            check = %check_type,
            fix = %requested_fix,
            previous = ?current,
            "Repaired role assignment"
        );

        Ok(RepairOutcome {
            identity,
            action,
            previous_roles: current,
            new_role: target,
            changed: true,
            audit_id: Some(entry.id),
        })
    }
}

/// Whether the current role set already satisfies the requested fix.
fn already_satisfied(current: &[Role], target: Option<Role>) -> bool {
    match target {
        Some(role) => matches!(current, [only] if *only == role),
        None => current.is_empty(),
    }
}

fn audit_entry(
    identity: IdentityId,
    actor: Option<IdentityId>,
    current: &[Role],
    target: Option<Role>,
    action: RepairAction,
    check_type: CheckType,
) -> NewAuditLogEntry {
    let operation = match (current.is_empty(), target) {
        (_, None) => AuditOperation::Delete,
        (true, Some(_)) => AuditOperation::Create,
        (false, Some(_)) => AuditOperation::Update,
    };

    // Removing roles is the one repair that revokes access; flag it.
    let severity = match target {
        None => AuditSeverity::Warning,
        Some(_) => AuditSeverity::Info,
    };

    NewAuditLogEntry {
        table_name: ROLE_TABLE.to_string(),
        operation,
        record_id: identity.into_inner(),
        actor_identity: actor.map(IdentityId::into_inner),
        old_values: if current.is_empty() {
            None
        } else {
            Some(json!({ "roles": current }))
        },
        new_values: json!({
            "action": action,
            "new_role": target,
            "check_type": check_type,
        }),
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fix_for_repairable_checks() {
        assert_eq!(
            RoleRepairService::default_fix(CheckType::MemberWithoutRole).unwrap(),
            RequestedFix::Member
        );
        assert_eq!(
            RoleRepairService::default_fix(CheckType::CollectorMissingRole).unwrap(),
            RequestedFix::Collector
        );
    }

    #[test]
    fn test_default_fix_refuses_ambiguous_checks() {
        assert!(RoleRepairService::default_fix(CheckType::MultipleRolesAssigned)
            .unwrap_err()
            .is_ambiguous());
        assert!(
            RoleRepairService::default_fix(CheckType::InconsistentMemberStatus)
                .unwrap_err()
                .is_ambiguous()
        );
    }

    #[test]
    fn test_already_satisfied() {
        assert!(already_satisfied(&[Role::Member], Some(Role::Member)));
        assert!(already_satisfied(&[], None));
        assert!(!already_satisfied(&[Role::Admin], Some(Role::Member)));
        assert!(!already_satisfied(
            &[Role::Admin, Role::Member],
            Some(Role::Admin)
        ));
        assert!(!already_satisfied(&[Role::Member], None));
    }

    #[test]
    fn test_audit_entry_shape() {
        let identity = IdentityId::new();
        let entry = audit_entry(
            identity,
            None,
            &[Role::Admin, Role::Member],
            Some(Role::Member),
            RepairAction::RoleChange,
            CheckType::MultipleRolesAssigned,
        );

        assert_eq!(entry.table_name, "role_assignments");
        assert_eq!(entry.operation, AuditOperation::Update);
        assert_eq!(entry.record_id, identity.into_inner());
        assert_eq!(
            entry.old_values.unwrap()["roles"],
            serde_json::json!(["admin", "member"])
        );
        assert_eq!(entry.new_values["action"], "role_change");
        assert_eq!(entry.new_values["new_role"], "member");
    }

    #[test]
    fn test_audit_entry_for_first_grant_and_removal() {
        let identity = IdentityId::new();

        let grant = audit_entry(
            identity,
            None,
            &[],
            Some(Role::Collector),
            RepairAction::RoleChange,
            CheckType::CollectorMissingRole,
        );
        assert_eq!(grant.operation, AuditOperation::Create);
        assert!(grant.old_values.is_none());
        assert_eq!(grant.severity, AuditSeverity::Info);

        let removal = audit_entry(
            identity,
            None,
            &[Role::Member],
            None,
            RepairAction::RemoveRole,
            CheckType::InconsistentMemberStatus,
        );
        assert_eq!(removal.operation, AuditOperation::Delete);
        assert_eq!(removal.severity, AuditSeverity::Warning);
        assert_eq!(removal.new_values["action"], "remove_role");
        assert!(removal.new_values["new_role"].is_null());
    }
}
