//! Validation scanner.
//!
//! Read-only classification of every linked member against the fixed set
//! of consistency checks. The scanner never mutates anything and is safe
//! to run arbitrarily often, including concurrently with repairs; a stale
//! result simply surfaces later as an already-resolved repair.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use vereno_core::IdentityId;
use vereno_db::models::MemberStatus;

use crate::error::{Result, RolesError};
use crate::store::{MemberRoles, ReconcileStore};
use crate::types::{IssueDetails, IssueSeverity, Role, ValidationIssue};

/// Derive the single authoritative role from an assignment set.
///
/// Precedence is `admin > collector > member`. An active collector link is
/// deliberately not an input here: linkage only ever *flags* a missing
/// `collector` assignment, it never overrides an explicit one.
#[must_use]
pub fn effective_role(roles: &[Role]) -> Option<Role> {
    roles.iter().copied().max_by_key(Role::precedence)
}

/// Whether a single assigned role contradicts the membership status.
///
/// A pending membership can only legitimately hold `member`; privileged
/// roles require an active (or at least non-pending) membership.
fn role_conflicts_with_status(role: Role, status: MemberStatus) -> bool {
    status == MemberStatus::Pending && role != Role::Member
}

/// Classify one member against every check. Each check is evaluated
/// independently, so a single identity can surface several issues.
fn classify(member: &MemberRoles, collector_name: Option<&str>) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if member.roles.len() > 1 {
        issues.push(ValidationIssue::new(IssueDetails::MultipleRoles {
            identity: member.identity,
            member_number: member.member_number,
            full_name: member.full_name.clone(),
            member_status: member.status,
            roles: member.roles.clone(),
        }));
    }

    if member.roles.is_empty() && member.status == MemberStatus::Active {
        issues.push(ValidationIssue::new(IssueDetails::MemberWithoutRole {
            identity: member.identity,
            member_number: member.member_number,
            full_name: member.full_name.clone(),
            member_status: member.status,
        }));
    }

    if let Some(collector_name) = collector_name {
        if !member.roles.contains(&Role::Collector) {
            issues.push(ValidationIssue::new(IssueDetails::CollectorMissingRole {
                identity: member.identity,
                member_number: member.member_number,
                full_name: member.full_name.clone(),
                collector_name: collector_name.to_string(),
                roles: member.roles.clone(),
            }));
        }
    }

    if let [role] = member.roles[..] {
        if role_conflicts_with_status(role, member.status) {
            issues.push(ValidationIssue::new(IssueDetails::InconsistentStatus {
                identity: member.identity,
                member_number: member.member_number,
                full_name: member.full_name.clone(),
                member_status: member.status,
                role,
            }));
        }
    }

    issues
}

/// Per-identity consistency report, the explicit "is this one Good?"
/// surface that the default scan output omits.
#[derive(Debug, Clone, Serialize)]
pub struct IdentityReport {
    /// The inspected identity.
    pub identity: IdentityId,
    /// Member number.
    pub member_number: i32,
    /// Full name.
    pub full_name: String,
    /// Membership status.
    pub member_status: MemberStatus,
    /// Assigned roles, highest precedence first.
    pub roles: Vec<Role>,
    /// Authoritative single role, per [`effective_role`].
    pub effective_role: Option<Role>,
    /// `Good` when no check fired, otherwise the worst firing severity.
    pub status: IssueSeverity,
    /// Every issue the identity currently surfaces.
    pub issues: Vec<ValidationIssue>,
}

/// Read-only validation pass over the member registry.
#[derive(Clone)]
pub struct RoleScanService {
    store: Arc<dyn ReconcileStore>,
}

impl RoleScanService {
    /// Create a scanner over a store.
    #[must_use]
    pub fn new(store: Arc<dyn ReconcileStore>) -> Self {
        Self { store }
    }

    /// Classify every linked member, returning only detected issues.
    ///
    /// Consistent identities are omitted; use [`Self::check_identity`] to
    /// get an explicit `Good` verdict for one identity.
    pub async fn scan(&self) -> Result<Vec<ValidationIssue>> {
        let members = self.store.linked_members().await?;
        let collectors = self.collector_names().await?;

        let issues: Vec<ValidationIssue> = members
            .iter()
            .flat_map(|member| {
                classify(
                    member,
                    collectors.get(&member.identity).map(String::as_str),
                )
            })
            .collect();

        tracing::debug!(
            members = members.len(),
            issues = issues.len(),
            "Validation scan completed"
        );

        Ok(issues)
    }

    /// Full consistency report for one identity.
    ///
    /// # Errors
    ///
    /// Returns [`RolesError::NotFound`] when the identity has no member
    /// record.
    pub async fn check_identity(&self, identity: IdentityId) -> Result<IdentityReport> {
        let member = self
            .store
            .member_roles(identity)
            .await?
            .ok_or(RolesError::NotFound { identity })?;

        let collector = self.store.active_collector_for(identity).await?;
        let issues = classify(&member, collector.as_ref().map(|c| c.collector_name.as_str()));

        let status = issues
            .iter()
            .map(|i| i.status)
            .max()
            .unwrap_or(IssueSeverity::Good);

        Ok(IdentityReport {
            identity,
            member_number: member.member_number,
            full_name: member.full_name.clone(),
            member_status: member.status,
            effective_role: effective_role(&member.roles),
            roles: member.roles,
            status,
            issues,
        })
    }

    async fn collector_names(&self) -> Result<HashMap<IdentityId, String>> {
        let mut names = HashMap::new();
        for link in self.store.active_collectors().await? {
            // First active link wins; duplicates declare the same fact.
            names.entry(link.identity).or_insert(link.collector_name);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vereno_core::MemberId;

    fn member(status: MemberStatus, roles: &[Role]) -> MemberRoles {
        let mut roles = roles.to_vec();
        roles.sort_by(|a, b| b.precedence().cmp(&a.precedence()));
        MemberRoles {
            member_id: MemberId::new(),
            identity: IdentityId::new(),
            member_number: 1,
            full_name: "Test Member".to_string(),
            status,
            roles,
        }
    }

    #[test]
    fn test_effective_role_precedence() {
        assert_eq!(
            effective_role(&[Role::Member, Role::Admin, Role::Collector]),
            Some(Role::Admin)
        );
        assert_eq!(
            effective_role(&[Role::Member, Role::Collector]),
            Some(Role::Collector)
        );
        assert_eq!(effective_role(&[]), None);
    }

    #[test]
    fn test_classify_single_member_role_is_good() {
        let m = member(MemberStatus::Active, &[Role::Member]);
        assert!(classify(&m, None).is_empty());
    }

    #[test]
    fn test_classify_multiple_roles() {
        let m = member(MemberStatus::Active, &[Role::Admin, Role::Collector]);
        let issues = classify(&m, None);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].check_type(),
            crate::types::CheckType::MultipleRolesAssigned
        );
        assert_eq!(issues[0].status, IssueSeverity::Warning);
    }

    #[test]
    fn test_classify_active_member_without_role() {
        let m = member(MemberStatus::Active, &[]);
        let issues = classify(&m, None);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].status, IssueSeverity::Critical);
    }

    #[test]
    fn test_classify_pending_member_without_role_is_good() {
        let m = member(MemberStatus::Pending, &[]);
        assert!(classify(&m, None).is_empty());
    }

    #[test]
    fn test_classify_collector_link_without_role() {
        let m = member(MemberStatus::Active, &[Role::Member]);
        let issues = classify(&m, Some("District North"));
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].check_type(),
            crate::types::CheckType::CollectorMissingRole
        );
    }

    #[test]
    fn test_classify_collector_link_with_role_is_good() {
        let m = member(MemberStatus::Active, &[Role::Collector]);
        assert!(classify(&m, Some("District North")).is_empty());
    }

    #[test]
    fn test_classify_pending_collector_is_inconsistent() {
        let m = member(MemberStatus::Pending, &[Role::Collector]);
        let issues = classify(&m, None);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].check_type(),
            crate::types::CheckType::InconsistentMemberStatus
        );
        assert_eq!(issues[0].status, IssueSeverity::Warning);
    }

    #[test]
    fn test_classify_can_surface_multiple_issues() {
        // Two roles, neither collector, plus an active collector link.
        let m = member(MemberStatus::Active, &[Role::Admin, Role::Member]);
        let issues = classify(&m, Some("District South"));
        assert_eq!(issues.len(), 2);
    }
}
