//! Response models.
//!
//! Flat projections of the engine's domain types, shaped for the admin
//! UI's issue table and dialogs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;

use vereno_db::models::AuditLogEntry;
use vereno_roles::scanner::IdentityReport;
use vereno_roles::{BulkFixReport, IssueDetails, RepairOutcome, Role, ValidationIssue};

fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(ToString::to_string).collect()
}

/// One row of the validation issue table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationIssueResponse {
    /// Operator-facing check label.
    pub check_type: String,
    /// `Warning` or `Critical`.
    pub status: String,
    /// The identity concerned.
    pub identity: Uuid,
    /// Member number.
    pub member_number: i32,
    /// Full name.
    pub full_name: String,
    /// Roles currently assigned, highest precedence first.
    pub current_roles: Vec<String>,
    /// Membership status, where the check involves it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_status: Option<String>,
    /// Collector assignment name, for collector checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collector_name: Option<String>,
}

impl From<ValidationIssue> for ValidationIssueResponse {
    fn from(issue: ValidationIssue) -> Self {
        let check_type = issue.check_type().to_string();
        let status = issue.status.to_string();

        match issue.details {
            IssueDetails::MultipleRoles {
                identity,
                member_number,
                full_name,
                member_status,
                roles,
            } => Self {
                check_type,
                status,
                identity: identity.into_inner(),
                member_number,
                full_name,
                current_roles: role_names(&roles),
                member_status: Some(member_status.to_string()),
                collector_name: None,
            },
            IssueDetails::MemberWithoutRole {
                identity,
                member_number,
                full_name,
                member_status,
            } => Self {
                check_type,
                status,
                identity: identity.into_inner(),
                member_number,
                full_name,
                current_roles: Vec::new(),
                member_status: Some(member_status.to_string()),
                collector_name: None,
            },
            IssueDetails::CollectorMissingRole {
                identity,
                member_number,
                full_name,
                collector_name,
                roles,
            } => Self {
                check_type,
                status,
                identity: identity.into_inner(),
                member_number,
                full_name,
                current_roles: role_names(&roles),
                member_status: None,
                collector_name: Some(collector_name),
            },
            IssueDetails::InconsistentStatus {
                identity,
                member_number,
                full_name,
                member_status,
                role,
            } => Self {
                check_type,
                status,
                identity: identity.into_inner(),
                member_number,
                full_name,
                current_roles: vec![role.to_string()],
                member_status: Some(member_status.to_string()),
                collector_name: None,
            },
        }
    }
}

/// Result of a single repair.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RepairOutcomeResponse {
    /// The repaired identity.
    pub identity: Uuid,
    /// `role_change` or `remove_role`.
    pub action: String,
    /// Role set before the repair.
    pub previous_roles: Vec<String>,
    /// Role after the repair, absent for removals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_role: Option<String>,
    /// Whether anything was written; `false` means the issue was already
    /// resolved.
    pub changed: bool,
    /// Audit entry recording the mutation, when one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_id: Option<Uuid>,
}

impl From<RepairOutcome> for RepairOutcomeResponse {
    fn from(outcome: RepairOutcome) -> Self {
        Self {
            identity: outcome.identity.into_inner(),
            action: outcome.action.to_string(),
            previous_roles: role_names(&outcome.previous_roles),
            new_role: outcome.new_role.map(|r| r.to_string()),
            changed: outcome.changed,
            audit_id: outcome.audit_id,
        }
    }
}

/// One unrepaired item from a bulk pass.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkFailureResponse {
    /// The identity that could not be repaired.
    pub identity: Uuid,
    /// The check being repaired.
    pub check_type: String,
    /// Why the repair did not happen.
    pub error: String,
}

/// Aggregate result of a bulk pass.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkFixResponse {
    /// Items repaired.
    pub success_count: usize,
    /// Items left unrepaired, ambiguous skips included.
    pub failed_count: usize,
    /// Detail for every unrepaired item.
    pub failures: Vec<BulkFailureResponse>,
}

impl From<BulkFixReport> for BulkFixResponse {
    fn from(report: BulkFixReport) -> Self {
        Self {
            success_count: report.success_count,
            failed_count: report.failed_count,
            failures: report
                .failures
                .into_iter()
                .map(|f| BulkFailureResponse {
                    identity: f.identity.into_inner(),
                    check_type: f.check_type.to_string(),
                    error: f.error,
                })
                .collect(),
        }
    }
}

/// One audit trail entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditEntryResponse {
    /// Entry identifier.
    pub id: Uuid,
    /// Mutated table.
    pub table_name: String,
    /// `create`, `update` or `delete`.
    pub operation: String,
    /// Primary key of the mutated record.
    pub record_id: Uuid,
    /// Identity that requested the mutation, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_identity: Option<Uuid>,
    /// State before the mutation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_values: Option<JsonValue>,
    /// State after the mutation.
    pub new_values: JsonValue,
    /// `info`, `warning` or `critical`.
    pub severity: String,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntry> for AuditEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id,
            table_name: entry.table_name,
            operation: entry.operation,
            record_id: entry.record_id,
            actor_identity: entry.actor_identity,
            old_values: entry.old_values,
            new_values: entry.new_values,
            severity: entry.severity,
            created_at: entry.created_at,
        }
    }
}

/// Per-identity consistency report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IdentityReportResponse {
    /// The inspected identity.
    pub identity: Uuid,
    /// Member number.
    pub member_number: i32,
    /// Full name.
    pub full_name: String,
    /// Membership status.
    pub member_status: String,
    /// Assigned roles, highest precedence first.
    pub roles: Vec<String>,
    /// Authoritative single role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_role: Option<String>,
    /// `Good`, `Warning` or `Critical`.
    pub status: String,
    /// Every issue the identity currently surfaces.
    pub issues: Vec<ValidationIssueResponse>,
}

impl From<IdentityReport> for IdentityReportResponse {
    fn from(report: IdentityReport) -> Self {
        Self {
            identity: report.identity.into_inner(),
            member_number: report.member_number,
            full_name: report.full_name,
            member_status: report.member_status.to_string(),
            roles: role_names(&report.roles),
            effective_role: report.effective_role.map(|r| r.to_string()),
            status: report.status.to_string(),
            issues: report
                .issues
                .into_iter()
                .map(ValidationIssueResponse::from)
                .collect(),
        }
    }
}
