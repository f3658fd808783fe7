//! Type definitions for the reconciliation domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use vereno_core::IdentityId;
use vereno_db::models::MemberStatus;

// ============================================================================
// Roles
// ============================================================================

/// A granted role. Privilege scope is enforced elsewhere; the engine only
/// cares about which roles exist for an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Board/administration access.
    Admin,
    /// Payment collector for a district.
    Collector,
    /// Ordinary member.
    Member,
}

impl Role {
    /// Canonical lowercase name, as stored in `role_assignments.role`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Collector => "collector",
            Role::Member => "member",
        }
    }

    /// Precedence when deriving a single effective role from a
    /// multi-role set: `admin > collector > member`.
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Collector => 2,
            Role::Member => 1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "collector" => Ok(Role::Collector),
            "member" => Ok(Role::Member),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

// ============================================================================
// Checks
// ============================================================================

/// Consistency check classifying a member identity.
///
/// The serialized names are the operator-facing check labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckType {
    /// More than one role assigned.
    #[serde(rename = "Multiple Roles Assigned")]
    MultipleRolesAssigned,
    /// Active member with an empty role set.
    #[serde(rename = "Member Without Role")]
    MemberWithoutRole,
    /// Active collector link without a `collector` role.
    #[serde(rename = "Collector Missing Role")]
    CollectorMissingRole,
    /// Single role that contradicts the membership status.
    #[serde(rename = "Inconsistent Member Status")]
    InconsistentMemberStatus,
}

impl CheckType {
    /// Operator-facing label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::MultipleRolesAssigned => "Multiple Roles Assigned",
            CheckType::MemberWithoutRole => "Member Without Role",
            CheckType::CollectorMissingRole => "Collector Missing Role",
            CheckType::InconsistentMemberStatus => "Inconsistent Member Status",
        }
    }

    /// Severity a detected issue of this check carries.
    #[must_use]
    pub fn severity(&self) -> IssueSeverity {
        match self {
            CheckType::MultipleRolesAssigned | CheckType::InconsistentMemberStatus => {
                IssueSeverity::Warning
            }
            CheckType::MemberWithoutRole | CheckType::CollectorMissingRole => {
                IssueSeverity::Critical
            }
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Multiple Roles Assigned" => Ok(CheckType::MultipleRolesAssigned),
            "Member Without Role" => Ok(CheckType::MemberWithoutRole),
            "Collector Missing Role" => Ok(CheckType::CollectorMissingRole),
            "Inconsistent Member Status" => Ok(CheckType::InconsistentMemberStatus),
            _ => Err(format!("Invalid check type: {s}")),
        }
    }
}

/// Severity of a validation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueSeverity {
    /// Consistent; never surfaced in default scan output.
    Good,
    /// Inconsistent but not privilege-affecting.
    Warning,
    /// Inconsistent in a way that blocks or over-grants access.
    Critical,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueSeverity::Good => write!(f, "Good"),
            IssueSeverity::Warning => write!(f, "Warning"),
            IssueSeverity::Critical => write!(f, "Critical"),
        }
    }
}

// ============================================================================
// Issues
// ============================================================================

/// Check-specific payload of a validation issue.
///
/// Tagged by check type so each check carries exactly the fields it needs,
/// rather than an open-ended map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "check_type")]
pub enum IssueDetails {
    /// More than one role row exists for the identity.
    #[serde(rename = "Multiple Roles Assigned")]
    MultipleRoles {
        identity: IdentityId,
        member_number: i32,
        full_name: String,
        member_status: MemberStatus,
        /// All currently assigned roles, highest precedence first.
        roles: Vec<Role>,
    },
    /// An active member has no role at all.
    #[serde(rename = "Member Without Role")]
    MemberWithoutRole {
        identity: IdentityId,
        member_number: i32,
        full_name: String,
        member_status: MemberStatus,
    },
    /// An active collector link exists but the `collector` role does not.
    #[serde(rename = "Collector Missing Role")]
    CollectorMissingRole {
        identity: IdentityId,
        member_number: i32,
        full_name: String,
        collector_name: String,
        roles: Vec<Role>,
    },
    /// The single assigned role contradicts the membership status.
    #[serde(rename = "Inconsistent Member Status")]
    InconsistentStatus {
        identity: IdentityId,
        member_number: i32,
        full_name: String,
        member_status: MemberStatus,
        role: Role,
    },
}

impl IssueDetails {
    /// The check this payload belongs to.
    #[must_use]
    pub fn check_type(&self) -> CheckType {
        match self {
            IssueDetails::MultipleRoles { .. } => CheckType::MultipleRolesAssigned,
            IssueDetails::MemberWithoutRole { .. } => CheckType::MemberWithoutRole,
            IssueDetails::CollectorMissingRole { .. } => CheckType::CollectorMissingRole,
            IssueDetails::InconsistentStatus { .. } => CheckType::InconsistentMemberStatus,
        }
    }

    /// The identity the issue concerns.
    #[must_use]
    pub fn identity(&self) -> IdentityId {
        match self {
            IssueDetails::MultipleRoles { identity, .. }
            | IssueDetails::MemberWithoutRole { identity, .. }
            | IssueDetails::CollectorMissingRole { identity, .. }
            | IssueDetails::InconsistentStatus { identity, .. } => *identity,
        }
    }
}

/// A validation issue produced by a scan.
///
/// Ephemeral: computed fresh on every scan, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Severity, derived from the check type.
    pub status: IssueSeverity,
    /// Check-specific payload; serializes with a `check_type` tag.
    #[serde(flatten)]
    pub details: IssueDetails,
}

impl ValidationIssue {
    /// Build an issue, deriving severity from the check type.
    #[must_use]
    pub fn new(details: IssueDetails) -> Self {
        Self {
            status: details.check_type().severity(),
            details,
        }
    }

    /// The check this issue was raised by.
    #[must_use]
    pub fn check_type(&self) -> CheckType {
        self.details.check_type()
    }

    /// The identity the issue concerns.
    #[must_use]
    pub fn identity(&self) -> IdentityId {
        self.details.identity()
    }
}

// ============================================================================
// Repairs
// ============================================================================

/// Corrective action requested for an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedFix {
    /// Keep/assign `admin`.
    Admin,
    /// Keep/assign `collector`.
    Collector,
    /// Keep/assign `member`.
    Member,
    /// Remove every role.
    RemoveRole,
}

impl RequestedFix {
    /// The role the fix results in, or `None` for removal.
    #[must_use]
    pub fn target_role(&self) -> Option<Role> {
        match self {
            RequestedFix::Admin => Some(Role::Admin),
            RequestedFix::Collector => Some(Role::Collector),
            RequestedFix::Member => Some(Role::Member),
            RequestedFix::RemoveRole => None,
        }
    }
}

impl fmt::Display for RequestedFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedFix::Admin => write!(f, "admin"),
            RequestedFix::Collector => write!(f, "collector"),
            RequestedFix::Member => write!(f, "member"),
            RequestedFix::RemoveRole => write!(f, "remove_role"),
        }
    }
}

impl std::str::FromStr for RequestedFix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(RequestedFix::Admin),
            "collector" => Ok(RequestedFix::Collector),
            "member" => Ok(RequestedFix::Member),
            "remove_role" => Ok(RequestedFix::RemoveRole),
            _ => Err(format!("Invalid fix: {s}")),
        }
    }
}

/// What a repair did to the role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairAction {
    /// Role set replaced with a single role.
    RoleChange,
    /// Role set emptied.
    RemoveRole,
}

impl fmt::Display for RepairAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepairAction::RoleChange => write!(f, "role_change"),
            RepairAction::RemoveRole => write!(f, "remove_role"),
        }
    }
}

/// Result of a single repair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairOutcome {
    /// The repaired identity.
    pub identity: IdentityId,
    /// What kind of change was requested.
    pub action: RepairAction,
    /// Role set before the repair.
    pub previous_roles: Vec<Role>,
    /// Role after the repair, `None` for removal.
    pub new_role: Option<Role>,
    /// Whether any mutation was applied. `false` means the role set
    /// already satisfied the requested fix (issue resolved between scan
    /// and repair) and nothing was written, audit included.
    pub changed: bool,
    /// Audit entry recording the mutation, when one was applied.
    pub audit_id: Option<Uuid>,
}

// ============================================================================
// Bulk reports
// ============================================================================

/// One unrepaired item from a bulk pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFailure {
    /// The identity that could not be repaired.
    pub identity: IdentityId,
    /// The check being repaired.
    pub check_type: CheckType,
    /// Why the repair did not happen.
    pub error: String,
}

/// Aggregate result of a bulk reconciliation pass.
///
/// Best-effort semantics: items fail independently and the pass always
/// runs to the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkFixReport {
    /// Items repaired (or already consistent at repair time).
    pub success_count: usize,
    /// Items that remain unrepaired, ambiguous skips included.
    pub failed_count: usize,
    /// Detail for every unrepaired item.
    pub failures: Vec<BulkFailure>,
}

impl BulkFixReport {
    /// Record a repaired item.
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    /// Record an unrepaired item.
    pub fn record_failure(&mut self, identity: IdentityId, check_type: CheckType, error: String) {
        self.failed_count += 1;
        self.failures.push(BulkFailure {
            identity,
            check_type,
            error,
        });
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: BulkFixReport) {
        self.success_count += other.success_count;
        self.failed_count += other.failed_count;
        self.failures.extend(other.failures);
    }

    /// Whether every item was repaired.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed_count == 0
    }
}
