//! Request models.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Request body for repairing one issue.
///
/// `check_type` carries the operator-facing label the scan reported
/// (`"Member Without Role"`); `fix` is one of `admin`, `collector`,
/// `member` or `remove_role`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FixRoleRequest {
    /// Identity to repair.
    pub identity: Uuid,
    /// The check being repaired, as reported by the scan.
    pub check_type: String,
    /// The fix to apply.
    pub fix: String,
}

/// Query parameters for the audit trail.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AuditTrailParams {
    /// Only entries for this record (identity).
    pub record_id: Option<Uuid>,
    /// Only entries with this operation (`create`, `update`, `delete`).
    pub operation: Option<String>,
    /// Only entries touching this table.
    pub table_name: Option<String>,
    /// Maximum number of entries (default 100, capped at 500).
    pub limit: Option<i64>,
}
