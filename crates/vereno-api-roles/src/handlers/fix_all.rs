//! Bulk repair endpoint.
//!
//! POST /roles/fix-all - repair every detected issue with its default fix.

use axum::{Extension, Json};

use vereno_roles::BulkReconcileService;

use crate::claims::AdminClaims;
use crate::error::ApiRolesError;
use crate::models::BulkFixResponse;

/// Runs the bulk repair pass over every detected issue.
///
/// Best-effort: items fail independently and the response tallies both
/// outcomes. Checks without a safe default fix are reported in `failures`
/// for manual resolution.
#[utoipa::path(
    post,
    path = "/roles/fix-all",
    responses(
        (status = 200, description = "Aggregate repair result", body = BulkFixResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized"),
    ),
    security(("bearerAuth" = [])),
    tag = "Roles"
)]
pub async fn fix_all_role_issues_handler(
    Extension(claims): Extension<AdminClaims>,
    Extension(bulk): Extension<BulkReconcileService>,
) -> Result<Json<BulkFixResponse>, ApiRolesError> {
    tracing::info!(subject = %claims.sub, "Bulk role repair requested");

    let report = bulk.fix_all_role_issues(claims.identity()).await?;

    Ok(Json(BulkFixResponse::from(report)))
}
