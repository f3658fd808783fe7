//! Per-identity report endpoint.
//!
//! GET /roles/effective/{identity} - consistency report and effective role
//! for one identity, the explicit "is this one Good?" surface.

use axum::extract::Path;
use axum::{Extension, Json};
use uuid::Uuid;

use vereno_core::IdentityId;
use vereno_roles::RoleScanService;

use crate::error::ApiRolesError;
use crate::models::IdentityReportResponse;

/// Returns the consistency report for one identity.
#[utoipa::path(
    get,
    path = "/roles/effective/{identity}",
    params(("identity" = Uuid, Path, description = "Identity to inspect")),
    responses(
        (status = 200, description = "Consistency report", body = IdentityReportResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "Identity has no member record"),
    ),
    security(("bearerAuth" = [])),
    tag = "Roles"
)]
pub async fn effective_role_handler(
    Extension(scanner): Extension<RoleScanService>,
    Path(identity): Path<Uuid>,
) -> Result<Json<IdentityReportResponse>, ApiRolesError> {
    let report = scanner
        .check_identity(IdentityId::from_uuid(identity))
        .await?;

    Ok(Json(IdentityReportResponse::from(report)))
}
