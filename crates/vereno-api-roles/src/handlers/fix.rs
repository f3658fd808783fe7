//! Single-issue repair endpoint.
//!
//! POST /roles/fix - repair one identity with an explicit fix.

use axum::{Extension, Json};

use vereno_core::IdentityId;
use vereno_roles::{CheckType, RequestedFix, RoleRepairService};

use crate::claims::AdminClaims;
use crate::error::ApiRolesError;
use crate::models::{FixRoleRequest, RepairOutcomeResponse};

/// Repairs one detected issue with the operator's chosen fix.
#[utoipa::path(
    post,
    path = "/roles/fix",
    request_body = FixRoleRequest,
    responses(
        (status = 200, description = "Repair applied (or already resolved)", body = RepairOutcomeResponse),
        (status = 400, description = "Unknown check type or fix"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized"),
        (status = 404, description = "Identity has no member record"),
        (status = 409, description = "Role set changed concurrently"),
    ),
    security(("bearerAuth" = [])),
    tag = "Roles"
)]
pub async fn fix_role_error_handler(
    Extension(claims): Extension<AdminClaims>,
    Extension(repair): Extension<RoleRepairService>,
    Json(request): Json<FixRoleRequest>,
) -> Result<Json<RepairOutcomeResponse>, ApiRolesError> {
    let check_type: CheckType = request
        .check_type
        .parse()
        .map_err(ApiRolesError::Validation)?;
    let fix: RequestedFix = request.fix.parse().map_err(ApiRolesError::Validation)?;
    let identity = IdentityId::from_uuid(request.identity);

    tracing::info!(
        subject = %claims.sub,
        %identity,
        check = %check_type,
        %fix,
        "Applying role repair"
    );

    let outcome = repair
        .fix(identity, check_type, fix, claims.identity())
        .await?;

    Ok(Json(RepairOutcomeResponse::from(outcome)))
}
