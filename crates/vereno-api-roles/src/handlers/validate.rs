//! Validation scan endpoint.
//!
//! GET /roles/validate - classify every linked member, returning detected
//! issues.

use axum::{Extension, Json};

use vereno_roles::RoleScanService;

use crate::error::ApiRolesError;
use crate::models::ValidationIssueResponse;

/// Runs the validation scanner and returns every detected issue.
///
/// Read-only; consistent identities are omitted.
#[utoipa::path(
    get,
    path = "/roles/validate",
    responses(
        (status = 200, description = "Detected issues", body = Vec<ValidationIssueResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized"),
    ),
    security(("bearerAuth" = [])),
    tag = "Roles"
)]
pub async fn validate_user_roles_handler(
    Extension(scanner): Extension<RoleScanService>,
) -> Result<Json<Vec<ValidationIssueResponse>>, ApiRolesError> {
    let issues = scanner.scan().await?;

    tracing::info!(issues = issues.len(), "Role validation scan served");

    Ok(Json(
        issues
            .into_iter()
            .map(ValidationIssueResponse::from)
            .collect(),
    ))
}
