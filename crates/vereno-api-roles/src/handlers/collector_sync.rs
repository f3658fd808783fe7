//! Collector sync endpoint.
//!
//! POST /roles/collectors/sync - grant `collector` to every identity with
//! an active collector link that lacks the role.

use axum::{Extension, Json};

use vereno_roles::BulkReconcileService;

use crate::claims::AdminClaims;
use crate::error::ApiRolesError;
use crate::models::BulkFixResponse;

/// Runs the collector-role sync pass.
#[utoipa::path(
    post,
    path = "/roles/collectors/sync",
    responses(
        (status = 200, description = "Aggregate sync result", body = BulkFixResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized"),
    ),
    security(("bearerAuth" = [])),
    tag = "Roles"
)]
pub async fn fix_all_collectors_handler(
    Extension(claims): Extension<AdminClaims>,
    Extension(bulk): Extension<BulkReconcileService>,
) -> Result<Json<BulkFixResponse>, ApiRolesError> {
    tracing::info!(subject = %claims.sub, "Collector role sync requested");

    let report = bulk.fix_all_collector_sync(claims.identity()).await?;

    Ok(Json(BulkFixResponse::from(report)))
}
