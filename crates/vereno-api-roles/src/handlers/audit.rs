//! Audit trail endpoint.
//!
//! GET /roles/audit - query the append-only audit trail, newest first.

use std::sync::Arc;

use axum::extract::Query;
use axum::{Extension, Json};

use vereno_db::models::{AuditLogFilter, AuditOperation};
use vereno_roles::store::ReconcileStore;

use crate::error::ApiRolesError;
use crate::models::{AuditEntryResponse, AuditTrailParams};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

/// Queries the audit trail.
#[utoipa::path(
    get,
    path = "/roles/audit",
    params(AuditTrailParams),
    responses(
        (status = 200, description = "Audit entries, newest first", body = Vec<AuditEntryResponse>),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized"),
    ),
    security(("bearerAuth" = [])),
    tag = "Roles"
)]
pub async fn audit_trail_handler(
    Extension(store): Extension<Arc<dyn ReconcileStore>>,
    Query(params): Query<AuditTrailParams>,
) -> Result<Json<Vec<AuditEntryResponse>>, ApiRolesError> {
    if let Some(operation) = &params.operation {
        operation
            .parse::<AuditOperation>()
            .map_err(ApiRolesError::Validation)?;
    }

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let filter = AuditLogFilter {
        record_id: params.record_id,
        table_name: params.table_name,
        operation: params.operation,
        ..Default::default()
    };

    let entries = store.audit_trail(&filter, limit).await?;

    Ok(Json(
        entries.into_iter().map(AuditEntryResponse::from).collect(),
    ))
}
