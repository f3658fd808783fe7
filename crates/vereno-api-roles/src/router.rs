//! Role reconciliation router configuration.
//!
//! Routes:
//! - GET  /roles/validate - run the validation scanner
//! - POST /roles/fix - repair one issue
//! - POST /roles/fix-all - bulk repair pass
//! - POST /roles/collectors/sync - collector-role sync pass
//! - GET  /roles/audit - audit trail query
//! - GET  /roles/effective/:identity - per-identity report
//!
//! The whole router sits behind [`admin_guard`]; the deployment's gateway
//! must have inserted [`crate::AdminClaims`] into request extensions.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Router,
};

use vereno_roles::store::ReconcileStore;
use vereno_roles::{BulkReconcileService, RoleRepairService, RoleScanService};

use crate::handlers::{
    audit_trail_handler, effective_role_handler, fix_all_collectors_handler,
    fix_all_role_issues_handler, fix_role_error_handler, validate_user_roles_handler,
};
use crate::middleware::admin_guard;

/// Application state for the role reconciliation routes.
#[derive(Clone)]
pub struct RolesState {
    /// Store shared by the services (and used directly for audit queries).
    pub store: Arc<dyn ReconcileStore>,
    /// Validation scanner.
    pub scanner: RoleScanService,
    /// Single-issue repair service.
    pub repair: RoleRepairService,
    /// Bulk reconciler.
    pub bulk: BulkReconcileService,
}

impl RolesState {
    /// Wire the services over a store.
    #[must_use]
    pub fn new(store: Arc<dyn ReconcileStore>) -> Self {
        Self {
            scanner: RoleScanService::new(store.clone()),
            repair: RoleRepairService::new(store.clone()),
            bulk: BulkReconcileService::new(store.clone()),
            store,
        }
    }
}

/// Build the role reconciliation router.
pub fn roles_router(state: RolesState) -> Router {
    Router::new()
        .route("/roles/validate", get(validate_user_roles_handler))
        .route("/roles/fix", post(fix_role_error_handler))
        .route("/roles/fix-all", post(fix_all_role_issues_handler))
        .route("/roles/collectors/sync", post(fix_all_collectors_handler))
        .route("/roles/audit", get(audit_trail_handler))
        .route("/roles/effective/:identity", get(effective_role_handler))
        .layer(middleware::from_fn(admin_guard))
        .layer(Extension(state.scanner))
        .layer(Extension(state.repair))
        .layer(Extension(state.bulk))
        .layer(Extension(state.store))
}
