//! Shared fixtures for reconciliation engine integration tests.
//!
//! All tests run against the in-memory store for isolation and speed; the
//! store mirrors the Postgres store's transactional contract.

use std::sync::Arc;

use vereno_roles::store::InMemoryReconcileStore;
use vereno_roles::{BulkReconcileService, RoleRepairService, RoleScanService};

/// One isolated store with the three services wired over it.
pub struct TestContext {
    pub store: Arc<InMemoryReconcileStore>,
    pub scanner: RoleScanService,
    pub repair: RoleRepairService,
    pub bulk: BulkReconcileService,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryReconcileStore::new());
        Self {
            scanner: RoleScanService::new(store.clone()),
            repair: RoleRepairService::new(store.clone()),
            bulk: BulkReconcileService::new(store.clone()),
            store,
        }
    }
}
