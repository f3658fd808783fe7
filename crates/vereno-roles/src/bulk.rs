//! Bulk reconciler.
//!
//! "Fix everything": scans for issues and applies the default fix to each,
//! then runs the collector-role sync pass. Items are processed
//! independently; one failing identity never aborts the rest, and the
//! aggregate report lets the operator retry failures one by one.
//!
//! Re-running a bulk pass over an unchanged store finds nothing left to
//! fix: repairs are plain role replacements, so a second pass scans clean
//! (ambiguous items excepted — those are reported, never repaired
//! automatically).

use std::sync::Arc;

use vereno_core::IdentityId;

use crate::error::Result;
use crate::repair::RoleRepairService;
use crate::scanner::RoleScanService;
use crate::store::ReconcileStore;
use crate::types::{BulkFixReport, CheckType, Role};

/// Best-effort batch repair over all detected issues.
#[derive(Clone)]
pub struct BulkReconcileService {
    store: Arc<dyn ReconcileStore>,
    scanner: RoleScanService,
    repair: RoleRepairService,
}

impl BulkReconcileService {
    /// Create a bulk reconciler over a store.
    #[must_use]
    pub fn new(store: Arc<dyn ReconcileStore>) -> Self {
        Self {
            scanner: RoleScanService::new(store.clone()),
            repair: RoleRepairService::new(store.clone()),
            store,
        }
    }

    /// Scan and apply the default fix to every detected issue.
    ///
    /// Checks without a safe default (*Multiple Roles Assigned*,
    /// *Inconsistent Member Status*) are counted as failures and surfaced
    /// for manual resolution; no role is ever guessed.
    pub async fn fix_all_role_issues(&self, actor: Option<IdentityId>) -> Result<BulkFixReport> {
        let issues = self.scanner.scan().await?;
        let mut report = BulkFixReport::default();

        for issue in issues {
            let identity = issue.identity();
            let check_type = issue.check_type();

            let fix = match RoleRepairService::default_fix(check_type) {
                Ok(fix) => fix,
                Err(err) => {
                    report.record_failure(identity, check_type, err.to_string());
                    continue;
                }
            };

            match self.repair.fix(identity, check_type, fix, actor).await {
                Ok(_) => report.record_success(),
                Err(err) => {
                    tracing::warn!(
                        %identity,
                        check = %check_type,
                        error = %err,
                        "Bulk repair item failed"
                    );
                    report.record_failure(identity, check_type, err.to_string());
                }
            }
        }

        tracing::info!(
            success = report.success_count,
            failed = report.failed_count,
            "Bulk role repair pass completed"
        );

        Ok(report)
    }

    /// Grant `collector` to every identity with an active collector link
    /// that lacks the role.
    ///
    /// Identities already holding `collector` are skipped without being
    /// counted, so a clean store reports zero successes and zero failures.
    pub async fn fix_all_collector_sync(&self, actor: Option<IdentityId>) -> Result<BulkFixReport> {
        let links = self.store.active_collectors().await?;
        let mut report = BulkFixReport::default();

        for link in links {
            let member = self.store.member_roles(link.identity).await?;
            if let Some(member) = &member {
                if member.roles.contains(&Role::Collector) {
                    continue;
                }
            }
            // Missing member record falls through: the repair reports it
            // as NotFound so the orphaned link becomes visible.

            match self
                .repair
                .fix(
                    link.identity,
                    CheckType::CollectorMissingRole,
                    crate::types::RequestedFix::Collector,
                    actor,
                )
                .await
            {
                Ok(_) => report.record_success(),
                Err(err) => {
                    tracing::warn!(
                        identity = %link.identity,
                        collector = %link.collector_name,
                        error = %err,
                        "Collector sync item failed"
                    );
                    report.record_failure(
                        link.identity,
                        CheckType::CollectorMissingRole,
                        err.to_string(),
                    );
                }
            }
        }

        tracing::info!(
            success = report.success_count,
            failed = report.failed_count,
            "Collector sync pass completed"
        );

        Ok(report)
    }

    /// Both passes: issue repair, then collector sync.
    pub async fn fix_all(&self, actor: Option<IdentityId>) -> Result<BulkFixReport> {
        let mut report = self.fix_all_role_issues(actor).await?;
        report.merge(self.fix_all_collector_sync(actor).await?);
        Ok(report)
    }
}
