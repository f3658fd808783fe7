//! Integration tests for the audit trail.
//!
//! Every role mutation the engine performs must be reconstructable from
//! the trail: exactly one entry per mutation, written atomically with it,
//! and queryable after the fact.

mod common;

use vereno_db::models::{AuditLogFilter, AuditOperation, MemberStatus};
use vereno_roles::store::ReconcileStore;
use vereno_roles::{CheckType, RequestedFix, Role};

use common::TestContext;

#[tokio::test]
async fn every_repair_writes_exactly_one_entry() {
    let ctx = TestContext::new();
    let mut identities = Vec::new();
    for (number, name) in [(1, "Alma Lindqvist"), (2, "Bo Sandell"), (3, "Cecilia Ahl")] {
        identities.push(
            ctx.store
                .insert_member(number, name, MemberStatus::Active)
                .await,
        );
    }

    let report = ctx.bulk.fix_all_role_issues(None).await.unwrap();
    assert_eq!(report.success_count, 3);

    let entries = ctx.store.audit_entries().await;
    assert_eq!(entries.len(), 3);

    for identity in identities {
        let for_identity: Vec<_> = entries
            .iter()
            .filter(|e| e.record_id == identity.into_inner())
            .collect();
        assert_eq!(for_identity.len(), 1, "one entry per mutated identity");
        assert_eq!(for_identity[0].table_name, "role_assignments");
        assert_eq!(for_identity[0].new_values["action"], "role_change");
        assert_eq!(for_identity[0].new_values["new_role"], "member");
    }
}

#[tokio::test]
async fn audit_trail_filters_by_record_and_operation() {
    let ctx = TestContext::new();
    let repaired = ctx
        .store
        .insert_member(1, "David Ek", MemberStatus::Active)
        .await;
    let removed = ctx
        .store
        .insert_member(2, "Eva Falk", MemberStatus::Pending)
        .await;
    ctx.store.grant_role(removed, Role::Admin).await;

    ctx.repair
        .fix(
            repaired,
            CheckType::MemberWithoutRole,
            RequestedFix::Member,
            None,
        )
        .await
        .unwrap();
    ctx.repair
        .fix(
            removed,
            CheckType::InconsistentMemberStatus,
            RequestedFix::RemoveRole,
            None,
        )
        .await
        .unwrap();

    let by_record = ctx
        .store
        .audit_trail(
            &AuditLogFilter {
                record_id: Some(repaired.into_inner()),
                ..Default::default()
            },
            50,
        )
        .await
        .unwrap();
    assert_eq!(by_record.len(), 1);
    assert_eq!(by_record[0].record_id, repaired.into_inner());

    let deletions = ctx
        .store
        .audit_trail(
            &AuditLogFilter {
                operation: Some(AuditOperation::Delete.to_string()),
                ..Default::default()
            },
            50,
        )
        .await
        .unwrap();
    assert_eq!(deletions.len(), 1);
    assert_eq!(deletions[0].record_id, removed.into_inner());
}

#[tokio::test]
async fn audit_trail_is_newest_first_and_bounded() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(1, "Filip Gran", MemberStatus::Active)
        .await;

    ctx.repair
        .fix(
            identity,
            CheckType::MemberWithoutRole,
            RequestedFix::Member,
            None,
        )
        .await
        .unwrap();
    ctx.repair
        .fix(
            identity,
            CheckType::InconsistentMemberStatus,
            RequestedFix::RemoveRole,
            None,
        )
        .await
        .unwrap();

    let all = ctx
        .store
        .audit_trail(&AuditLogFilter::default(), 50)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // The removal came last, so it leads the trail.
    assert_eq!(all[0].new_values["action"], "remove_role");
    assert!(all[0].created_at >= all[1].created_at);

    let bounded = ctx
        .store
        .audit_trail(&AuditLogFilter::default(), 1)
        .await
        .unwrap();
    assert_eq!(bounded.len(), 1);
    assert_eq!(bounded[0].new_values["action"], "remove_role");
}

#[tokio::test]
async fn no_entry_without_a_mutation() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(1, "Greta Holm", MemberStatus::Active)
        .await;
    ctx.store.grant_role(identity, Role::Member).await;

    // No-op repair: already satisfied.
    ctx.repair
        .fix(
            identity,
            CheckType::MemberWithoutRole,
            RequestedFix::Member,
            None,
        )
        .await
        .unwrap();
    assert_eq!(ctx.store.audit_count().await, 0);

    // Failed repair: rolled back together with the audit append.
    ctx.store.fail_replace_for(identity).await;
    let _ = ctx
        .repair
        .fix(
            identity,
            CheckType::MemberWithoutRole,
            RequestedFix::Admin,
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(ctx.store.audit_count().await, 0);
}
