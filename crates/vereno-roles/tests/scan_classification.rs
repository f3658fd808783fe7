//! Integration tests for the validation scanner.
//!
//! Verifies the check classification table end to end: which member
//! states surface which issues, at which severity, and that consistent
//! identities stay silent.

mod common;

use vereno_core::IdentityId;
use vereno_db::models::MemberStatus;
use vereno_roles::{CheckType, IssueSeverity, Role, RolesError};

use common::TestContext;

#[tokio::test]
async fn empty_store_scans_clean() {
    let ctx = TestContext::new();
    let issues = ctx.scanner.scan().await.unwrap();
    assert!(issues.is_empty());
}

#[tokio::test]
async fn consistent_store_scans_clean() {
    let ctx = TestContext::new();

    let member = ctx
        .store
        .insert_member(1, "Alma Lindqvist", MemberStatus::Active)
        .await;
    ctx.store.grant_role(member, Role::Member).await;

    let admin = ctx
        .store
        .insert_member(2, "Bo Sandell", MemberStatus::Active)
        .await;
    ctx.store.grant_role(admin, Role::Admin).await;

    let collector = ctx
        .store
        .insert_member(3, "Cecilia Ahl", MemberStatus::Active)
        .await;
    ctx.store.grant_role(collector, Role::Collector).await;
    ctx.store.link_collector(collector, "District North").await;

    let issues = ctx.scanner.scan().await.unwrap();
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[tokio::test]
async fn multiple_roles_is_a_warning() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(1, "Alma Lindqvist", MemberStatus::Active)
        .await;
    ctx.store.grant_role(identity, Role::Admin).await;
    ctx.store.grant_role(identity, Role::Collector).await;

    let issues = ctx.scanner.scan().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].check_type(), CheckType::MultipleRolesAssigned);
    assert_eq!(issues[0].status, IssueSeverity::Warning);
    assert_eq!(issues[0].identity(), identity);
}

#[tokio::test]
async fn active_member_without_role_is_critical() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(1, "Bo Sandell", MemberStatus::Active)
        .await;

    let issues = ctx.scanner.scan().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].check_type(), CheckType::MemberWithoutRole);
    assert_eq!(issues[0].status, IssueSeverity::Critical);
    assert_eq!(issues[0].identity(), identity);
}

#[tokio::test]
async fn pending_member_without_role_is_not_an_issue() {
    let ctx = TestContext::new();
    ctx.store
        .insert_member(1, "Cecilia Ahl", MemberStatus::Pending)
        .await;

    let issues = ctx.scanner.scan().await.unwrap();
    assert!(issues.is_empty());
}

#[tokio::test]
async fn collector_link_without_role_is_critical() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(7, "David Ek", MemberStatus::Active)
        .await;
    ctx.store.grant_role(identity, Role::Member).await;
    ctx.store.link_collector(identity, "District South").await;

    let issues = ctx.scanner.scan().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].check_type(), CheckType::CollectorMissingRole);
    assert_eq!(issues[0].status, IssueSeverity::Critical);
}

#[tokio::test]
async fn inactive_collector_link_is_ignored() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(7, "David Ek", MemberStatus::Active)
        .await;
    ctx.store.grant_role(identity, Role::Member).await;
    ctx.store.link_collector(identity, "District South").await;
    ctx.store.deactivate_collector(identity).await;

    let issues = ctx.scanner.scan().await.unwrap();
    assert!(issues.is_empty());
}

#[tokio::test]
async fn pending_member_with_privileged_role_is_inconsistent() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(4, "Eva Falk", MemberStatus::Pending)
        .await;
    ctx.store.grant_role(identity, Role::Collector).await;

    let issues = ctx.scanner.scan().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].check_type(), CheckType::InconsistentMemberStatus);
    assert_eq!(issues[0].status, IssueSeverity::Warning);
}

#[tokio::test]
async fn one_identity_can_surface_several_issues() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(5, "Filip Gran", MemberStatus::Active)
        .await;
    ctx.store.grant_role(identity, Role::Admin).await;
    ctx.store.grant_role(identity, Role::Member).await;
    ctx.store.link_collector(identity, "District East").await;

    let mut checks: Vec<CheckType> = ctx
        .scanner
        .scan()
        .await
        .unwrap()
        .iter()
        .map(vereno_roles::ValidationIssue::check_type)
        .collect();
    checks.sort_by_key(CheckType::as_str);

    assert_eq!(
        checks,
        vec![
            CheckType::CollectorMissingRole,
            CheckType::MultipleRolesAssigned,
        ]
    );
}

#[tokio::test]
async fn check_identity_reports_good_for_consistent_member() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(9, "Greta Holm", MemberStatus::Active)
        .await;
    ctx.store.grant_role(identity, Role::Member).await;

    let report = ctx.scanner.check_identity(identity).await.unwrap();
    assert_eq!(report.status, IssueSeverity::Good);
    assert_eq!(report.effective_role, Some(Role::Member));
    assert!(report.issues.is_empty());
}

#[tokio::test]
async fn check_identity_reports_worst_severity_and_effective_role() {
    let ctx = TestContext::new();
    let identity = ctx
        .store
        .insert_member(9, "Greta Holm", MemberStatus::Active)
        .await;
    ctx.store.grant_role(identity, Role::Admin).await;
    ctx.store.grant_role(identity, Role::Member).await;
    ctx.store.link_collector(identity, "District West").await;

    let report = ctx.scanner.check_identity(identity).await.unwrap();
    // Multiple roles is only a warning, but the missing collector role is
    // critical; the report carries the worst.
    assert_eq!(report.status, IssueSeverity::Critical);
    assert_eq!(report.effective_role, Some(Role::Admin));
    assert_eq!(report.issues.len(), 2);
}

#[tokio::test]
async fn check_identity_for_unknown_identity_is_not_found() {
    let ctx = TestContext::new();
    let err = ctx
        .scanner
        .check_identity(IdentityId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RolesError::NotFound { .. }));
}
