//! Integration tests for the role reconciliation API.
//!
//! Drives the router over the in-memory store, exactly as the admin UI
//! would: guard behavior, the four engine operations, and the audit query.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::{Extension, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use vereno_api_roles::{roles_router, AdminClaims, RolesState};
use vereno_db::models::MemberStatus;
use vereno_roles::store::InMemoryReconcileStore;
use vereno_roles::Role;

struct TestApp {
    store: Arc<InMemoryReconcileStore>,
    router: Router,
}

fn admin_claims() -> AdminClaims {
    AdminClaims::new(uuid::Uuid::new_v4().to_string(), vec!["admin".to_string()])
}

fn app_with_claims(claims: Option<AdminClaims>) -> TestApp {
    let store = Arc::new(InMemoryReconcileStore::new());
    let mut router = roles_router(RolesState::new(store.clone()));
    if let Some(claims) = claims {
        router = router.layer(Extension(claims));
    }
    TestApp { store, router }
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn requests_without_claims_are_unauthorized() {
    let app = app_with_claims(None);
    let (status, body) = get(app.router, "/roles/validate").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["title"], "Unauthorized");
}

#[tokio::test]
async fn non_admin_callers_are_forbidden() {
    let claims = AdminClaims::new("someone", vec!["member".to_string()]);
    let app = app_with_claims(Some(claims));
    let (status, body) = get(app.router, "/roles/validate").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["title"], "Forbidden");
}

#[tokio::test]
async fn validate_returns_detected_issues() {
    let app = app_with_claims(Some(admin_claims()));
    let identity = app
        .store
        .insert_member(42, "Alma Lindqvist", MemberStatus::Active)
        .await;

    let (status, body) = get(app.router, "/roles/validate").await;
    assert_eq!(status, StatusCode::OK);

    let issues = body.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["check_type"], "Member Without Role");
    assert_eq!(issues[0]["status"], "Critical");
    assert_eq!(issues[0]["identity"], identity.to_string());
    assert_eq!(issues[0]["member_number"], 42);
}

#[tokio::test]
async fn fix_repairs_one_issue_and_reports_the_outcome() {
    let app = app_with_claims(Some(admin_claims()));
    let identity = app
        .store
        .insert_member(1, "Bo Sandell", MemberStatus::Active)
        .await;

    let (status, body) = post(
        app.router,
        "/roles/fix",
        json!({
            "identity": identity.to_string(),
            "check_type": "Member Without Role",
            "fix": "member",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);
    assert_eq!(body["new_role"], "member");
    assert!(body["audit_id"].is_string());
    assert_eq!(app.store.role_set(identity).await, vec![Role::Member]);
}

#[tokio::test]
async fn fix_with_unknown_check_type_is_a_validation_error() {
    let app = app_with_claims(Some(admin_claims()));

    let (status, body) = post(
        app.router,
        "/roles/fix",
        json!({
            "identity": uuid::Uuid::new_v4().to_string(),
            "check_type": "Strange Check",
            "fix": "member",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Validation Error");
}

#[tokio::test]
async fn fix_for_unknown_identity_is_not_found() {
    let app = app_with_claims(Some(admin_claims()));

    let (status, _) = post(
        app.router,
        "/roles/fix",
        json!({
            "identity": uuid::Uuid::new_v4().to_string(),
            "check_type": "Member Without Role",
            "fix": "member",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fix_all_reports_aggregate_counts() {
    let app = app_with_claims(Some(admin_claims()));
    app.store
        .insert_member(1, "Cecilia Ahl", MemberStatus::Active)
        .await;
    let tangled = app
        .store
        .insert_member(2, "David Ek", MemberStatus::Active)
        .await;
    app.store.grant_role(tangled, Role::Admin).await;
    app.store.grant_role(tangled, Role::Member).await;

    let (status, body) = post(app.router, "/roles/fix-all", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["failed_count"], 1);
    assert_eq!(body["failures"][0]["check_type"], "Multiple Roles Assigned");
}

#[tokio::test]
async fn collector_sync_grants_missing_roles() {
    let app = app_with_claims(Some(admin_claims()));
    let identity = app
        .store
        .insert_member(3, "Eva Falk", MemberStatus::Active)
        .await;
    app.store.link_collector(identity, "District North").await;

    let (status, body) = post(app.router, "/roles/collectors/sync", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success_count"], 1);
    assert_eq!(body["failed_count"], 0);
    assert_eq!(app.store.role_set(identity).await, vec![Role::Collector]);
}

#[tokio::test]
async fn audit_endpoint_returns_repair_history() {
    let app = app_with_claims(Some(admin_claims()));
    let identity = app
        .store
        .insert_member(4, "Filip Gran", MemberStatus::Active)
        .await;

    let router = app.router.clone();
    let (status, _) = post(
        router,
        "/roles/fix",
        json!({
            "identity": identity.to_string(),
            "check_type": "Member Without Role",
            "fix": "member",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/roles/audit?record_id={identity}");
    let (status, body) = get(app.router, &uri).await;
    assert_eq!(status, StatusCode::OK);

    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["table_name"], "role_assignments");
    assert_eq!(entries[0]["record_id"], identity.to_string());
    assert_eq!(entries[0]["new_values"]["action"], "role_change");
}

#[tokio::test]
async fn audit_endpoint_rejects_unknown_operation() {
    let app = app_with_claims(Some(admin_claims()));
    let (status, body) = get(app.router, "/roles/audit?operation=truncate").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["title"], "Validation Error");
}

#[tokio::test]
async fn effective_endpoint_reports_identity_consistency() {
    let app = app_with_claims(Some(admin_claims()));
    let identity = app
        .store
        .insert_member(5, "Greta Holm", MemberStatus::Active)
        .await;
    app.store.grant_role(identity, Role::Admin).await;
    app.store.grant_role(identity, Role::Member).await;

    let uri = format!("/roles/effective/{identity}");
    let (status, body) = get(app.router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["effective_role"], "admin");
    assert_eq!(body["status"], "Warning");
    assert_eq!(body["roles"], json!(["admin", "member"]));

    let unknown = format!("/roles/effective/{}", uuid::Uuid::new_v4());
    let app = app_with_claims(Some(admin_claims()));
    let (status, _) = get(app.router, &unknown).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
