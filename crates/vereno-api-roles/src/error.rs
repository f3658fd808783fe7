//! Error types for the role reconciliation API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use vereno_roles::RolesError;

/// Error type for the role reconciliation API.
#[derive(Debug, thiserror::Error)]
pub enum ApiRolesError {
    /// Identity has no member record.
    #[error("No member record for that identity")]
    NotFound,

    /// Authentication required.
    #[error("Authentication required")]
    Unauthorized,

    /// Admin role required.
    #[error("Admin role required")]
    Forbidden,

    /// The role set changed between scan and fix.
    #[error("Role assignments changed concurrently")]
    Conflict,

    /// The check needs an explicit fix choice.
    #[error("Ambiguous fix: {0}")]
    AmbiguousFix(String),

    /// Malformed request (unknown check type, unknown fix, bad filter).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The underlying store failed.
    #[error("Store failure: {0}")]
    Store(String),
}

impl From<RolesError> for ApiRolesError {
    fn from(err: RolesError) -> Self {
        match err {
            RolesError::NotFound { .. } => ApiRolesError::NotFound,
            RolesError::Unauthorized => ApiRolesError::Forbidden,
            RolesError::Conflict { .. } => ApiRolesError::Conflict,
            RolesError::AmbiguousFix { check_type } => {
                ApiRolesError::AmbiguousFix(check_type.to_string())
            }
            RolesError::Store(msg) => ApiRolesError::Store(msg),
        }
    }
}

/// RFC 7807 Problem Details response format.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

fn problem(status: StatusCode, slug: &str, title: &str, detail: String) -> (StatusCode, ProblemDetails) {
    (
        status,
        ProblemDetails {
            problem_type: format!("https://vereno.app/problems/{slug}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: Some(detail),
        },
    )
}

impl IntoResponse for ApiRolesError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiRolesError::NotFound => problem(
                StatusCode::NOT_FOUND,
                "not-found",
                "Not Found",
                self.to_string(),
            ),
            ApiRolesError::Unauthorized => problem(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized",
                self.to_string(),
            ),
            ApiRolesError::Forbidden => problem(
                StatusCode::FORBIDDEN,
                "forbidden",
                "Forbidden",
                "Admin role required for this operation".to_string(),
            ),
            ApiRolesError::Conflict => problem(
                StatusCode::CONFLICT,
                "conflict",
                "Conflict",
                "Role assignments changed concurrently; re-scan and retry".to_string(),
            ),
            ApiRolesError::AmbiguousFix(_) => problem(
                StatusCode::UNPROCESSABLE_ENTITY,
                "ambiguous-fix",
                "Ambiguous Fix",
                self.to_string(),
            ),
            ApiRolesError::Validation(_) => problem(
                StatusCode::BAD_REQUEST,
                "validation-error",
                "Validation Error",
                self.to_string(),
            ),
            ApiRolesError::Store(msg) => {
                tracing::error!(error = %msg, "Store failure while serving request");
                problem(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store-failure",
                    "Internal Server Error",
                    "The underlying store rejected the operation".to_string(),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
