//! Admin role guard middleware.
//!
//! Every route of this API mutates or inspects role assignments, so the
//! whole router sits behind this guard.

use axum::{body::Body, extract::Request, middleware::Next, response::Response};

use crate::claims::AdminClaims;
use crate::error::ApiRolesError;

/// Required role for reconciliation operations.
pub const ADMIN_ROLE: &str = "admin";

/// Middleware requiring the caller to hold the `admin` role.
///
/// Expects a prior (gateway-owned) authentication middleware to have
/// inserted [`AdminClaims`] into request extensions.
///
/// # Errors
///
/// - `ApiRolesError::Unauthorized` (401): no claims in request extensions
/// - `ApiRolesError::Forbidden` (403): caller lacks the `admin` role
pub async fn admin_guard(request: Request<Body>, next: Next) -> Result<Response, ApiRolesError> {
    let claims = request
        .extensions()
        .get::<AdminClaims>()
        .ok_or(ApiRolesError::Unauthorized)?;

    if !claims.has_role(ADMIN_ROLE) {
        tracing::warn!(
            subject = %claims.sub,
            roles = ?claims.roles,
            "Access denied: admin role required"
        );
        return Err(ApiRolesError::Forbidden);
    }

    tracing::debug!(subject = %claims.sub, "Admin access granted");

    Ok(next.run(request).await)
}
