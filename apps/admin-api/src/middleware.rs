//! Trusted-gateway claims extraction.
//!
//! This service runs behind the association's authenticating gateway,
//! which terminates sessions and forwards the caller's subject and roles
//! in headers. This middleware translates those headers into
//! [`AdminClaims`] for the role guard; requests arriving without the
//! headers simply carry no claims and fail the guard downstream.

use axum::{body::Body, extract::Request, http::HeaderMap, middleware::Next, response::Response};

use vereno_api_roles::AdminClaims;

/// Header carrying the authenticated subject.
pub const SUBJECT_HEADER: &str = "x-vereno-sub";

/// Header carrying the caller's comma-separated roles.
pub const ROLES_HEADER: &str = "x-vereno-roles";

/// Insert [`AdminClaims`] from the gateway headers, when present.
pub async fn gateway_claims(mut request: Request<Body>, next: Next) -> Response {
    if let Some(claims) = claims_from_headers(request.headers()) {
        request.extensions_mut().insert(claims);
    }
    next.run(request).await
}

fn claims_from_headers(headers: &HeaderMap) -> Option<AdminClaims> {
    let sub = headers.get(SUBJECT_HEADER)?.to_str().ok()?.to_string();
    let roles = headers
        .get(ROLES_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(|role| role.trim().to_string())
                .filter(|role| !role.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Some(AdminClaims::new(sub, roles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_claims_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("someone"));
        headers.insert(ROLES_HEADER, HeaderValue::from_static("admin, collector"));

        let claims = claims_from_headers(&headers).unwrap();
        assert_eq!(claims.sub, "someone");
        assert!(claims.has_role("admin"));
        assert!(claims.has_role("collector"));
        assert!(!claims.has_role("member"));
    }

    #[test]
    fn test_no_subject_means_no_claims() {
        let mut headers = HeaderMap::new();
        headers.insert(ROLES_HEADER, HeaderValue::from_static("admin"));
        assert!(claims_from_headers(&headers).is_none());
    }

    #[test]
    fn test_missing_roles_header_means_empty_roles() {
        let mut headers = HeaderMap::new();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("someone"));
        let claims = claims_from_headers(&headers).unwrap();
        assert!(claims.roles.is_empty());
    }
}
