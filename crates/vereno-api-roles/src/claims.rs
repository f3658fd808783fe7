//! Caller claims.
//!
//! Authentication is terminated by the deployment's gateway; by the time a
//! request reaches this router, a trusted middleware has translated the
//! session into [`AdminClaims`] in request extensions. This crate only
//! checks roles, never credentials.

use vereno_core::IdentityId;

/// Claims of the authenticated caller.
#[derive(Debug, Clone)]
pub struct AdminClaims {
    /// Subject: the caller's identity key as a string.
    pub sub: String,
    /// Roles granted to the caller.
    pub roles: Vec<String>,
}

impl AdminClaims {
    /// Create claims for a subject with roles.
    #[must_use]
    pub fn new(sub: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            sub: sub.into(),
            roles,
        }
    }

    /// Whether the caller holds a role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// The caller's identity key, when the subject is one.
    #[must_use]
    pub fn identity(&self) -> Option<IdentityId> {
        self.sub.parse().ok()
    }
}
