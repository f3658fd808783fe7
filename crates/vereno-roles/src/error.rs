//! Error types for the reconciliation engine.

use thiserror::Error;
use vereno_core::IdentityId;

use crate::types::CheckType;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, RolesError>;

/// Errors raised by the reconciliation engine.
#[derive(Debug, Error)]
pub enum RolesError {
    /// The identity has no member record.
    #[error("No member record for identity {identity}")]
    NotFound {
        /// The unknown identity.
        identity: IdentityId,
    },

    /// The caller is not permitted to perform repairs.
    ///
    /// Raised at the API boundary; authentication itself is owned by the
    /// external auth layer.
    #[error("Caller is not permitted to repair role assignments")]
    Unauthorized,

    /// The identity's role set changed between observation and repair.
    ///
    /// The repair was rolled back; re-scan and retry.
    #[error("Role assignments for identity {identity} changed concurrently")]
    Conflict {
        /// The contended identity.
        identity: IdentityId,
    },

    /// The check has no safe automatic fix.
    ///
    /// Bulk mode skips such items and reports them for manual resolution;
    /// it never guesses which role to keep.
    #[error("{check_type} requires an explicit fix choice")]
    AmbiguousFix {
        /// The check that cannot be auto-repaired.
        check_type: CheckType,
    },

    /// The underlying store aborted the operation.
    #[error("Store failure: {0}")]
    Store(String),
}

impl RolesError {
    /// Check if this error is the ambiguous-fix skip.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, RolesError::AmbiguousFix { .. })
    }

    /// Check if this error is a concurrent-mutation conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, RolesError::Conflict { .. })
    }
}

impl From<sqlx::Error> for RolesError {
    fn from(err: sqlx::Error) -> Self {
        RolesError::Store(err.to_string())
    }
}
