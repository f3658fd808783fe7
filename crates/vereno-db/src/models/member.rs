//! Member registry model.
//!
//! Canonical record of a person in the association. Created on
//! registration; status and identity link are mutated by admin flows. The
//! reconciliation engine only reads members; deletion is a separate
//! archival flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// Membership status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Paid-up, participating member.
    Active,
    /// Registered but not yet confirmed (unpaid first fee, unverified).
    Pending,
    /// Anything else: resigned, honorary, parked by an admin.
    Other,
}

impl std::fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberStatus::Active => write!(f, "active"),
            MemberStatus::Pending => write!(f, "pending"),
            MemberStatus::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(MemberStatus::Active),
            "pending" => Ok(MemberStatus::Pending),
            "other" => Ok(MemberStatus::Other),
            _ => Err(format!("Invalid member status: {s}")),
        }
    }
}

/// A member registry row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    /// Unique identifier.
    pub id: Uuid,
    /// Linked authenticated identity, if any.
    pub identity_id: Option<Uuid>,
    /// Human-facing member number.
    pub member_number: i32,
    /// Full name.
    pub full_name: String,
    /// Membership status.
    pub status: String,
    /// When the member was registered.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Get the status as enum.
    #[must_use]
    pub fn status_enum(&self) -> Option<MemberStatus> {
        self.status.parse().ok()
    }

    /// Get the member linked to an identity.
    pub async fn get_by_identity<'e, E>(
        executor: E,
        identity_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, identity_id, member_number, full_name, status, created_at, updated_at
            FROM members
            WHERE identity_id = $1
            ",
        )
        .bind(identity_id)
        .fetch_optional(executor)
        .await
    }

    /// List all members with a linked identity.
    ///
    /// This is the population the validation scanner iterates; members
    /// without an identity cannot hold role assignments.
    pub async fn list_linked<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, identity_id, member_number, full_name, status, created_at, updated_at
            FROM members
            WHERE identity_id IS NOT NULL
            ORDER BY member_number
            ",
        )
        .fetch_all(executor)
        .await
    }
}
