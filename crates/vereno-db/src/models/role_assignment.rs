//! Role assignment model.
//!
//! Maps an identity to a granted role. There is deliberately no
//! update-in-place: a role change deletes every row for the identity and
//! inserts the single new one, so a partial-role state is never
//! observable. The reconciliation engine is the only writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// A role assignment row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleAssignment {
    /// Unique identifier.
    pub id: Uuid,
    /// The identity holding the role.
    pub identity_id: Uuid,
    /// Granted role: `admin`, `collector` or `member`.
    pub role: String,
    /// When the role was granted.
    pub granted_at: DateTime<Utc>,
}

impl RoleAssignment {
    /// List role assignments for one identity.
    pub async fn list_for_identity<'e, E>(
        executor: E,
        identity_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, identity_id, role, granted_at
            FROM role_assignments
            WHERE identity_id = $1
            ORDER BY role
            ",
        )
        .bind(identity_id)
        .fetch_all(executor)
        .await
    }

    /// List role assignments for one identity, locking the rows.
    ///
    /// Must run inside a transaction. The `FOR UPDATE` lock serializes
    /// concurrent repairs of the same identity.
    pub async fn lock_for_identity<'e, E>(
        executor: E,
        identity_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, identity_id, role, granted_at
            FROM role_assignments
            WHERE identity_id = $1
            ORDER BY role
            FOR UPDATE
            ",
        )
        .bind(identity_id)
        .fetch_all(executor)
        .await
    }

    /// List every role assignment.
    pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, identity_id, role, granted_at
            FROM role_assignments
            ORDER BY identity_id, role
            ",
        )
        .fetch_all(executor)
        .await
    }

    /// Delete every role assignment for an identity, returning the count.
    pub async fn delete_for_identity<'e, E>(
        executor: E,
        identity_id: Uuid,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r"
            DELETE FROM role_assignments
            WHERE identity_id = $1
            ",
        )
        .bind(identity_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    /// Insert a single role assignment.
    pub async fn insert<'e, E>(
        executor: E,
        identity_id: Uuid,
        role: &str,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            INSERT INTO role_assignments (identity_id, role)
            VALUES ($1, $2)
            RETURNING id, identity_id, role, granted_at
            ",
        )
        .bind(identity_id)
        .bind(role)
        .fetch_one(executor)
        .await
    }
}
