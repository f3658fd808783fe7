//! Collector linkage model.
//!
//! Declares that an identity additionally acts as a collector for a
//! district. Owned by the collector-management flows; the reconciliation
//! engine reads active links to decide whether a `collector` role is
//! required, and never writes this table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// A collector link row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CollectorLink {
    /// Unique identifier.
    pub id: Uuid,
    /// The identity acting as collector.
    pub identity_id: Uuid,
    /// Display name of the collector assignment (district, ward).
    pub collector_name: String,
    /// Whether the link is currently in force.
    pub is_active: bool,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
}

impl CollectorLink {
    /// List all active collector links.
    pub async fn list_active<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, identity_id, collector_name, is_active, created_at
            FROM collector_links
            WHERE is_active
            ORDER BY collector_name
            ",
        )
        .fetch_all(executor)
        .await
    }

    /// Get the active collector link for an identity, if any.
    pub async fn get_active_for_identity<'e, E>(
        executor: E,
        identity_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, identity_id, collector_name, is_active, created_at
            FROM collector_links
            WHERE identity_id = $1 AND is_active
            LIMIT 1
            ",
        )
        .bind(identity_id)
        .fetch_optional(executor)
        .await
    }
}
