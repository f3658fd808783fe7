//! Append-only audit trail model.
//!
//! Records every mutation the reconciliation engine performs, plus other
//! privileged mutations. Rows are inserted inside the same transaction as
//! the mutation they describe and are never updated or deleted; this
//! module intentionally exposes no update or delete function.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

/// Operation recorded by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditOperation::Create => write!(f, "create"),
            AuditOperation::Update => write!(f, "update"),
            AuditOperation::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for AuditOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(AuditOperation::Create),
            "update" => Ok(AuditOperation::Update),
            "delete" => Ok(AuditOperation::Delete),
            _ => Err(format!("Invalid audit operation: {s}")),
        }
    }
}

/// Severity of the audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSeverity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for AuditSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditSeverity::Info => write!(f, "info"),
            AuditSeverity::Warning => write!(f, "warning"),
            AuditSeverity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for AuditSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(AuditSeverity::Info),
            "warning" => Ok(AuditSeverity::Warning),
            "critical" => Ok(AuditSeverity::Critical),
            _ => Err(format!("Invalid audit severity: {s}")),
        }
    }
}

/// An audit trail row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique identifier.
    pub id: Uuid,
    /// The table the mutation touched.
    pub table_name: String,
    /// Operation type.
    pub operation: String,
    /// Primary key of the mutated record; for role repairs this is the
    /// identity whose role set changed.
    pub record_id: Uuid,
    /// Identity that requested the mutation, when known.
    pub actor_identity: Option<Uuid>,
    /// State before the mutation.
    pub old_values: Option<JsonValue>,
    /// State after the mutation.
    pub new_values: JsonValue,
    /// Severity of the action.
    pub severity: String,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// Input for appending an audit entry.
#[derive(Debug, Clone)]
pub struct NewAuditLogEntry {
    pub table_name: String,
    pub operation: AuditOperation,
    pub record_id: Uuid,
    pub actor_identity: Option<Uuid>,
    pub old_values: Option<JsonValue>,
    pub new_values: JsonValue,
    pub severity: AuditSeverity,
}

/// Filter options for querying the audit trail.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub record_id: Option<Uuid>,
    pub table_name: Option<String>,
    pub operation: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl AuditLogEntry {
    /// Get the operation as enum.
    #[must_use]
    pub fn operation_enum(&self) -> Option<AuditOperation> {
        self.operation.parse().ok()
    }

    /// Get the severity as enum.
    #[must_use]
    pub fn severity_enum(&self) -> Option<AuditSeverity> {
        self.severity.parse().ok()
    }

    /// Append a new audit entry.
    ///
    /// Callers recording a mutation must pass the same executor (the open
    /// transaction) that performs the mutation, so the entry commits or
    /// rolls back together with it.
    pub async fn create<'e, E>(executor: E, input: NewAuditLogEntry) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r"
            INSERT INTO audit_log
                (table_name, operation, record_id, actor_identity,
                 old_values, new_values, severity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, table_name, operation, record_id, actor_identity,
                      old_values, new_values, severity, created_at
            ",
        )
        .bind(input.table_name)
        .bind(input.operation.to_string())
        .bind(input.record_id)
        .bind(input.actor_identity)
        .bind(input.old_values)
        .bind(input.new_values)
        .bind(input.severity.to_string())
        .fetch_one(executor)
        .await
    }

    /// List audit entries with optional filters, newest first.
    pub async fn list<'e, E>(
        executor: E,
        filter: &AuditLogFilter,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let mut conditions = Vec::new();
        let mut param_idx = 1;

        if filter.record_id.is_some() {
            conditions.push(format!("record_id = ${param_idx}"));
            param_idx += 1;
        }

        if filter.table_name.is_some() {
            conditions.push(format!("table_name = ${param_idx}"));
            param_idx += 1;
        }

        if filter.operation.is_some() {
            conditions.push(format!("operation = ${param_idx}"));
            param_idx += 1;
        }

        if filter.start_date.is_some() {
            conditions.push(format!("created_at >= ${param_idx}"));
            param_idx += 1;
        }

        if filter.end_date.is_some() {
            conditions.push(format!("created_at <= ${param_idx}"));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            r"
            SELECT id, table_name, operation, record_id, actor_identity,
                   old_values, new_values, severity, created_at
            FROM audit_log
            {where_clause}
            ORDER BY created_at DESC
            LIMIT ${param_idx}
            "
        );

        let mut q = sqlx::query_as::<_, Self>(&query);

        if let Some(record_id) = filter.record_id {
            q = q.bind(record_id);
        }

        if let Some(table_name) = &filter.table_name {
            q = q.bind(table_name);
        }

        if let Some(operation) = &filter.operation {
            q = q.bind(operation);
        }

        if let Some(start_date) = filter.start_date {
            q = q.bind(start_date);
        }

        if let Some(end_date) = filter.end_date {
            q = q.bind(end_date);
        }

        q = q.bind(limit);

        q.fetch_all(executor).await
    }
}
