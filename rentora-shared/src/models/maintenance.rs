/// Maintenance request model and database operations
///
/// A maintenance request links one property and one tenant, with an optional
/// assigned staff user. The resolved timestamp is written exactly once, on
/// the transition into resolved; leaving resolved does not clear it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Urgency of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "maintenance_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MaintenancePriority {
    Low,
    Medium,
    High,
}

impl MaintenancePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenancePriority::Low => "low",
            MaintenancePriority::Medium => "medium",
            MaintenancePriority::High => "high",
        }
    }
}

/// Progress state of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "maintenance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pending,
    InProgress,
    Resolved,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "pending",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Resolved => "resolved",
        }
    }
}

/// Maintenance request model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MaintenanceRequest {
    pub id: Uuid,

    pub property_id: Uuid,

    pub tenant_id: Uuid,

    /// Staff user assigned to the job, if any
    ///
    /// Only checked for well-formedness, not for the user existing as staff.
    pub assigned_staff_id: Option<Uuid>,

    pub request_type: String,

    pub description: String,

    pub priority: MaintenancePriority,

    pub status: MaintenanceStatus,

    pub created_at: DateTime<Utc>,

    /// Stamped on the first transition into resolved, never cleared
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Input for creating a maintenance request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMaintenanceRequest {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub assigned_staff_id: Option<Uuid>,
    pub request_type: String,
    pub description: String,
    pub priority: MaintenancePriority,
    pub status: MaintenanceStatus,
}

/// Input for editing a maintenance request (complete record)
///
/// The resolved timestamp is not part of the form; the handler stamps it via
/// [`MaintenanceRequest::mark_resolved`] when the status change warrants it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMaintenanceRequest {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub assigned_staff_id: Option<Uuid>,
    pub request_type: String,
    pub description: String,
    pub priority: MaintenancePriority,
    pub status: MaintenanceStatus,
}

impl MaintenanceRequest {
    /// Creates a new maintenance request
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreateMaintenanceRequest,
    ) -> Result<Self, sqlx::Error> {
        let request = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            INSERT INTO maintenance_requests (
                property_id, tenant_id, assigned_staff_id, request_type,
                description, priority, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, property_id, tenant_id, assigned_staff_id, request_type,
                      description, priority, status, created_at, resolved_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.tenant_id)
        .bind(data.assigned_staff_id)
        .bind(data.request_type)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.status)
        .fetch_one(db)
        .await?;

        Ok(request)
    }

    /// Finds a request by ID, returning None if absent
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let request = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT id, property_id, tenant_id, assigned_staff_id, request_type,
                   description, priority, status, created_at, resolved_at
            FROM maintenance_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(request)
    }

    /// Lists every request, newest first (admin scope)
    pub async fn list_all(db: impl PgExecutor<'_>) -> Result<Vec<Self>, sqlx::Error> {
        let requests = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT id, property_id, tenant_id, assigned_staff_id, request_type,
                   description, priority, status, created_at, resolved_at
            FROM maintenance_requests
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(requests)
    }

    /// Lists requests on one owner's properties, newest first
    pub async fn list_by_owner(
        db: impl PgExecutor<'_>,
        owner_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let requests = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT m.id, m.property_id, m.tenant_id, m.assigned_staff_id, m.request_type,
                   m.description, m.priority, m.status, m.created_at, m.resolved_at
            FROM maintenance_requests m
            JOIN properties p ON p.id = m.property_id
            WHERE p.owner_id = $1
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;

        Ok(requests)
    }

    /// Rewrites the form fields of a request
    ///
    /// Leaves resolved_at untouched; see [`MaintenanceRequest::mark_resolved`].
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateMaintenanceRequest,
    ) -> Result<Option<Self>, sqlx::Error> {
        let request = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            UPDATE maintenance_requests
            SET property_id = $2, tenant_id = $3, assigned_staff_id = $4,
                request_type = $5, description = $6, priority = $7, status = $8
            WHERE id = $1
            RETURNING id, property_id, tenant_id, assigned_staff_id, request_type,
                      description, priority, status, created_at, resolved_at
            "#,
        )
        .bind(id)
        .bind(data.property_id)
        .bind(data.tenant_id)
        .bind(data.assigned_staff_id)
        .bind(data.request_type)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.status)
        .fetch_optional(db)
        .await?;

        Ok(request)
    }

    /// Stamps the resolved timestamp, once
    ///
    /// The guard on resolved_at makes re-resolving a no-op: the first stamp
    /// survives.
    pub async fn mark_resolved(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE maintenance_requests SET resolved_at = NOW() WHERE id = $1 AND resolved_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a request by ID
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(MaintenanceStatus::Pending.as_str(), "pending");
        assert_eq!(MaintenanceStatus::InProgress.as_str(), "in_progress");
        assert_eq!(MaintenanceStatus::Resolved.as_str(), "resolved");
    }

    #[test]
    fn test_priority_serde_uses_lowercase() {
        let json = serde_json::to_string(&MaintenancePriority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
