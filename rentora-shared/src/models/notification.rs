/// Notification model and database operations
///
/// Per-user notification rows with a one-way read flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Notification model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,

    pub user_id: Uuid,

    /// Free-form category label (lease_expiry, payment_due, ...)
    pub notification_type: String,

    pub message: String,

    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub notification_type: String,
    pub message: String,
}

impl Notification {
    /// Creates a notification for a user
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreateNotification,
    ) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, notification_type, message)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, notification_type, message, is_read, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.notification_type)
        .bind(data.message)
        .fetch_one(db)
        .await?;

        Ok(notification)
    }

    /// Finds a notification by ID, returning None if absent
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, notification_type, message, is_read, created_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(notification)
    }

    /// Lists one user's notifications, newest first
    pub async fn list_by_user(
        db: impl PgExecutor<'_>,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, notification_type, message, is_read, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(notifications)
    }

    /// Marks a notification as read
    pub async fn mark_read(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
