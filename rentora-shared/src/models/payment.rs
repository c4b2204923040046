/// Payment model and database operations
///
/// Payments are informational records against a lease: nothing recomputes
/// lease or property state when a payment changes.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Settlement state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

/// Payment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,

    pub lease_id: Uuid,

    pub amount: Decimal,

    pub due_date: Option<NaiveDate>,

    pub paid_date: Option<NaiveDate>,

    pub payment_method: Option<String>,

    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,
}

/// Input for recording a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    pub lease_id: Uuid,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
}

/// Input for editing a payment (complete record)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePayment {
    pub lease_id: Uuid,
    pub amount: Decimal,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
}

impl Payment {
    /// Records a new payment
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreatePayment,
    ) -> Result<Self, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (lease_id, amount, due_date, paid_date, payment_method, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, lease_id, amount, due_date, paid_date, payment_method, status, created_at
            "#,
        )
        .bind(data.lease_id)
        .bind(data.amount)
        .bind(data.due_date)
        .bind(data.paid_date)
        .bind(data.payment_method)
        .bind(data.status)
        .fetch_one(db)
        .await?;

        Ok(payment)
    }

    /// Finds a payment by ID, returning None if absent
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, lease_id, amount, due_date, paid_date, payment_method, status, created_at
            FROM payments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(payment)
    }

    /// Lists every payment, newest first (admin scope)
    pub async fn list_all(db: impl PgExecutor<'_>) -> Result<Vec<Self>, sqlx::Error> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, lease_id, amount, due_date, paid_date, payment_method, status, created_at
            FROM payments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(payments)
    }

    /// Lists payments under one owner's properties, newest first
    ///
    /// Ownership reaches a payment through its lease's property.
    pub async fn list_by_owner(
        db: impl PgExecutor<'_>,
        owner_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT pay.id, pay.lease_id, pay.amount, pay.due_date, pay.paid_date,
                   pay.payment_method, pay.status, pay.created_at
            FROM payments pay
            JOIN leases l ON l.id = pay.lease_id
            JOIN properties p ON p.id = l.property_id
            WHERE p.owner_id = $1
            ORDER BY pay.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;

        Ok(payments)
    }

    /// Rewrites the fields of a payment
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdatePayment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET lease_id = $2, amount = $3, due_date = $4, paid_date = $5,
                payment_method = $6, status = $7
            WHERE id = $1
            RETURNING id, lease_id, amount, due_date, paid_date, payment_method, status, created_at
            "#,
        )
        .bind(id)
        .bind(data.lease_id)
        .bind(data.amount)
        .bind(data.due_date)
        .bind(data.paid_date)
        .bind(data.payment_method)
        .bind(data.status)
        .fetch_optional(db)
        .await?;

        Ok(payment)
    }

    /// Deletes a payment by ID
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
