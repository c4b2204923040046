/// Lease model and database operations
///
/// A lease links one property and one tenant. Its status drives the owning
/// property's derived availability flag: the lease handlers force the
/// property to occupied when a lease becomes active and back to available
/// when it expires, is terminated, or an active lease is deleted.
///
/// Date ordering is not validated; an end date before the start date is
/// stored as submitted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Lifecycle state of a lease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "lease_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    /// Currently in force; the property reads occupied
    Active,

    /// Ran out at its end date
    Expired,

    /// Ended early
    Terminated,
}

impl LeaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaseStatus::Active => "active",
            LeaseStatus::Expired => "expired",
            LeaseStatus::Terminated => "terminated",
        }
    }

    /// Whether a lease in this state occupies its property
    pub fn is_active(&self) -> bool {
        matches!(self, LeaseStatus::Active)
    }
}

/// Lease agreement model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lease {
    pub id: Uuid,

    pub property_id: Uuid,

    pub tenant_id: Uuid,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    pub monthly_rent: Decimal,

    pub security_deposit: Option<Decimal>,

    pub terms_conditions: Option<String>,

    pub status: LeaseStatus,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a lease
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLease {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: Decimal,
    pub security_deposit: Option<Decimal>,
    pub terms_conditions: Option<String>,
    pub status: LeaseStatus,
}

/// Input for editing a lease (complete record)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLease {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: Decimal,
    pub security_deposit: Option<Decimal>,
    pub terms_conditions: Option<String>,
    pub status: LeaseStatus,
}

impl Lease {
    /// Creates a new lease
    pub async fn create(db: impl PgExecutor<'_>, data: CreateLease) -> Result<Self, sqlx::Error> {
        let lease = sqlx::query_as::<_, Lease>(
            r#"
            INSERT INTO leases (
                property_id, tenant_id, start_date, end_date, monthly_rent,
                security_deposit, terms_conditions, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, property_id, tenant_id, start_date, end_date, monthly_rent,
                      security_deposit, terms_conditions, status, created_at
            "#,
        )
        .bind(data.property_id)
        .bind(data.tenant_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.monthly_rent)
        .bind(data.security_deposit)
        .bind(data.terms_conditions)
        .bind(data.status)
        .fetch_one(db)
        .await?;

        Ok(lease)
    }

    /// Finds a lease by ID, returning None if absent
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let lease = sqlx::query_as::<_, Lease>(
            r#"
            SELECT id, property_id, tenant_id, start_date, end_date, monthly_rent,
                   security_deposit, terms_conditions, status, created_at
            FROM leases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(lease)
    }

    /// Lists every lease, newest first (admin scope)
    pub async fn list_all(db: impl PgExecutor<'_>) -> Result<Vec<Self>, sqlx::Error> {
        let leases = sqlx::query_as::<_, Lease>(
            r#"
            SELECT id, property_id, tenant_id, start_date, end_date, monthly_rent,
                   security_deposit, terms_conditions, status, created_at
            FROM leases
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(leases)
    }

    /// Lists leases on properties owned by one user, newest first
    pub async fn list_by_owner(
        db: impl PgExecutor<'_>,
        owner_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let leases = sqlx::query_as::<_, Lease>(
            r#"
            SELECT l.id, l.property_id, l.tenant_id, l.start_date, l.end_date,
                   l.monthly_rent, l.security_deposit, l.terms_conditions, l.status,
                   l.created_at
            FROM leases l
            JOIN properties p ON p.id = l.property_id
            WHERE p.owner_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;

        Ok(leases)
    }

    /// Rewrites the fields of a lease
    ///
    /// Availability synchronization belongs to the handler, which compares
    /// the old and new status around this call.
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateLease,
    ) -> Result<Option<Self>, sqlx::Error> {
        let lease = sqlx::query_as::<_, Lease>(
            r#"
            UPDATE leases
            SET property_id = $2, tenant_id = $3, start_date = $4, end_date = $5,
                monthly_rent = $6, security_deposit = $7, terms_conditions = $8, status = $9
            WHERE id = $1
            RETURNING id, property_id, tenant_id, start_date, end_date, monthly_rent,
                      security_deposit, terms_conditions, status, created_at
            "#,
        )
        .bind(id)
        .bind(data.property_id)
        .bind(data.tenant_id)
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.monthly_rent)
        .bind(data.security_deposit)
        .bind(data.terms_conditions)
        .bind(data.status)
        .fetch_optional(db)
        .await?;

        Ok(lease)
    }

    /// Deletes a lease by ID
    ///
    /// Cascades to the lease's payments at the database level.
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leases WHERE id = $1")
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
    fn test_lease_status_as_str() {
        assert_eq!(LeaseStatus::Active.as_str(), "active");
        assert_eq!(LeaseStatus::Expired.as_str(), "expired");
        assert_eq!(LeaseStatus::Terminated.as_str(), "terminated");
    }

    #[test]
    fn test_only_active_occupies() {
        assert!(LeaseStatus::Active.is_active());
        assert!(!LeaseStatus::Expired.is_active());
        assert!(!LeaseStatus::Terminated.is_active());
    }
}
