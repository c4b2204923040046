/// Tenant profile model and database operations
///
/// A tenant profile is 1:1 with a user account (role=tenant for accounts
/// created through the tenant-add flow). Contact fields live on the user;
/// the profile carries the rental-specific details. Leases cascade-delete
/// with the profile, but deletion is refused while an active lease exists.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Tenant profile linked to a user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tenant {
    /// Unique tenant ID
    pub id: Uuid,

    /// Linked user account (unique: one profile per user)
    pub user_id: Uuid,

    /// Government-issued identifier
    pub national_id: String,

    pub emergency_contact: Option<String>,

    pub occupation: Option<String>,

    pub move_in_date: Option<NaiveDate>,
}

/// Input for creating a tenant profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub user_id: Uuid,
    pub national_id: String,
    pub emergency_contact: Option<String>,
    pub occupation: Option<String>,
    pub move_in_date: Option<NaiveDate>,
}

/// Input for editing a tenant profile (complete record)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTenant {
    pub national_id: String,
    pub emergency_contact: Option<String>,
    pub occupation: Option<String>,
    pub move_in_date: Option<NaiveDate>,
}

impl Tenant {
    /// Creates a tenant profile for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the user already has a profile (unique
    /// constraint on user_id) or the database is unreachable.
    pub async fn create(db: impl PgExecutor<'_>, data: CreateTenant) -> Result<Self, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (user_id, national_id, emergency_contact, occupation, move_in_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, national_id, emergency_contact, occupation, move_in_date
            "#,
        )
        .bind(data.user_id)
        .bind(data.national_id)
        .bind(data.emergency_contact)
        .bind(data.occupation)
        .bind(data.move_in_date)
        .fetch_one(db)
        .await?;

        Ok(tenant)
    }

    /// Finds a tenant by ID, returning None if absent
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, user_id, national_id, emergency_contact, occupation, move_in_date
            FROM tenants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(tenant)
    }

    /// Finds the profile belonging to a user account, if any
    ///
    /// The tenant-add flow uses this to refuse turning the same user into a
    /// tenant twice.
    pub async fn find_by_user(
        db: impl PgExecutor<'_>,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, user_id, national_id, emergency_contact, occupation, move_in_date
            FROM tenants
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(tenant)
    }

    /// Lists all tenant profiles
    ///
    /// Tenant listings are not scoped by ownership: owners pick from the
    /// full tenant pool when creating leases.
    pub async fn list(db: impl PgExecutor<'_>) -> Result<Vec<Self>, sqlx::Error> {
        let tenants = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT id, user_id, national_id, emergency_contact, occupation, move_in_date
            FROM tenants
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(tenants)
    }

    /// Rewrites the profile fields of a tenant
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateTenant,
    ) -> Result<Option<Self>, sqlx::Error> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET national_id = $2, emergency_contact = $3, occupation = $4, move_in_date = $5
            WHERE id = $1
            RETURNING id, user_id, national_id, emergency_contact, occupation, move_in_date
            "#,
        )
        .bind(id)
        .bind(data.national_id)
        .bind(data.emergency_contact)
        .bind(data.occupation)
        .bind(data.move_in_date)
        .fetch_optional(db)
        .await?;

        Ok(tenant)
    }

    /// Whether any lease with status=active references this tenant
    ///
    /// Deletion is refused while this is true.
    pub async fn has_active_lease(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM leases WHERE tenant_id = $1 AND status = 'active')",
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(exists)
    }

    /// Deletes a tenant profile by ID
    ///
    /// Cascades to the tenant's leases and their payments at the database
    /// level. Callers must check [`Tenant::has_active_lease`] first.
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
