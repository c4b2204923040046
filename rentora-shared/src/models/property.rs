/// Property model and database operations
///
/// A property is the root of the ownership chain: every lease, payment, and
/// maintenance request resolves to exactly one property, and through it to
/// the owning user. Availability is a derived field kept in sync with lease
/// status by the lease handlers, not by a database constraint.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE properties (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     property_type VARCHAR(50) NOT NULL,
///     address VARCHAR(200) NOT NULL,
///     city VARCHAR(100) NOT NULL,
///     state VARCHAR(100) NOT NULL,
///     rent_amount NUMERIC(12, 2) NOT NULL,
///     availability_status availability_status NOT NULL DEFAULT 'available',
///     description TEXT,
///     bedrooms INTEGER,
///     bathrooms INTEGER,
///     area_sqft NUMERIC(10, 2),
///     image_path VARCHAR(200),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Whether a property can take a new lease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "availability_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    /// No active lease
    Available,

    /// Has an active lease
    Occupied,

    /// Taken off the market for repairs
    Maintenance,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Occupied => "occupied",
            AvailabilityStatus::Maintenance => "maintenance",
        }
    }
}

/// Property model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    /// Unique property ID
    pub id: Uuid,

    /// Owning user
    pub owner_id: Uuid,

    /// Free-form type label (apartment, house, ...)
    pub property_type: String,

    /// Street address
    pub address: String,

    pub city: String,

    pub state: String,

    /// Asking monthly rent
    pub rent_amount: Decimal,

    /// Derived from lease status; see the lease handlers
    pub availability_status: AvailabilityStatus,

    pub description: Option<String>,

    pub bedrooms: Option<i32>,

    pub bathrooms: Option<i32>,

    pub area_sqft: Option<Decimal>,

    /// Relative path of the stored image/document, if one was uploaded
    pub image_path: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProperty {
    pub owner_id: Uuid,
    pub property_type: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rent_amount: Decimal,
    pub availability_status: AvailabilityStatus,
    pub description: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: Option<Decimal>,
    pub image_path: Option<String>,
}

/// Input for editing a property
///
/// Every field is written; the edit form submits the complete record.
/// The stored image is updated separately via [`Property::set_image_path`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProperty {
    pub property_type: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub rent_amount: Decimal,
    pub availability_status: AvailabilityStatus,
    pub description: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_sqft: Option<Decimal>,
}

impl Property {
    /// Creates a new property
    pub async fn create(
        db: impl PgExecutor<'_>,
        data: CreateProperty,
    ) -> Result<Self, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                owner_id, property_type, address, city, state, rent_amount,
                availability_status, description, bedrooms, bathrooms, area_sqft, image_path
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, owner_id, property_type, address, city, state, rent_amount,
                      availability_status, description, bedrooms, bathrooms, area_sqft,
                      image_path, created_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.property_type)
        .bind(data.address)
        .bind(data.city)
        .bind(data.state)
        .bind(data.rent_amount)
        .bind(data.availability_status)
        .bind(data.description)
        .bind(data.bedrooms)
        .bind(data.bathrooms)
        .bind(data.area_sqft)
        .bind(data.image_path)
        .fetch_one(db)
        .await?;

        Ok(property)
    }

    /// Finds a property by ID, returning None if absent
    pub async fn find_by_id(
        db: impl PgExecutor<'_>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, owner_id, property_type, address, city, state, rent_amount,
                   availability_status, description, bedrooms, bathrooms, area_sqft,
                   image_path, created_at
            FROM properties
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;

        Ok(property)
    }

    /// Lists every property, newest first (admin scope)
    pub async fn list_all(db: impl PgExecutor<'_>) -> Result<Vec<Self>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, owner_id, property_type, address, city, state, rent_amount,
                   availability_status, description, bedrooms, bathrooms, area_sqft,
                   image_path, created_at
            FROM properties
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(properties)
    }

    /// Lists properties owned by one user, newest first
    pub async fn list_by_owner(
        db: impl PgExecutor<'_>,
        owner_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT id, owner_id, property_type, address, city, state, rent_amount,
                   availability_status, description, bedrooms, bathrooms, area_sqft,
                   image_path, created_at
            FROM properties
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;

        Ok(properties)
    }

    /// Rewrites the editable fields of a property
    ///
    /// Returns the updated row, or None if the property doesn't exist.
    pub async fn update(
        db: impl PgExecutor<'_>,
        id: Uuid,
        data: UpdateProperty,
    ) -> Result<Option<Self>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET property_type = $2, address = $3, city = $4, state = $5,
                rent_amount = $6, availability_status = $7, description = $8,
                bedrooms = $9, bathrooms = $10, area_sqft = $11
            WHERE id = $1
            RETURNING id, owner_id, property_type, address, city, state, rent_amount,
                      availability_status, description, bedrooms, bathrooms, area_sqft,
                      image_path, created_at
            "#,
        )
        .bind(id)
        .bind(data.property_type)
        .bind(data.address)
        .bind(data.city)
        .bind(data.state)
        .bind(data.rent_amount)
        .bind(data.availability_status)
        .bind(data.description)
        .bind(data.bedrooms)
        .bind(data.bathrooms)
        .bind(data.area_sqft)
        .fetch_optional(db)
        .await?;

        Ok(property)
    }

    /// Records the stored image path after an upload
    pub async fn set_image_path(
        db: impl PgExecutor<'_>,
        id: Uuid,
        image_path: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE properties SET image_path = $2 WHERE id = $1")
            .bind(id)
            .bind(image_path)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flips the derived availability flag
    ///
    /// Called by the lease handlers when a lease is created, edited, or
    /// deleted. Last write wins when a property carries more than one
    /// active lease.
    pub async fn set_availability(
        db: impl PgExecutor<'_>,
        id: Uuid,
        status: AvailabilityStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE properties SET availability_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a property by ID
    ///
    /// Cascades to its leases and their payments at the database level.
    /// The caller is responsible for removing the stored image file first.
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
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
    fn test_availability_as_str() {
        assert_eq!(AvailabilityStatus::Available.as_str(), "available");
        assert_eq!(AvailabilityStatus::Occupied.as_str(), "occupied");
        assert_eq!(AvailabilityStatus::Maintenance.as_str(), "maintenance");
    }

    #[test]
    fn test_availability_serde_roundtrip() {
        let json = serde_json::to_string(&AvailabilityStatus::Occupied).unwrap();
        assert_eq!(json, "\"occupied\"");
        let back: AvailabilityStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AvailabilityStatus::Occupied);
    }
}
