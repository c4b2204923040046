/// Lease CRUD endpoints
///
/// # Endpoints
///
/// - `GET    /v1/leases` - List visible leases
/// - `POST   /v1/leases` - Add a lease
/// - `GET    /v1/leases/:id` - View a lease
/// - `PUT    /v1/leases/:id` - Edit a lease
/// - `DELETE /v1/leases/:id` - Delete a lease
///
/// Lease status drives the property's derived availability flag:
///
/// - create with status=active → property forced to occupied
/// - edit changing status: active → occupied; expired/terminated → available
/// - delete of an active lease → property back to available
///
/// The lease write and the availability write share one transaction. With
/// more than one active lease on a property the last write wins. Date
/// ranges are not validated for ordering.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Form, Json,
};
use chrono::NaiveDate;
use rentora_shared::{
    auth::{
        authorization::{require_access, ResourceRef},
        middleware::AuthContext,
    },
    models::{
        lease::{CreateLease, Lease, LeaseStatus, UpdateLease},
        property::{AvailabilityStatus, Property},
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Add/Edit lease request (the form submits the complete record)
#[derive(Debug, Deserialize)]
pub struct LeaseRequest {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: Decimal,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub security_deposit: Option<Decimal>,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub terms_conditions: Option<String>,

    #[serde(default = "default_status")]
    pub status: LeaseStatus,
}

fn default_status() -> LeaseStatus {
    LeaseStatus::Active
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteLeaseResponse {
    pub deleted: bool,
}

/// Availability implied by a lease status, if the status implies one
fn availability_after(status: LeaseStatus) -> Option<AvailabilityStatus> {
    match status {
        LeaseStatus::Active => Some(AvailabilityStatus::Occupied),
        LeaseStatus::Expired | LeaseStatus::Terminated => Some(AvailabilityStatus::Available),
    }
}

/// List visible leases
pub async fn list_leases(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Lease>>> {
    let leases = if auth.is_admin() {
        Lease::list_all(&state.db).await?
    } else {
        Lease::list_by_owner(&state.db, auth.user_id).await?
    };

    Ok(Json(leases))
}

/// Add a lease
///
/// The actor must have access to the referenced property. An active lease
/// marks the property occupied in the same transaction.
pub async fn add_lease(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(req): Form<LeaseRequest>,
) -> ApiResult<Json<Lease>> {
    require_access(&state.db, &auth, ResourceRef::Property(req.property_id)).await?;

    let mut tx = state.db.begin().await?;

    let lease = Lease::create(
        &mut *tx,
        CreateLease {
            property_id: req.property_id,
            tenant_id: req.tenant_id,
            start_date: req.start_date,
            end_date: req.end_date,
            monthly_rent: req.monthly_rent,
            security_deposit: req.security_deposit,
            terms_conditions: req.terms_conditions,
            status: req.status,
        },
    )
    .await?;

    if lease.status.is_active() {
        Property::set_availability(&mut *tx, lease.property_id, AvailabilityStatus::Occupied)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(lease_id = %lease.id, property_id = %lease.property_id, "Lease created");

    Ok(Json(lease))
}

/// View a lease
pub async fn view_lease(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Lease>> {
    require_access(&state.db, &auth, ResourceRef::Lease(id)).await?;

    let lease = Lease::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lease not found".to_string()))?;

    Ok(Json(lease))
}

/// Edit a lease
///
/// A status change recomputes the property's availability; an unchanged
/// status leaves it alone.
pub async fn edit_lease(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Form(req): Form<LeaseRequest>,
) -> ApiResult<Json<Lease>> {
    require_access(&state.db, &auth, ResourceRef::Lease(id)).await?;

    let existing = Lease::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lease not found".to_string()))?;
    let old_status = existing.status;

    let mut tx = state.db.begin().await?;

    let lease = Lease::update(
        &mut *tx,
        id,
        UpdateLease {
            property_id: req.property_id,
            tenant_id: req.tenant_id,
            start_date: req.start_date,
            end_date: req.end_date,
            monthly_rent: req.monthly_rent,
            security_deposit: req.security_deposit,
            terms_conditions: req.terms_conditions,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Lease not found".to_string()))?;

    if old_status != lease.status {
        if let Some(availability) = availability_after(lease.status) {
            Property::set_availability(&mut *tx, lease.property_id, availability).await?;
        }
    }

    tx.commit().await?;

    tracing::info!(lease_id = %id, status = lease.status.as_str(), "Lease updated");

    Ok(Json(lease))
}

/// Delete a lease
///
/// Deleting an active lease frees the property. Payments go with the lease
/// via the database cascade.
pub async fn delete_lease(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteLeaseResponse>> {
    require_access(&state.db, &auth, ResourceRef::Lease(id)).await?;

    let lease = Lease::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lease not found".to_string()))?;

    let mut tx = state.db.begin().await?;

    if lease.status.is_active() {
        Property::set_availability(&mut *tx, lease.property_id, AvailabilityStatus::Available)
            .await?;
    }

    let deleted = Lease::delete(&mut *tx, id).await?;

    tx.commit().await?;

    tracing::info!(lease_id = %id, "Lease deleted");

    Ok(Json(DeleteLeaseResponse { deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_follows_status() {
        assert_eq!(
            availability_after(LeaseStatus::Active),
            Some(AvailabilityStatus::Occupied)
        );
        assert_eq!(
            availability_after(LeaseStatus::Expired),
            Some(AvailabilityStatus::Available)
        );
        assert_eq!(
            availability_after(LeaseStatus::Terminated),
            Some(AvailabilityStatus::Available)
        );
    }

    #[test]
    fn test_lease_form_defaults_to_active() {
        let form: LeaseRequest = serde_urlencoded::from_str(
            "property_id=6e5ff06d-4b2c-4ebb-8e2a-014c32f7f0e4\
             &tenant_id=2a1f1f77-6a86-49d9-9d5a-0ee1d24a36bb\
             &start_date=2025-01-01&end_date=2025-12-31&monthly_rent=1200",
        )
        .unwrap();

        assert_eq!(form.status, LeaseStatus::Active);
        assert!(form.security_deposit.is_none());
    }

    #[test]
    fn test_inverted_date_range_is_accepted() {
        // Date ordering is deliberately unguarded
        let form: LeaseRequest = serde_urlencoded::from_str(
            "property_id=6e5ff06d-4b2c-4ebb-8e2a-014c32f7f0e4\
             &tenant_id=2a1f1f77-6a86-49d9-9d5a-0ee1d24a36bb\
             &start_date=2025-12-31&end_date=2025-01-01&monthly_rent=900&status=active",
        )
        .unwrap();

        assert!(form.end_date < form.start_date);
    }
}
