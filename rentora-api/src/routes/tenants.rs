/// Tenant CRUD endpoints
///
/// # Endpoints
///
/// - `GET    /v1/tenants` - List all tenant profiles
/// - `POST   /v1/tenants` - Add a tenant (creating or reusing a user)
/// - `GET    /v1/tenants/:id` - View a tenant
/// - `PUT    /v1/tenants/:id` - Edit a tenant and their user's contact fields
/// - `DELETE /v1/tenants/:id` - Delete a tenant
///
/// Tenants are not part of the property ownership chain, so listings are
/// unscoped: owners pick from the full pool when writing leases. Deletion
/// is refused while the tenant holds an active lease.

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
    auth::{middleware::AuthContext, password},
    models::{
        tenant::{CreateTenant, Tenant, UpdateTenant},
        user::{CreateUser, UpdateUser, User, UserRole},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Password assigned to a tenant account created without one
const DEFAULT_TENANT_PASSWORD: &str = "changeme123";

/// Add tenant request
#[derive(Debug, Deserialize, Validate)]
pub struct AddTenantRequest {
    /// Login name for the tenant's user account
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    /// Email; an existing account with this email is reused
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Optional contact phone
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub phone: Option<String>,

    /// Initial password; a default is assigned when omitted
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub password: Option<String>,

    /// Government-issued identifier
    #[validate(length(min = 1, message = "National ID is required"))]
    pub national_id: String,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub emergency_contact: Option<String>,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub occupation: Option<String>,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub move_in_date: Option<NaiveDate>,
}

/// Edit tenant request
///
/// Updates the linked user's contact fields and the profile in one unit.
#[derive(Debug, Deserialize, Validate)]
pub struct EditTenantRequest {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub phone: Option<String>,

    #[validate(length(min = 1, message = "National ID is required"))]
    pub national_id: String,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub emergency_contact: Option<String>,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub occupation: Option<String>,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub move_in_date: Option<NaiveDate>,
}

/// Tenant with the contact fields that live on the user row
#[derive(Debug, Serialize, Deserialize)]
pub struct TenantDetail {
    #[serde(flatten)]
    pub tenant: Tenant,

    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTenantResponse {
    pub deleted: bool,
}

async fn detail(state: &AppState, tenant: Tenant) -> ApiResult<TenantDetail> {
    let user = User::find_by_id(&state.db, tenant.user_id)
        .await?
        .ok_or_else(|| ApiError::InternalError("Tenant has no linked user".to_string()))?;

    Ok(TenantDetail {
        tenant,
        username: user.username,
        email: user.email,
        phone: user.phone,
    })
}

/// List all tenant profiles
pub async fn list_tenants(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Tenant>>> {
    let tenants = Tenant::list(&state.db).await?;
    Ok(Json(tenants))
}

/// Add a tenant
///
/// Reuses an existing user matched by email unless that user already has a
/// tenant profile; otherwise creates a tenant-role user, with a default
/// password when none was supplied. User and profile are written in one
/// transaction.
///
/// # Errors
///
/// - `409 Conflict`: The matched user is already a tenant
pub async fn add_tenant(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Form(req): Form<AddTenantRequest>,
) -> ApiResult<Json<TenantDetail>> {
    req.validate()?;

    let mut tx = state.db.begin().await?;

    let user = match User::find_by_email(&mut *tx, &req.email).await? {
        Some(existing) => {
            if Tenant::find_by_user(&mut *tx, existing.id).await?.is_some() {
                return Err(ApiError::Conflict(
                    "This user is already registered as a tenant".to_string(),
                ));
            }
            existing
        }
        None => {
            let password_hash = password::hash_password(
                req.password.as_deref().unwrap_or(DEFAULT_TENANT_PASSWORD),
            )?;

            User::create(
                &mut *tx,
                CreateUser {
                    username: req.username.clone(),
                    email: req.email.clone(),
                    password_hash,
                    role: UserRole::Tenant,
                    phone: req.phone.clone(),
                },
            )
            .await?
        }
    };

    let tenant = Tenant::create(
        &mut *tx,
        CreateTenant {
            user_id: user.id,
            national_id: req.national_id,
            emergency_contact: req.emergency_contact,
            occupation: req.occupation,
            move_in_date: req.move_in_date,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(tenant_id = %tenant.id, user_id = %user.id, "Tenant added");

    Ok(Json(TenantDetail {
        tenant,
        username: user.username,
        email: user.email,
        phone: user.phone,
    }))
}

/// View a tenant
pub async fn view_tenant(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TenantDetail>> {
    let tenant = Tenant::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    Ok(Json(detail(&state, tenant).await?))
}

/// Edit a tenant
///
/// The user's contact fields and the profile fields change together or not
/// at all.
pub async fn edit_tenant(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Form(req): Form<EditTenantRequest>,
) -> ApiResult<Json<TenantDetail>> {
    req.validate()?;

    let existing = Tenant::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    let mut tx = state.db.begin().await?;

    let user = User::update(
        &mut *tx,
        existing.user_id,
        UpdateUser {
            username: Some(req.username),
            email: Some(req.email),
            phone: Some(req.phone),
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::InternalError("Tenant has no linked user".to_string()))?;

    let tenant = Tenant::update(
        &mut *tx,
        id,
        UpdateTenant {
            national_id: req.national_id,
            emergency_contact: req.emergency_contact,
            occupation: req.occupation,
            move_in_date: req.move_in_date.or(existing.move_in_date),
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Tenant not found".to_string()))?;

    tx.commit().await?;

    tracing::info!(tenant_id = %id, "Tenant updated");

    Ok(Json(TenantDetail {
        tenant,
        username: user.username,
        email: user.email,
        phone: user.phone,
    }))
}

/// Delete a tenant
///
/// # Errors
///
/// - `409 Conflict`: The tenant holds an active lease; nothing is deleted
pub async fn delete_tenant(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTenantResponse>> {
    if Tenant::find_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Tenant not found".to_string()));
    }

    if Tenant::has_active_lease(&state.db, id).await? {
        return Err(ApiError::Conflict(
            "Cannot delete tenant with active leases".to_string(),
        ));
    }

    let deleted = Tenant::delete(&state.db, id).await?;

    tracing::info!(tenant_id = %id, "Tenant deleted");

    Ok(Json(DeleteTenantResponse { deleted }))
}
