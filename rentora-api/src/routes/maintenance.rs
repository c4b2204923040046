/// Maintenance request CRUD endpoints
///
/// # Endpoints
///
/// - `GET    /v1/maintenance` - List visible requests
/// - `POST   /v1/maintenance` - Add a request
/// - `GET    /v1/maintenance/:id` - View a request
/// - `PUT    /v1/maintenance/:id` - Edit a request
/// - `DELETE /v1/maintenance/:id` - Delete a request
///
/// Editing a request into resolved stamps the resolution time; the stamp is
/// written once and survives the status moving away from resolved again.
/// The assigned staff field is checked for being a well-formed ID only.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Form, Json,
};
use rentora_shared::{
    auth::{
        authorization::{require_access, ResourceRef},
        middleware::AuthContext,
    },
    models::maintenance::{
        CreateMaintenanceRequest, MaintenancePriority, MaintenanceRequest, MaintenanceStatus,
        UpdateMaintenanceRequest,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Add/Edit maintenance request (the form submits the complete record)
#[derive(Debug, Deserialize)]
pub struct MaintenanceForm {
    pub property_id: Uuid,

    pub tenant_id: Uuid,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub assigned_staff_id: Option<Uuid>,

    pub request_type: String,

    pub description: String,

    #[serde(default = "default_priority")]
    pub priority: MaintenancePriority,

    #[serde(default = "default_status")]
    pub status: MaintenanceStatus,
}

fn default_priority() -> MaintenancePriority {
    MaintenancePriority::Medium
}

fn default_status() -> MaintenanceStatus {
    MaintenanceStatus::Pending
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteMaintenanceResponse {
    pub deleted: bool,
}

/// List visible maintenance requests
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<MaintenanceRequest>>> {
    let requests = if auth.is_admin() {
        MaintenanceRequest::list_all(&state.db).await?
    } else {
        MaintenanceRequest::list_by_owner(&state.db, auth.user_id).await?
    };

    Ok(Json(requests))
}

/// Add a maintenance request
///
/// The actor must have access to the referenced property.
pub async fn add_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(req): Form<MaintenanceForm>,
) -> ApiResult<Json<MaintenanceRequest>> {
    require_access(&state.db, &auth, ResourceRef::Property(req.property_id)).await?;

    let request = MaintenanceRequest::create(
        &state.db,
        CreateMaintenanceRequest {
            property_id: req.property_id,
            tenant_id: req.tenant_id,
            assigned_staff_id: req.assigned_staff_id,
            request_type: req.request_type,
            description: req.description,
            priority: req.priority,
            status: req.status,
        },
    )
    .await?;

    tracing::info!(
        request_id = %request.id,
        property_id = %request.property_id,
        "Maintenance request created"
    );

    Ok(Json(request))
}

/// View a maintenance request
pub async fn view_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MaintenanceRequest>> {
    require_access(&state.db, &auth, ResourceRef::Maintenance(id)).await?;

    let request = MaintenanceRequest::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Maintenance request not found".to_string()))?;

    Ok(Json(request))
}

/// Edit a maintenance request
///
/// Only the transition into resolved stamps resolved_at.
pub async fn edit_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Form(req): Form<MaintenanceForm>,
) -> ApiResult<Json<MaintenanceRequest>> {
    require_access(&state.db, &auth, ResourceRef::Maintenance(id)).await?;

    let existing = MaintenanceRequest::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Maintenance request not found".to_string()))?;
    let old_status = existing.status;

    let mut tx = state.db.begin().await?;

    let request = MaintenanceRequest::update(
        &mut *tx,
        id,
        UpdateMaintenanceRequest {
            property_id: req.property_id,
            tenant_id: req.tenant_id,
            assigned_staff_id: req.assigned_staff_id,
            request_type: req.request_type,
            description: req.description,
            priority: req.priority,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Maintenance request not found".to_string()))?;

    if old_status != MaintenanceStatus::Resolved && request.status == MaintenanceStatus::Resolved {
        MaintenanceRequest::mark_resolved(&mut *tx, id).await?;
    }

    tx.commit().await?;

    // Reload so the response carries the fresh stamp
    let request = MaintenanceRequest::find_by_id(&state.db, id)
        .await?
        .unwrap_or(request);

    tracing::info!(request_id = %id, status = request.status.as_str(), "Maintenance request updated");

    Ok(Json(request))
}

/// Delete a maintenance request
pub async fn delete_request(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteMaintenanceResponse>> {
    require_access(&state.db, &auth, ResourceRef::Maintenance(id)).await?;

    let deleted = MaintenanceRequest::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Maintenance request not found".to_string()));
    }

    tracing::info!(request_id = %id, "Maintenance request deleted");

    Ok(Json(DeleteMaintenanceResponse { deleted }))
}
