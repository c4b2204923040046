/// Notification endpoints
///
/// # Endpoints
///
/// - `GET  /v1/notifications` - The authenticated user's notifications
/// - `POST /v1/notifications/:id/read` - Mark one as read
///
/// Notifications belong to a user directly, so the check here is simple
/// ownership of the row (admin excepted).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rentora_shared::{auth::middleware::AuthContext, models::notification::Notification};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mark-read response
#[derive(Debug, Serialize, Deserialize)]
pub struct MarkReadResponse {
    pub read: bool,
}

/// List own notifications, newest first
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = Notification::list_by_user(&state.db, auth.user_id).await?;
    Ok(Json(notifications))
}

/// Mark one notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MarkReadResponse>> {
    let notification = Notification::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;

    if notification.user_id != auth.user_id && !auth.is_admin() {
        return Err(ApiError::Forbidden(
            "You do not have permission to access this resource".to_string(),
        ));
    }

    let read = Notification::mark_read(&state.db, id).await?;

    Ok(Json(MarkReadResponse { read }))
}
