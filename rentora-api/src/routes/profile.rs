/// Profile endpoints
///
/// # Endpoints
///
/// - `GET /v1/profile` - The authenticated user's own record
/// - `PUT /v1/profile` - Update contact fields, optionally change password
///
/// A password change requires the current password to verify; the password
/// hash never leaves the server.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Form, Json};
use chrono::{DateTime, Utc};
use rentora_shared::{
    auth::{middleware::AuthContext, password},
    models::user::{UpdateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The user's own record, without the password hash
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

/// Update profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub phone: Option<String>,

    /// Current password; required when changing the password
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub current_password: Option<String>,

    /// New password, when changing it
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub new_password: Option<String>,
}

/// View own profile
pub async fn view_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Update own profile
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Current password missing or incorrect when
///   a new password was submitted
/// - `409 Conflict`: New email or username already taken
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(req): Form<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    req.validate()?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let password_hash = match &req.new_password {
        Some(new_password) => {
            let current = req.current_password.as_deref().ok_or_else(|| {
                ApiError::validation("current_password", "Current password is required")
            })?;

            if !password::verify_password(current, &user.password_hash)? {
                return Err(ApiError::validation(
                    "current_password",
                    "Current password is incorrect",
                ));
            }

            Some(password::hash_password(new_password)?)
        }
        None => None,
    };

    let updated = User::update(
        &state.db,
        auth.user_id,
        UpdateUser {
            username: Some(req.username),
            email: Some(req.email),
            phone: Some(req.phone),
            password_hash,
            ..Default::default()
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %auth.user_id, "Profile updated");

    Ok(Json(updated.into()))
}
