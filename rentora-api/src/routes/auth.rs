/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new account
/// - `POST /v1/auth/login` - Log in and receive tokens
/// - `POST /v1/auth/refresh` - Exchange a refresh token for an access token
///
/// Login failures are deliberately indistinguishable: unknown email and
/// wrong password produce the same message. There is no logout endpoint;
/// tokens are stateless and disposal is client-side.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Form, Json};
use rentora_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserRole},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Password confirmation; must match `password`
    pub confirm_password: String,

    /// Optional contact phone
    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub phone: Option<String>,

    /// Requested role; defaults to owner
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Owner
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// New user ID
    pub user_id: String,

    /// Assigned role
    pub role: UserRole,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,

    /// Ask for a long-lived refresh token
    #[serde(default)]
    pub remember: bool,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: String,

    /// Account role
    pub role: UserRole,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d); present only when `remember` was set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

/// Register a new user account
///
/// Fails when the passwords mismatch or the email/username is already
/// taken; nothing is written in that case.
///
/// # Errors
///
/// - `409 Conflict`: Email or username already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Form(req): Form<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate()?;

    if req.password != req.confirm_password {
        return Err(ApiError::validation(
            "confirm_password",
            "Passwords do not match",
        ));
    }

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
            role: req.role,
            phone: req.phone,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User registered");

    Ok(Json(RegisterResponse {
        user_id: user.id.to_string(),
        role: user.role,
    }))
}

/// Log in with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials (one message for both unknown
///   email and wrong password) or deactivated account
pub async fn login(
    State(state): State<AppState>,
    Form(req): Form<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !user.is_active {
        return Err(ApiError::Unauthorized(
            "Your account has been deactivated".to_string(),
        ));
    }

    let access_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Access);
    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;

    // "Remember me" is the long-lived refresh token
    let refresh_token = if req.remember {
        let refresh_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Refresh);
        Some(jwt::create_token(&refresh_claims, state.jwt_secret())?)
    } else {
        None
    };

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.id.to_string(),
        role: user.role,
        access_token,
        refresh_token,
    }))
}

/// Exchange a refresh token for a new access token
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired, or wrong-type token
pub async fn refresh(
    State(state): State<AppState>,
    Form(req): Form<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
