/// Authenticated request identity
///
/// The API server's auth layer validates the bearer token and inserts an
/// [`AuthContext`] into request extensions; handlers extract it with Axum's
/// `Extension` extractor and feed it to the authorization predicate.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use rentora_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {} ({})", auth.user_id, auth.role.as_str())
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Identity attached to every authenticated request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried in the token
    pub role: UserRole,
}

impl AuthContext {
    /// Builds the context from validated token claims
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Whether the actor bypasses ownership checks
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Error type for the authentication layer
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a bearer token
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_detection() {
        let admin = AuthContext::new(Uuid::new_v4(), UserRole::Admin);
        let owner = AuthContext::new(Uuid::new_v4(), UserRole::Owner);

        assert!(admin.is_admin());
        assert!(!owner.is_admin());
    }
}
