/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware. The state replaces the usual
/// process-global database/config handles: it is constructed once in main
/// and handed to every handler through Axum's `State` extractor.
///
/// # Example
///
/// ```no_run
/// use rentora_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = rentora_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::Next,
    response::Response,
    routing::{get, post, put, delete},
    Router,
};
use rentora_shared::{
    auth::{jwt, middleware::AuthContext},
    storage::UploadStore,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Upload storage for property images
    pub uploads: UploadStore,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let uploads = UploadStore::new(
            config.uploads.dir.clone(),
            config.uploads.allowed_extensions.clone(),
        );

        Self {
            db,
            config: Arc::new(config),
            uploads,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /v1/                          # API v1 (versioned)
///     ├── /auth/                    # register, login, refresh (public)
///     ├── /properties/              # CRUD + image upload
///     ├── /tenants/                 # CRUD
///     ├── /leases/                  # CRUD + availability sync
///     ├── /payments/                # CRUD
///     ├── /maintenance/             # CRUD + resolution stamping
///     ├── /dashboard                # scoped aggregation
///     ├── /profile                  # own account
///     └── /notifications            # own notifications
/// ```
///
/// Everything except /health and /v1/auth sits behind the bearer-token
/// layer, which injects [`AuthContext`] into request extensions.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Entity CRUD routes (require authentication)
    let property_routes = Router::new()
        .route("/", get(routes::properties::list_properties))
        .route("/", post(routes::properties::add_property))
        .route("/:id", get(routes::properties::view_property))
        .route("/:id", put(routes::properties::edit_property))
        .route("/:id", delete(routes::properties::delete_property));

    let tenant_routes = Router::new()
        .route("/", get(routes::tenants::list_tenants))
        .route("/", post(routes::tenants::add_tenant))
        .route("/:id", get(routes::tenants::view_tenant))
        .route("/:id", put(routes::tenants::edit_tenant))
        .route("/:id", delete(routes::tenants::delete_tenant));

    let lease_routes = Router::new()
        .route("/", get(routes::leases::list_leases))
        .route("/", post(routes::leases::add_lease))
        .route("/:id", get(routes::leases::view_lease))
        .route("/:id", put(routes::leases::edit_lease))
        .route("/:id", delete(routes::leases::delete_lease));

    let payment_routes = Router::new()
        .route("/", get(routes::payments::list_payments))
        .route("/", post(routes::payments::add_payment))
        .route("/:id", get(routes::payments::view_payment))
        .route("/:id", put(routes::payments::edit_payment))
        .route("/:id", delete(routes::payments::delete_payment));

    let maintenance_routes = Router::new()
        .route("/", get(routes::maintenance::list_requests))
        .route("/", post(routes::maintenance::add_request))
        .route("/:id", get(routes::maintenance::view_request))
        .route("/:id", put(routes::maintenance::edit_request))
        .route("/:id", delete(routes::maintenance::delete_request));

    let protected_routes = Router::new()
        .nest("/properties", property_routes)
        .nest("/tenants", tenant_routes)
        .nest("/leases", lease_routes)
        .nest("/payments", payment_routes)
        .nest("/maintenance", maintenance_routes)
        .route("/dashboard", get(routes::dashboard::dashboard))
        .route("/profile", get(routes::profile::view_profile))
        .route("/profile", put(routes::profile::update_profile))
        .route("/notifications", get(routes::notifications::list_notifications))
        .route(
            "/notifications/:id/read",
            post(routes::notifications::mark_notification_read),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .layer(SecurityHeadersLayer::new(false))
        // Property images can be a few MB
        .layer(DefaultBodyLimit::max(16 * 1024 * 1024))
        .with_state(state)
}

/// Bearer-token authentication middleware layer
///
/// Extracts and validates the access token from the Authorization header,
/// then injects [`AuthContext`] into request extensions.
async fn bearer_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::BadRequest("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::new(claims.sub, claims.role);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
