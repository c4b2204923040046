//! # Rentora API Server
//!
//! HTTP API for the Rentora property-rental management system: properties,
//! tenants, leases, payments, and maintenance requests behind a role-gated
//! login.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/rentora \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p rentora-api
//! ```

use rentora_api::{
    app::{build_router, AppState},
    config::Config,
};
use rentora_shared::db::{
    migrations,
    pool::{create_pool, DatabaseConfig},
    seed::{ensure_admin, AdminSeed},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rentora_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Rentora API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    migrations::run_migrations(&pool).await?;

    // Fresh deployments get a usable admin login
    ensure_admin(
        &pool,
        &AdminSeed {
            username: config.admin.username.clone(),
            email: config.admin.email.clone(),
            password: config.admin.password.clone(),
        },
    )
    .await?;

    let state = AppState::new(pool, config);
    state.uploads.ensure_root().await?;

    let bind_address = state.config.bind_address();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
