/// Common test utilities for integration tests
///
/// Shared infrastructure for API-level tests: database setup, test user
/// creation, token generation, and request helpers. Tests run against the
/// database named by `DATABASE_URL`; when it is not set the suite skips
/// itself rather than failing.

use axum::body::Body;
use axum::http::{header, Request, Response};
use rentora_api::app::{build_router, AppState};
use rentora_api::config::{
    AdminConfig, ApiConfig, Config, DatabaseConfig, JwtConfig, UploadConfig,
};
use rentora_shared::auth::jwt::{create_token, Claims, TokenType};
use rentora_shared::auth::password;
use rentora_shared::models::property::{AvailabilityStatus, CreateProperty, Property};
use rentora_shared::models::tenant::{CreateTenant, Tenant};
use rentora_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use tower::Service as _;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a test context, or None when no database is configured
    pub async fn try_new() -> Option<Self> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping integration test");
            return None;
        };

        let db = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to test database");

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../migrations")
            .run(&db)
            .await
            .expect("migrations failed");

        let upload_dir = std::env::temp_dir().join(format!("rentora-test-{}", Uuid::new_v4()));

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
            },
            uploads: UploadConfig {
                dir: upload_dir.to_string_lossy().into_owned(),
                allowed_extensions: vec![
                    "png".to_string(),
                    "jpg".to_string(),
                    "jpeg".to_string(),
                    "pdf".to_string(),
                ],
            },
            admin: AdminConfig {
                username: "admin".to_string(),
                email: "admin@rental.com".to_string(),
                password: "admin123".to_string(),
            },
        };

        let state = AppState::new(db.clone(), config);
        state.uploads.ensure_root().await.expect("upload dir");
        let app = build_router(state);

        Some(TestContext { db, app })
    }

    /// Creates a user with the given role and returns it with an access token
    pub async fn create_user(&self, role: UserRole) -> (User, String) {
        let tag = Uuid::new_v4().simple().to_string();
        let user = User::create(
            &self.db,
            CreateUser {
                username: format!("user-{}", tag),
                email: format!("user-{}@example.com", tag),
                password_hash: password::hash_password("Password1!").unwrap(),
                role,
                phone: None,
            },
        )
        .await
        .expect("create test user");

        let claims = Claims::new(user.id, role, TokenType::Access);
        let token = create_token(&claims, JWT_SECRET).unwrap();

        (user, token)
    }

    /// Creates a property owned by the given user
    pub async fn create_property(&self, owner_id: Uuid) -> Property {
        Property::create(
            &self.db,
            CreateProperty {
                owner_id,
                property_type: "apartment".to_string(),
                address: format!("{} Test Street", Uuid::new_v4().simple()),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                rent_amount: "1200".parse().unwrap(),
                availability_status: AvailabilityStatus::Available,
                description: None,
                bedrooms: Some(2),
                bathrooms: Some(1),
                area_sqft: None,
                image_path: None,
            },
        )
        .await
        .expect("create test property")
    }

    /// Creates a tenant profile backed by a fresh tenant-role user
    pub async fn create_tenant(&self) -> Tenant {
        let (user, _) = self.create_user(UserRole::Tenant).await;

        Tenant::create(
            &self.db,
            CreateTenant {
                user_id: user.id,
                national_id: "TEST-0001".to_string(),
                emergency_contact: None,
                occupation: None,
                move_in_date: None,
            },
        )
        .await
        .expect("create test tenant")
    }

    /// Sends a form-encoded request
    pub async fn send_form(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        let body = serde_urlencoded::to_string(fields).unwrap();

        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder.body(Body::from(body)).unwrap();
        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a bodyless request (GET/DELETE/POST without fields)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = builder.body(Body::empty()).unwrap();
        self.app.clone().call(request).await.unwrap()
    }
}

/// Reads a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
