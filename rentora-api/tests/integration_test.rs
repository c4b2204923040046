/// Integration tests for the Rentora API
///
/// These tests drive the full router end-to-end against a real database:
/// - registration and login
/// - the ownership predicate denying access without mutating anything
/// - lease status driving property availability
/// - the tenant delete guard
/// - maintenance resolution stamping
/// - dashboard scoping (admin-wide vs owner-scoped)
///
/// Each test skips itself when `DATABASE_URL` is not set.

mod common;

use axum::http::StatusCode;
use common::{body_json, TestContext};
use rentora_shared::db::seed::{ensure_admin, AdminSeed};
use rentora_shared::models::lease::Lease;
use rentora_shared::models::maintenance::{MaintenanceRequest, MaintenanceStatus};
use rentora_shared::models::property::{AvailabilityStatus, Property};
use rentora_shared::models::tenant::Tenant;
use rentora_shared::models::user::{User, UserRole};
use tower::Service as _;
use uuid::Uuid;

#[tokio::test]
async fn test_register_and_login_flow() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let tag = Uuid::new_v4().simple().to_string();
    let email = format!("reg-{}@example.com", tag);
    let username = format!("reg-{}", tag);

    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/register",
            None,
            &[
                ("username", username.as_str()),
                ("email", email.as_str()),
                ("password", "Password1!"),
                ("confirm_password", "Password1!"),
                ("role", "owner"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Login succeeds with the right password
    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/login",
            None,
            &[("email", email.as_str()), ("password", "Password1!")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_null());

    // "Remember me" adds a refresh token
    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/login",
            None,
            &[
                ("email", email.as_str()),
                ("password", "Password1!"),
                ("remember", "true"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["refresh_token"].is_string());

    // Wrong password and unknown email produce the same generic message
    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/login",
            None,
            &[("email", email.as_str()), ("password", "wrong")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(response).await;

    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/login",
            None,
            &[("email", "nobody@example.com"), ("password", "wrong")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let unknown_email = body_json(response).await;

    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn test_duplicate_registration_creates_no_user() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let (existing, _) = ctx.create_user(UserRole::Owner).await;

    // Duplicate email
    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/register",
            None,
            &[
                ("username", "someone-else"),
                ("email", existing.email.as_str()),
                ("password", "Password1!"),
                ("confirm_password", "Password1!"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(User::find_by_username(&ctx.db, "someone-else")
        .await
        .unwrap()
        .is_none());

    // Duplicate username
    let tag = Uuid::new_v4().simple().to_string();
    let email = format!("dup-{}@example.com", tag);
    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/register",
            None,
            &[
                ("username", existing.username.as_str()),
                ("email", email.as_str()),
                ("password", "Password1!"),
                ("confirm_password", "Password1!"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(User::find_by_email(&ctx.db, &email).await.unwrap().is_none());
}

#[tokio::test]
async fn test_password_mismatch_creates_no_user() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let tag = Uuid::new_v4().simple().to_string();
    let email = format!("mismatch-{}@example.com", tag);

    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/register",
            None,
            &[
                ("username", format!("mismatch-{}", tag).as_str()),
                ("email", email.as_str()),
                ("password", "Password1!"),
                ("confirm_password", "Different1!"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(User::find_by_email(&ctx.db, &email).await.unwrap().is_none());
}

#[tokio::test]
async fn test_authentication_required() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let response = ctx.send("GET", "/v1/properties", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_denied_access_does_not_mutate() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let (owner_a, _) = ctx.create_user(UserRole::Owner).await;
    let (_owner_b, token_b) = ctx.create_user(UserRole::Owner).await;

    let property = ctx.create_property(owner_a.id).await;
    let uri = format!("/v1/properties/{}", property.id);

    // View is denied
    let response = ctx.send("GET", &uri, Some(&token_b)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Edit is denied and changes nothing
    let response = send_multipart(
        &ctx,
        "PUT",
        &uri,
        &token_b,
        &[
            ("property_type", "mansion"),
            ("address", "1 Hijacked Way"),
            ("city", "Nowhere"),
            ("state", "XX"),
            ("rent_amount", "99999"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Delete is denied and the row survives
    let response = ctx.send("DELETE", &uri, Some(&token_b)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let unchanged = Property::find_by_id(&ctx.db, property.id)
        .await
        .unwrap()
        .expect("property must still exist");
    assert_eq!(unchanged.property_type, property.property_type);
    assert_eq!(unchanged.address, property.address);

    // A lease under the property is protected the same way
    let tenant = ctx.create_tenant().await;
    let response = ctx
        .send_form(
            "POST",
            "/v1/leases",
            Some(&token_b),
            &[
                ("property_id", property.id.to_string().as_str()),
                ("tenant_id", tenant.id.to_string().as_str()),
                ("start_date", "2025-01-01"),
                ("end_date", "2025-12-31"),
                ("monthly_rent", "1200"),
                ("status", "active"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(Lease::list_by_owner(&ctx.db, owner_a.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_lease_status_drives_availability() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let (owner, token) = ctx.create_user(UserRole::Owner).await;
    let property = ctx.create_property(owner.id).await;
    let tenant = ctx.create_tenant().await;

    // Creating an active lease occupies the property
    let response = ctx
        .send_form(
            "POST",
            "/v1/leases",
            Some(&token),
            &[
                ("property_id", property.id.to_string().as_str()),
                ("tenant_id", tenant.id.to_string().as_str()),
                ("start_date", "2025-01-01"),
                ("end_date", "2025-12-31"),
                ("monthly_rent", "1500"),
                ("security_deposit", "3000"),
                ("status", "active"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let lease_id: Uuid = body_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let refreshed = Property::find_by_id(&ctx.db, property.id).await.unwrap().unwrap();
    assert_eq!(refreshed.availability_status, AvailabilityStatus::Occupied);

    // Terminating it frees the property
    let response = ctx
        .send_form(
            "PUT",
            &format!("/v1/leases/{}", lease_id),
            Some(&token),
            &[
                ("property_id", property.id.to_string().as_str()),
                ("tenant_id", tenant.id.to_string().as_str()),
                ("start_date", "2025-01-01"),
                ("end_date", "2025-12-31"),
                ("monthly_rent", "1500"),
                ("status", "terminated"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let refreshed = Property::find_by_id(&ctx.db, property.id).await.unwrap().unwrap();
    assert_eq!(refreshed.availability_status, AvailabilityStatus::Available);

    // Back to active, then deleting the active lease frees it again
    let response = ctx
        .send_form(
            "PUT",
            &format!("/v1/leases/{}", lease_id),
            Some(&token),
            &[
                ("property_id", property.id.to_string().as_str()),
                ("tenant_id", tenant.id.to_string().as_str()),
                ("start_date", "2025-01-01"),
                ("end_date", "2025-12-31"),
                ("monthly_rent", "1500"),
                ("status", "active"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .send("DELETE", &format!("/v1/leases/{}", lease_id), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let refreshed = Property::find_by_id(&ctx.db, property.id).await.unwrap().unwrap();
    assert_eq!(refreshed.availability_status, AvailabilityStatus::Available);
    assert!(Lease::find_by_id(&ctx.db, lease_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_tenant_with_active_lease_cannot_be_deleted() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let (owner, token) = ctx.create_user(UserRole::Owner).await;
    let property = ctx.create_property(owner.id).await;
    let tenant = ctx.create_tenant().await;

    let response = ctx
        .send_form(
            "POST",
            "/v1/leases",
            Some(&token),
            &[
                ("property_id", property.id.to_string().as_str()),
                ("tenant_id", tenant.id.to_string().as_str()),
                ("start_date", "2025-01-01"),
                ("end_date", "2025-12-31"),
                ("monthly_rent", "1000"),
                ("status", "active"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let lease_id: Uuid = body_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let response = ctx
        .send("DELETE", &format!("/v1/tenants/{}", tenant.id), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Everything is still there
    assert!(Tenant::find_by_id(&ctx.db, tenant.id).await.unwrap().is_some());
    assert!(Lease::find_by_id(&ctx.db, lease_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_resolving_maintenance_stamps_timestamp_once() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let (owner, token) = ctx.create_user(UserRole::Owner).await;
    let property = ctx.create_property(owner.id).await;
    let tenant = ctx.create_tenant().await;

    let response = ctx
        .send_form(
            "POST",
            "/v1/maintenance",
            Some(&token),
            &[
                ("property_id", property.id.to_string().as_str()),
                ("tenant_id", tenant.id.to_string().as_str()),
                ("request_type", "plumbing"),
                ("description", "Kitchen sink leaks"),
                ("priority", "high"),
                ("status", "pending"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let request_id: Uuid = body_json(response).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let created = MaintenanceRequest::find_by_id(&ctx.db, request_id)
        .await
        .unwrap()
        .unwrap();
    assert!(created.resolved_at.is_none());

    let resolve_fields = [
        ("property_id", property.id.to_string()),
        ("tenant_id", tenant.id.to_string()),
        ("request_type", "plumbing".to_string()),
        ("description", "Kitchen sink leaks".to_string()),
        ("priority", "high".to_string()),
        ("status", "resolved".to_string()),
    ];
    let fields: Vec<(&str, &str)> = resolve_fields
        .iter()
        .map(|(k, v)| (*k, v.as_str()))
        .collect();

    let response = ctx
        .send_form(
            "PUT",
            &format!("/v1/maintenance/{}", request_id),
            Some(&token),
            &fields,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let resolved = MaintenanceRequest::find_by_id(&ctx.db, request_id)
        .await
        .unwrap()
        .unwrap();
    let first_stamp = resolved.resolved_at.expect("resolved_at must be stamped");
    assert!(first_stamp >= created.created_at);
    assert_eq!(resolved.status, MaintenanceStatus::Resolved);

    // Un-resolve: the stamp survives
    let reopen_fields = [
        ("property_id", property.id.to_string()),
        ("tenant_id", tenant.id.to_string()),
        ("request_type", "plumbing".to_string()),
        ("description", "Kitchen sink leaks".to_string()),
        ("priority", "high".to_string()),
        ("status", "in_progress".to_string()),
    ];
    let fields: Vec<(&str, &str)> = reopen_fields
        .iter()
        .map(|(k, v)| (*k, v.as_str()))
        .collect();
    let response = ctx
        .send_form(
            "PUT",
            &format!("/v1/maintenance/{}", request_id),
            Some(&token),
            &fields,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Resolve again: the original stamp is kept
    let fields: Vec<(&str, &str)> = resolve_fields
        .iter()
        .map(|(k, v)| (*k, v.as_str()))
        .collect();
    let response = ctx
        .send_form(
            "PUT",
            &format!("/v1/maintenance/{}", request_id),
            Some(&token),
            &fields,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let re_resolved = MaintenanceRequest::find_by_id(&ctx.db, request_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(re_resolved.resolved_at, Some(first_stamp));
}

#[tokio::test]
async fn test_dashboard_scoping() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let (owner_a, token_a) = ctx.create_user(UserRole::Owner).await;
    let (owner_b, _) = ctx.create_user(UserRole::Owner).await;
    let (_, admin_token) = ctx.create_user(UserRole::Admin).await;

    ctx.create_property(owner_a.id).await;
    ctx.create_property(owner_b.id).await;

    // Owner sees only their own property
    let response = ctx.send("GET", "/v1/dashboard", Some(&token_a)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let owner_stats = body_json(response).await;
    assert_eq!(owner_stats["stats"]["total_properties"], 1);

    // Admin sees across all owners
    let response = ctx.send("GET", "/v1/dashboard", Some(&admin_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let admin_stats = body_json(response).await;
    assert!(admin_stats["stats"]["total_properties"].as_u64().unwrap() >= 2);
}

#[tokio::test]
async fn test_seeded_admin_can_login() {
    let Some(ctx) = TestContext::try_new().await else { return };

    // Reset any previous seed so the default credentials are known
    if let Some(existing) = User::find_by_email(&ctx.db, "admin@rental.com").await.unwrap() {
        User::delete(&ctx.db, existing.id).await.unwrap();
    }
    ensure_admin(&ctx.db, &AdminSeed::default()).await.unwrap();

    let response = ctx
        .send_form(
            "POST",
            "/v1/auth/login",
            None,
            &[("email", "admin@rental.com"), ("password", "admin123")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "admin");
}

#[tokio::test]
async fn test_property_add_parses_numeric_fields() {
    let Some(ctx) = TestContext::try_new().await else { return };

    let (owner, token) = ctx.create_user(UserRole::Owner).await;

    // Well-formed multipart add
    let response = send_multipart(
        &ctx,
        "POST",
        "/v1/properties",
        &token,
        &[
            ("property_type", "house"),
            ("address", "12 Multipart Lane"),
            ("city", "Springfield"),
            ("state", "IL"),
            ("rent_amount", "1750.50"),
            ("bedrooms", "3"),
            ("bathrooms", "2"),
            ("area_sqft", "1400"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["availability_status"], "available");

    let before = Property::list_by_owner(&ctx.db, owner.id).await.unwrap().len();

    // A bad numeric field fails the whole operation with no partial write
    let response = send_multipart(
        &ctx,
        "POST",
        "/v1/properties",
        &token,
        &[
            ("property_type", "house"),
            ("address", "13 Broken Lane"),
            ("city", "Springfield"),
            ("state", "IL"),
            ("rent_amount", "not-a-number"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let after = Property::list_by_owner(&ctx.db, owner.id).await.unwrap().len();
    assert_eq!(before, after);
}

/// Builds and sends a text-only multipart request
async fn send_multipart(
    ctx: &TestContext,
    method: &str,
    uri: &str,
    token: &str,
    fields: &[(&str, &str)],
) -> axum::http::Response<axum::body::Body> {
    let boundary = "rentora-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    let request = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {token}"),
        )
        .body(axum::body::Body::from(body))
        .unwrap();

    ctx.app.clone().call(request).await.unwrap()
}
