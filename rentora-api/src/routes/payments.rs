/// Payment CRUD endpoints
///
/// # Endpoints
///
/// - `GET    /v1/payments` - List visible payments
/// - `POST   /v1/payments` - Record a payment
/// - `GET    /v1/payments/:id` - View a payment
/// - `PUT    /v1/payments/:id` - Edit a payment
/// - `DELETE /v1/payments/:id` - Delete a payment
///
/// Access reaches a payment through its lease's property. Payments are
/// informational: no lease or property state is recomputed here.

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
    auth::{
        authorization::{require_access, ResourceRef},
        middleware::AuthContext,
    },
    models::payment::{CreatePayment, Payment, PaymentStatus, UpdatePayment},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Add/Edit payment request (the form submits the complete record)
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub lease_id: Uuid,

    pub amount: Decimal,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub paid_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "super::empty_string_as_none")]
    pub payment_method: Option<String>,

    #[serde(default = "default_status")]
    pub status: PaymentStatus,
}

fn default_status() -> PaymentStatus {
    PaymentStatus::Pending
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePaymentResponse {
    pub deleted: bool,
}

/// List visible payments
pub async fn list_payments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Payment>>> {
    let payments = if auth.is_admin() {
        Payment::list_all(&state.db).await?
    } else {
        Payment::list_by_owner(&state.db, auth.user_id).await?
    };

    Ok(Json(payments))
}

/// Record a payment against a lease
///
/// The actor must have access to the lease's property.
pub async fn add_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Form(req): Form<PaymentRequest>,
) -> ApiResult<Json<Payment>> {
    require_access(&state.db, &auth, ResourceRef::Lease(req.lease_id)).await?;

    let payment = Payment::create(
        &state.db,
        CreatePayment {
            lease_id: req.lease_id,
            amount: req.amount,
            due_date: req.due_date,
            paid_date: req.paid_date,
            payment_method: req.payment_method,
            status: req.status,
        },
    )
    .await?;

    tracing::info!(payment_id = %payment.id, lease_id = %payment.lease_id, "Payment recorded");

    Ok(Json(payment))
}

/// View a payment
pub async fn view_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Payment>> {
    require_access(&state.db, &auth, ResourceRef::Payment(id)).await?;

    let payment = Payment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    Ok(Json(payment))
}

/// Edit a payment
pub async fn edit_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Form(req): Form<PaymentRequest>,
) -> ApiResult<Json<Payment>> {
    require_access(&state.db, &auth, ResourceRef::Payment(id)).await?;

    let payment = Payment::update(
        &state.db,
        id,
        UpdatePayment {
            lease_id: req.lease_id,
            amount: req.amount,
            due_date: req.due_date,
            paid_date: req.paid_date,
            payment_method: req.payment_method,
            status: req.status,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))?;

    tracing::info!(payment_id = %id, "Payment updated");

    Ok(Json(payment))
}

/// Delete a payment
pub async fn delete_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletePaymentResponse>> {
    require_access(&state.db, &auth, ResourceRef::Payment(id)).await?;

    let deleted = Payment::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Payment not found".to_string()));
    }

    tracing::info!(payment_id = %id, "Payment deleted");

    Ok(Json(DeletePaymentResponse { deleted }))
}
