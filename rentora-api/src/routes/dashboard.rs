/// Dashboard endpoint
///
/// # Endpoint
///
/// ```text
/// GET /v1/dashboard
/// ```
///
/// Aggregates the acting user's visible scope: admin sees everything, an
/// owner sees their own properties and everything transitively under them.
/// The visible record set is loaded and filtered/summed in memory — fine at
/// this system's scale, and not a designed-for-scale aggregation path.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use chrono::{Duration, Utc};
use rentora_shared::{
    auth::middleware::AuthContext,
    models::{
        lease::{Lease, LeaseStatus},
        maintenance::{MaintenanceRequest, MaintenanceStatus},
        payment::{Payment, PaymentStatus},
        property::{AvailabilityStatus, Property},
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How far ahead a lease end date counts as "expiring soon"
const EXPIRY_WINDOW_DAYS: i64 = 30;

/// Headline counters for the visible scope
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_properties: usize,
    pub available_properties: usize,
    pub occupied_properties: usize,
    pub active_leases: usize,

    /// Sum of monthly rent across active leases
    pub total_rent: Decimal,

    pub pending_payments: usize,
    pub pending_maintenance: usize,
}

/// Dashboard response
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub stats: DashboardStats,

    /// The 5 most recently created payments
    pub recent_payments: Vec<Payment>,

    /// The 5 most recently created maintenance requests
    pub recent_maintenance: Vec<MaintenanceRequest>,

    /// Leases whose end date falls within the next 30 days, today included
    pub expiring_leases: Vec<Lease>,
}

/// Dashboard handler
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DashboardResponse>> {
    let (properties, leases, payments, maintenance) = if auth.is_admin() {
        (
            Property::list_all(&state.db).await?,
            Lease::list_all(&state.db).await?,
            Payment::list_all(&state.db).await?,
            MaintenanceRequest::list_all(&state.db).await?,
        )
    } else {
        (
            Property::list_by_owner(&state.db, auth.user_id).await?,
            Lease::list_by_owner(&state.db, auth.user_id).await?,
            Payment::list_by_owner(&state.db, auth.user_id).await?,
            MaintenanceRequest::list_by_owner(&state.db, auth.user_id).await?,
        )
    };

    let stats = DashboardStats {
        total_properties: properties.len(),
        available_properties: properties
            .iter()
            .filter(|p| p.availability_status == AvailabilityStatus::Available)
            .count(),
        occupied_properties: properties
            .iter()
            .filter(|p| p.availability_status == AvailabilityStatus::Occupied)
            .count(),
        active_leases: leases
            .iter()
            .filter(|l| l.status == LeaseStatus::Active)
            .count(),
        total_rent: leases
            .iter()
            .filter(|l| l.status == LeaseStatus::Active)
            .map(|l| l.monthly_rent)
            .sum(),
        pending_payments: payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Pending)
            .count(),
        pending_maintenance: maintenance
            .iter()
            .filter(|m| m.status == MaintenanceStatus::Pending)
            .count(),
    };

    // The model queries already order newest-first
    let recent_payments: Vec<Payment> = payments.into_iter().take(5).collect();
    let recent_maintenance: Vec<MaintenanceRequest> = maintenance.into_iter().take(5).collect();

    let today = Utc::now().date_naive();
    let horizon = today + Duration::days(EXPIRY_WINDOW_DAYS);
    let expiring_leases: Vec<Lease> = leases
        .into_iter()
        .filter(|l| l.end_date >= today && l.end_date <= horizon)
        .collect();

    Ok(Json(DashboardResponse {
        stats,
        recent_payments,
        recent_maintenance,
        expiring_leases,
    }))
}
