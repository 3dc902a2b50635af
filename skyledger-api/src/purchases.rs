use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skyledger_core::identity::Role;
use skyledger_core::payment::Payment;
use skyledger_order::orchestrator::{PurchaseOrchestrator, PurchaseReceipt};

use crate::auth::require_actor;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct PurchaseRequest {
    flight_id: Uuid,
    seat_no: String,
}

#[derive(Debug, Serialize)]
struct WalletResponse {
    login_key: String,
    balance: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/purchases", post(purchase))
        .route("/v1/wallet", get(wallet))
        .route("/v1/payments", get(list_payments))
}

/// The two-step purchase flow: charge the wallet, then reserve the seat.
/// Compensation on booking failure happens inside the orchestrator.
async fn purchase(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Json(req): Json<PurchaseRequest>,
) -> Result<(StatusCode, Json<PurchaseReceipt>), AppError> {
    let actor = require_actor(&state, &bearer)?;
    if actor.role != Role::Customer {
        // Administrators have no wallet to charge.
        return Err(AppError::AuthorizationError(
            "customer role required".to_string(),
        ));
    }

    let mut registry = crate::write_guard(&state.flights);
    let mut payments = crate::write_guard(&state.payments);
    let mut bookings = crate::write_guard(&state.bookings);

    let receipt = PurchaseOrchestrator::purchase(
        &actor,
        &mut payments,
        &mut registry,
        &mut bookings,
        req.flight_id,
        &req.seat_no,
    )?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn wallet(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<WalletResponse>, AppError> {
    let actor = require_actor(&state, &bearer)?;
    let payments = crate::read_guard(&state.payments);
    Ok(Json(WalletResponse {
        balance: payments.balance(&actor.login_key),
        login_key: actor.login_key,
    }))
}

/// Customers see their own payment history; administrators see all of it.
async fn list_payments(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Payment>>, AppError> {
    let actor = require_actor(&state, &bearer)?;
    let payments = crate::read_guard(&state.payments);
    let filter = match actor.role {
        Role::Admin => None,
        Role::Customer => Some(actor.login_key.as_str()),
    };
    let rows = payments
        .list_payments(filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(rows))
}
