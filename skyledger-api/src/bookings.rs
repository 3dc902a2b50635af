use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use uuid::Uuid;

use skyledger_core::booking::Booking;
use skyledger_core::identity::Role;
use skyledger_order::tickets::{self, Ticket};

use crate::auth::require_actor;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", get(list_bookings))
        .route("/v1/bookings/{id}", delete(cancel_booking))
        .route("/v1/tickets/{booking_id}", get(get_ticket))
}

/// Customers see their own bookings; administrators see the full ledger.
async fn list_bookings(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let actor = require_actor(&state, &bearer)?;
    let bookings = crate::read_guard(&state.bookings);
    let filter = match actor.role {
        Role::Admin => None,
        Role::Customer => Some(actor.login_key.as_str()),
    };
    let rows = bookings
        .list_bookings(filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(rows))
}

async fn cancel_booking(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = require_actor(&state, &bearer)?;
    if actor.role != Role::Admin {
        return Err(AppError::AuthorizationError(
            "admin role required".to_string(),
        ));
    }

    let mut registry = crate::write_guard(&state.flights);
    let mut bookings = crate::write_guard(&state.bookings);
    bookings.cancel_booking(id, &mut registry)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_ticket(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Ticket>, AppError> {
    let actor = require_actor(&state, &bearer)?;
    let registry = crate::read_guard(&state.flights);
    let bookings = crate::read_guard(&state.bookings);

    let ticket = tickets::build_ticket(&bookings, &registry, booking_id)?;
    if actor.role != Role::Admin && ticket.customer != actor.login_key {
        return Err(AppError::AuthorizationError(
            "ticket belongs to another customer".to_string(),
        ));
    }
    Ok(Json(ticket))
}
