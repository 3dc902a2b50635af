use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use serde::Serialize;
use uuid::Uuid;

use skyledger_core::flight::{Flight, FlightSpec, FlightUpdate};

use crate::auth::require_actor;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct FlightView {
    id: Uuid,
    flight_number: String,
    origin: String,
    destination: String,
    price: f64,
    date: String,
    departure_time: String,
    duration: String,
    airline: String,
    seat_count: usize,
    available_seats: usize,
}

impl From<&Flight> for FlightView {
    fn from(flight: &Flight) -> Self {
        Self {
            id: flight.id,
            flight_number: flight.flight_number.clone(),
            origin: flight.origin.clone(),
            destination: flight.destination.clone(),
            price: flight.price,
            date: flight.date.clone(),
            departure_time: flight.departure_time.clone(),
            duration: flight.duration.clone(),
            airline: flight.airline.clone(),
            seat_count: flight.seat_count(),
            available_seats: flight.available_seats(),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights", get(list_flights).post(create_flight))
        .route("/v1/flights/{id}", patch(update_flight).delete(remove_flight))
}

async fn list_flights(State(state): State<AppState>) -> Json<Vec<FlightView>> {
    let registry = crate::read_guard(&state.flights);
    let views = registry
        .list_flights()
        .into_iter()
        .map(FlightView::from)
        .collect();
    Json(views)
}

async fn create_flight(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Json(spec): Json<FlightSpec>,
) -> Result<(StatusCode, Json<FlightView>), AppError> {
    let actor = require_actor(&state, &bearer)?;
    let mut registry = crate::write_guard(&state.flights);
    let flight = registry.add_flight(&actor, spec)?;
    Ok((StatusCode::CREATED, Json(FlightView::from(&flight))))
}

async fn update_flight(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
    Json(update): Json<FlightUpdate>,
) -> Result<Json<FlightView>, AppError> {
    let actor = require_actor(&state, &bearer)?;
    let mut registry = crate::write_guard(&state.flights);
    let flight = registry.edit_flight(&actor, id, update)?;
    Ok(Json(FlightView::from(&flight)))
}

async fn remove_flight(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let actor = require_actor(&state, &bearer)?;
    let mut registry = crate::write_guard(&state.flights);
    registry.delete_flight(&actor, id)?;
    Ok(StatusCode::NO_CONTENT)
}
