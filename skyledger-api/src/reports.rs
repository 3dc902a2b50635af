use axum::{extract::State, routing::get, Json, Router};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;

use skyledger_core::identity::Role;
use skyledger_order::reports::SystemReport;

use crate::auth::require_actor;
use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/reports/summary", get(summary))
}

async fn summary(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<SystemReport>, AppError> {
    let actor = require_actor(&state, &bearer)?;
    if actor.role != Role::Admin {
        return Err(AppError::AuthorizationError(
            "admin role required".to_string(),
        ));
    }

    let identities = crate::read_guard(&state.identities);
    let registry = crate::read_guard(&state.flights);
    let bookings = crate::read_guard(&state.bookings);
    Ok(Json(SystemReport::generate(
        &identities,
        &registry,
        &bookings,
    )))
}
