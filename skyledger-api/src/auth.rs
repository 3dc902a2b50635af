use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::headers::authorization::Bearer;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use skyledger_core::identity::{Identity, Role};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// The authenticated login key.
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    login_key: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    name: String,
    role: Role,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Identity>), AppError> {
    let mut identities = crate::write_guard(&state.identities);
    let identity = identities.register(&req.name, &req.email, &req.password, Role::Customer)?;
    Ok((StatusCode::CREATED, Json(identity)))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let identity = {
        let identities = crate::read_guard(&state.identities);
        identities.authenticate(&req.login_key, &req.password)?
    };

    let token = issue_token(&state, &identity)?;
    Ok(Json(AuthResponse {
        token,
        name: identity.name,
        role: identity.role,
    }))
}

pub fn issue_token(state: &AppState, identity: &Identity) -> Result<String, AppError> {
    let claims = Claims {
        sub: identity.login_key.clone(),
        role: identity.role.as_str().to_owned(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

pub fn decode_claims(state: &AppState, bearer: &Bearer) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| AppError::AuthenticationError(e.to_string()))?;
    Ok(token_data.claims)
}

/// Rebuild the acting identity from a token's subject. The identity store
/// stays authoritative: a deleted or unknown subject is rejected even if the
/// token itself still validates.
pub fn require_actor(state: &AppState, bearer: &Bearer) -> Result<Identity, AppError> {
    let claims = decode_claims(state, bearer)?;
    let identities = crate::read_guard(&state.identities);
    identities
        .find_by_login(&claims.sub)
        .ok_or_else(|| AppError::AuthenticationError("unknown subject".to_string()))
}
