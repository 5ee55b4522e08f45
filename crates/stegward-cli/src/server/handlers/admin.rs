//! Moderator login handler.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Request body for moderator login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying the session token.
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.auth.login(&req.email, &req.password)?;
    Ok(Json(LoginResponse { token }))
}
