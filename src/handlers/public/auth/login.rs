// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::database::models::UserProfile;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// POST /api/auth/login - Authenticate and receive a JWT
///
/// ```json
/// { "email": "sarah@nutech.edu.pk", "password": "hunter22" }
/// ```
///
/// Success:
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiI...",
///   "user": { "id": 1, "name": "Sarah", "email": "sarah@nutech.edu.pk" }
/// }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(body) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    let user = state.credentials.verify(&body.email, &body.password).await?;
    let token = state.tokens.issue(&user)?;

    tracing::info!(user_id = user.id, "login succeeded for {}", user.email);
    Ok(Json(LoginResponse { token, user }))
}
