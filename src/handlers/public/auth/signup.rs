// handlers/public/auth/signup.rs - POST /api/auth/signup handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/auth/signup - Register a new account
///
/// Missing fields are treated as empty so they fail validation with a 400
/// message. A body that is not JSON of the expected shape is also a 400.
pub async fn signup_post(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(body) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    state
        .credentials
        .register(&body.name, &body.email, &body.password)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": "User created." }))))
}
