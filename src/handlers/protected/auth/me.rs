// handlers/protected/auth/me.rs - GET /api/auth/me handler

use axum::{response::Json, Extension};

use crate::middleware::AuthUser;

/// GET /api/auth/me - Identity carried by the presented token
///
/// ```json
/// { "id": 1, "name": "Sarah", "email": "sarah@nutech.edu.pk" }
/// ```
///
/// Answers from the claims alone; the user table is not consulted.
pub async fn me_get(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}
