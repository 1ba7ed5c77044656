// handlers/public/system.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::database::DatabaseManager;

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Campus API",
        "version": version,
        "description": "Campus social platform: posts, comments and communities for verified students",
        "endpoints": {
            "health": "/health (public)",
            "auth": "/api/auth/signup, /api/auth/login (public), /api/auth/me (bearer)",
            "posts": "/api/posts[/:id] (public reads, bearer writes)",
            "comments": "/api/posts/:id/comments (bearer)",
            "communities": "/api/communities (public list, bearer writes)",
            "membership": "/api/communities/:id/membership (bearer)",
        }
    }))
}

pub async fn health(State(pool): State<SqlitePool>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
