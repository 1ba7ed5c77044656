// handlers/public/communities.rs - GET /api/communities

use axum::{extract::State, response::Json};
use sqlx::SqlitePool;

use crate::database::communities;
use crate::database::models::CommunityWithMembers;
use crate::error::ApiResult;

pub async fn communities_get(State(pool): State<SqlitePool>) -> ApiResult<Json<Vec<CommunityWithMembers>>> {
    Ok(Json(communities::list_communities(&pool).await?))
}
