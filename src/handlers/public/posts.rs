// handlers/public/posts.rs - Anonymous post reads

use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::SqlitePool;

use crate::database::models::{PostDetail, PostSummary};
use crate::database::posts;
use crate::error::{ApiError, ApiResult};

/// GET /api/posts - Feed, newest first, each post with author name and comments
pub async fn posts_get(State(pool): State<SqlitePool>) -> ApiResult<Json<Vec<PostSummary>>> {
    Ok(Json(posts::list_posts(&pool).await?))
}

/// GET /api/posts/:id - One post with comments resolved to their authors
pub async fn post_get(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PostDetail>> {
    posts::find_post_detail(&pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Post not found"))
}
