// handlers/protected/comments.rs - POST /api/posts/:id/comments

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::database::models::CommentWithAuthor;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::services::post_service;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
}

pub async fn comment_create(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<AuthUser>,
    Path(post_id): Path<i64>,
    Json(body): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentWithAuthor>)> {
    let comment = post_service::add_comment(&pool, &user, post_id, &body.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
