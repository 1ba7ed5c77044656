// handlers/protected/posts.rs - POST /api/posts, DELETE /api/posts/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::database::models::Post;
use crate::database::posts::NewPost;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::services::post_service;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category: Option<String>,
    /// URL or base64 data URI
    pub image_url: Option<String>,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        NewPost {
            title: req.title,
            content: req.content,
            category: req.category,
            image_url: req.image_url,
        }
    }
}

/// POST /api/posts - Publish a post as the authenticated user
///
/// ```json
/// { "title": "My Journey", "content": "...", "category": "Student Life", "imageUrl": null }
/// ```
pub async fn post_create(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = post_service::create_post(&pool, &user, body.into()).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// DELETE /api/posts/:id - Author-only; comments go with the post
pub async fn post_delete(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    post_service::delete_post(&pool, &user, id).await?;
    Ok(Json(json!({ "message": "Post deleted" })))
}
