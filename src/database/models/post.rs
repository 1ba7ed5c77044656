use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{AuthorName, Comment, CommentWithAuthor};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Feed entry: the post, its author's name and its raw comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorName,
    pub comments: Vec<Comment>,
}

/// Single post view with comments resolved to their authors, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorName,
    pub comments: Vec<CommentWithAuthor>,
}
