use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::database::models::{AuthorName, Comment, CommentWithAuthor};

#[derive(Debug, FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    post_id: i64,
    author_id: i64,
    created_at: DateTime<Utc>,
    author_name: String,
}

impl From<CommentRow> for CommentWithAuthor {
    fn from(row: CommentRow) -> Self {
        Self {
            comment: Comment {
                id: row.id,
                content: row.content,
                post_id: row.post_id,
                author_id: row.author_id,
                created_at: row.created_at,
            },
            author: AuthorName { name: row.author_name },
        }
    }
}

pub async fn create_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    content: &str,
) -> Result<Comment, DatabaseError> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (content, post_id, author_id, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, content, post_id, author_id, created_at
        "#,
    )
    .bind(content)
    .bind(post_id)
    .bind(author_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Comments on a post, newest first, with author names
pub async fn list_for_post(pool: &SqlitePool, post_id: i64) -> Result<Vec<CommentWithAuthor>, DatabaseError> {
    let rows = sqlx::query_as::<_, CommentRow>(
        r#"
        SELECT c.id, c.content, c.post_id, c.author_id, c.created_at, u.name AS author_name
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.created_at DESC, c.id DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CommentWithAuthor::from).collect())
}
