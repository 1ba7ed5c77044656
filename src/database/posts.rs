use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::database::comments;
use crate::database::manager::DatabaseError;
use crate::database::models::{AuthorName, Comment, Post, PostDetail, PostSummary};

/// Fields a client may supply when creating a post; the author comes from the token
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

/// Post joined with its author's display name
#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    category: Option<String>,
    image_url: Option<String>,
    author_id: i64,
    created_at: DateTime<Utc>,
    author_name: String,
}

impl PostRow {
    fn split(self) -> (Post, AuthorName) {
        let post = Post {
            id: self.id,
            title: self.title,
            content: self.content,
            category: self.category,
            image_url: self.image_url,
            author_id: self.author_id,
            created_at: self.created_at,
        };
        (post, AuthorName { name: self.author_name })
    }
}

const POST_WITH_AUTHOR: &str = r#"
    SELECT p.id, p.title, p.content, p.category, p.image_url, p.author_id, p.created_at,
           u.name AS author_name
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

/// All posts, newest first, each with its author name and comments
pub async fn list_posts(pool: &SqlitePool) -> Result<Vec<PostSummary>, DatabaseError> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "{} ORDER BY p.created_at DESC, p.id DESC",
        POST_WITH_AUTHOR
    ))
    .fetch_all(pool)
    .await?;

    let all_comments = sqlx::query_as::<_, Comment>(
        "SELECT id, content, post_id, author_id, created_at FROM comments ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;

    let mut by_post: HashMap<i64, Vec<Comment>> = HashMap::new();
    for comment in all_comments {
        by_post.entry(comment.post_id).or_default().push(comment);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let (post, author) = row.split();
            let comments = by_post.remove(&post.id).unwrap_or_default();
            PostSummary { post, author, comments }
        })
        .collect())
}

/// Bare post row, used for ownership checks
pub async fn find_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>, DatabaseError> {
    let post = sqlx::query_as::<_, Post>(
        "SELECT id, title, content, category, image_url, author_id, created_at FROM posts WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Post with author and comments (newest first, each with its author)
pub async fn find_post_detail(pool: &SqlitePool, id: i64) -> Result<Option<PostDetail>, DatabaseError> {
    let row = sqlx::query_as::<_, PostRow>(&format!("{} WHERE p.id = ?", POST_WITH_AUTHOR))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let (post, author) = row.split();
    let comments = comments::list_for_post(pool, post.id).await?;
    Ok(Some(PostDetail { post, author, comments }))
}

pub async fn create_post(pool: &SqlitePool, author_id: i64, new_post: NewPost) -> Result<Post, DatabaseError> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (title, content, category, image_url, author_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, title, content, category, image_url, author_id, created_at
        "#,
    )
    .bind(&new_post.title)
    .bind(&new_post.content)
    .bind(&new_post.category)
    .bind(&new_post.image_url)
    .bind(author_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Delete a post and its comments in one transaction.
///
/// Comments go first: the schema declares no ON DELETE CASCADE, so the post
/// row cannot be removed while comments still reference it. Returns the
/// number of comments removed, or `NotFound` if the post row was already gone.
pub async fn delete_with_comments(pool: &SqlitePool, id: i64) -> Result<u64, DatabaseError> {
    let mut tx = pool.begin().await?;

    let removed_comments = sqlx::query("DELETE FROM comments WHERE post_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let removed_posts = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed_posts == 0 {
        tx.rollback().await?;
        return Err(DatabaseError::NotFound(format!("post {}", id)));
    }

    tx.commit().await?;
    Ok(removed_comments)
}
