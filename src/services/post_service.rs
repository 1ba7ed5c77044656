use sqlx::SqlitePool;

use super::{optional, required, AccessError};
use crate::database::comments;
use crate::database::models::{AuthorName, CommentWithAuthor, Post};
use crate::database::posts::{self, NewPost};
use crate::database::DatabaseError;
use crate::middleware::AuthUser;

/// Create a post owned by the caller
pub async fn create_post(pool: &SqlitePool, user: &AuthUser, input: NewPost) -> Result<Post, AccessError> {
    let new_post = NewPost {
        title: required(&input.title, "Title")?,
        content: required(&input.content, "Content")?,
        category: optional(input.category),
        image_url: optional(input.image_url),
    };

    let post = posts::create_post(pool, user.id, new_post).await?;
    tracing::info!(post_id = post.id, author_id = user.id, "created post");
    Ok(post)
}

/// Delete a post and its comments; only the author may do this
pub async fn delete_post(pool: &SqlitePool, user: &AuthUser, post_id: i64) -> Result<(), AccessError> {
    let post = posts::find_post(pool, post_id)
        .await?
        .ok_or(AccessError::NotFound("Post"))?;

    if post.author_id != user.id {
        tracing::warn!(post_id, user_id = user.id, "refused delete by non-author");
        return Err(AccessError::Forbidden);
    }

    // A concurrent delete may win between the lookup and the transaction
    let removed_comments = posts::delete_with_comments(pool, post_id)
        .await
        .map_err(|e| match e {
            DatabaseError::NotFound(_) => AccessError::NotFound("Post"),
            other => AccessError::Database(other),
        })?;

    tracing::info!(post_id, removed_comments, "deleted post");
    Ok(())
}

/// Comment on an existing post as the caller
pub async fn add_comment(
    pool: &SqlitePool,
    user: &AuthUser,
    post_id: i64,
    content: &str,
) -> Result<CommentWithAuthor, AccessError> {
    let content = required(content, "Content")?;

    if posts::find_post(pool, post_id).await?.is_none() {
        return Err(AccessError::NotFound("Post"));
    }

    let comment = comments::create_comment(pool, post_id, user.id, &content).await?;
    Ok(CommentWithAuthor {
        comment,
        author: AuthorName { name: user.name.clone() },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::test_pool;
    use crate::services::fixtures;

    fn input(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "Starting university can be overwhelming.".to_string(),
            category: Some("Student Life".to_string()),
            image_url: Some("   ".to_string()),
        }
    }

    #[tokio::test]
    async fn create_stamps_caller_as_author() {
        let pool = test_pool().await;
        let sarah = fixtures::user(&pool, "Sarah").await;

        let post = create_post(&pool, &sarah, input("My Journey")).await.unwrap();
        assert_eq!(post.author_id, sarah.id);
        assert_eq!(post.image_url, None);
    }

    #[tokio::test]
    async fn create_requires_title() {
        let pool = test_pool().await;
        let sarah = fixtures::user(&pool, "Sarah").await;

        let err = create_post(&pool, &sarah, input("  ")).await.unwrap_err();
        assert!(matches!(err, AccessError::Invalid(_)));
    }

    #[tokio::test]
    async fn author_can_delete_once() {
        let pool = test_pool().await;
        let sarah = fixtures::user(&pool, "Sarah").await;
        let bilal = fixtures::user(&pool, "Bilal").await;
        let post = create_post(&pool, &sarah, input("p")).await.unwrap();
        add_comment(&pool, &bilal, post.id, "Great advice").await.unwrap();

        delete_post(&pool, &sarah, post.id).await.unwrap();
        assert!(posts::find_post(&pool, post.id).await.unwrap().is_none());

        let again = delete_post(&pool, &sarah, post.id).await.unwrap_err();
        assert!(matches!(again, AccessError::NotFound("Post")));
    }

    #[tokio::test]
    async fn non_author_is_forbidden_and_post_survives() {
        let pool = test_pool().await;
        let sarah = fixtures::user(&pool, "Sarah").await;
        let bilal = fixtures::user(&pool, "Bilal").await;
        let post = create_post(&pool, &sarah, input("p")).await.unwrap();

        let err = delete_post(&pool, &bilal, post.id).await.unwrap_err();
        assert!(matches!(err, AccessError::Forbidden));
        assert!(posts::find_post(&pool, post.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn comment_on_missing_post_is_not_found() {
        let pool = test_pool().await;
        let bilal = fixtures::user(&pool, "Bilal").await;

        let err = add_comment(&pool, &bilal, 42, "hello").await.unwrap_err();
        assert!(matches!(err, AccessError::NotFound("Post")));
    }

    #[tokio::test]
    async fn comment_carries_author_name() {
        let pool = test_pool().await;
        let sarah = fixtures::user(&pool, "Sarah").await;
        let bilal = fixtures::user(&pool, "Bilal").await;
        let post = create_post(&pool, &sarah, input("p")).await.unwrap();

        let comment = add_comment(&pool, &bilal, post.id, "  Can't wait!  ").await.unwrap();
        assert_eq!(comment.comment.content, "Can't wait!");
        assert_eq!(comment.comment.author_id, bilal.id);
        assert_eq!(comment.author.name, "Bilal");
    }
}
