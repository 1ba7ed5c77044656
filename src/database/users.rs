use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::User;

/// Insert a new user and return the stored row
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, password_hash, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, email, password_hash, created_at
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email, None if not found
pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::test_pool;

    #[tokio::test]
    async fn creates_and_finds_user() {
        let pool = test_pool().await;
        let created = create_user(&pool, "Sarah", "sarah@nutech.edu.pk", "hash").await.unwrap();

        let by_email = find_user_by_email(&pool, "sarah@nutech.edu.pk").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.password_hash, "hash");
        assert_eq!(by_email.email, "sarah@nutech.edu.pk");

        assert!(find_user_by_email(&pool, "nobody@nutech.edu.pk").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let pool = test_pool().await;
        create_user(&pool, "A", "a@nutech.edu.pk", "h1").await.unwrap();
        let err = create_user(&pool, "B", "a@nutech.edu.pk", "h2").await.unwrap_err();
        assert!(err.is_unique_violation());
    }
}
