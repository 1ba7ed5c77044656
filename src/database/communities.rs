use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::database::models::{AuthorName, Community, CommunityWithMembers, Member};

#[derive(Debug, Clone)]
pub struct NewCommunity {
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, FromRow)]
struct CommunityRow {
    id: i64,
    name: String,
    description: String,
    image_url: Option<String>,
    creator_id: i64,
    created_at: DateTime<Utc>,
    creator_name: String,
}

#[derive(Debug, FromRow)]
struct MemberRow {
    community_id: i64,
    id: i64,
    name: String,
}

/// All communities with creator name and member list
pub async fn list_communities(pool: &SqlitePool) -> Result<Vec<CommunityWithMembers>, DatabaseError> {
    let rows = sqlx::query_as::<_, CommunityRow>(
        r#"
        SELECT c.id, c.name, c.description, c.image_url, c.creator_id, c.created_at,
               u.name AS creator_name
        FROM communities c
        JOIN users u ON u.id = c.creator_id
        ORDER BY c.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let member_rows = sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT m.community_id, u.id, u.name
        FROM community_members m
        JOIN users u ON u.id = m.user_id
        ORDER BY m.community_id, u.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut members: HashMap<i64, Vec<Member>> = HashMap::new();
    for row in member_rows {
        members
            .entry(row.community_id)
            .or_default()
            .push(Member { id: row.id, name: row.name });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let members = members.remove(&row.id).unwrap_or_default();
            CommunityWithMembers {
                member_count: members.len(),
                members,
                creator: AuthorName { name: row.creator_name },
                community: Community {
                    id: row.id,
                    name: row.name,
                    description: row.description,
                    image_url: row.image_url,
                    creator_id: row.creator_id,
                    created_at: row.created_at,
                },
            }
        })
        .collect())
}

pub async fn find_community(pool: &SqlitePool, id: i64) -> Result<Option<Community>, DatabaseError> {
    let community = sqlx::query_as::<_, Community>(
        "SELECT id, name, description, image_url, creator_id, created_at FROM communities WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(community)
}

/// Insert a community and enrol its creator as the first member, atomically
pub async fn create_community(
    pool: &SqlitePool,
    creator_id: i64,
    new_community: NewCommunity,
) -> Result<Community, DatabaseError> {
    let mut tx = pool.begin().await?;

    let community = sqlx::query_as::<_, Community>(
        r#"
        INSERT INTO communities (name, description, image_url, creator_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, name, description, image_url, creator_id, created_at
        "#,
    )
    .bind(&new_community.name)
    .bind(&new_community.description)
    .bind(&new_community.image_url)
    .bind(creator_id)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO community_members (community_id, user_id) VALUES (?, ?)")
        .bind(community.id)
        .bind(creator_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(community)
}

/// Add a member; returns false when the user already belonged
pub async fn add_member(pool: &SqlitePool, community_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
    let result = sqlx::query("INSERT OR IGNORE INTO community_members (community_id, user_id) VALUES (?, ?)")
        .bind(community_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a member; returns false when the user was not a member
pub async fn remove_member(pool: &SqlitePool, community_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM community_members WHERE community_id = ? AND user_id = ?")
        .bind(community_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_member(pool: &SqlitePool, community_id: i64, user_id: i64) -> Result<bool, DatabaseError> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT 1 FROM community_members WHERE community_id = ? AND user_id = ?")
            .bind(community_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.is_some())
}

pub async fn member_count(pool: &SqlitePool, community_id: i64) -> Result<i64, DatabaseError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM community_members WHERE community_id = ?")
        .bind(community_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::manager::test_pool;
    use crate::database::users::create_user;

    fn cs_society() -> NewCommunity {
        NewCommunity {
            name: "Nutech CS Society".to_string(),
            description: "Coding, Hackathons, and AI.".to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn creator_is_first_member() {
        let pool = test_pool().await;
        let bilal = create_user(&pool, "Bilal", "bilal@nutech.edu.pk", "h").await.unwrap();
        let community = create_community(&pool, bilal.id, cs_society()).await.unwrap();

        assert!(is_member(&pool, community.id, bilal.id).await.unwrap());
        assert_eq!(member_count(&pool, community.id).await.unwrap(), 1);

        let listed = list_communities(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].creator.name, "Bilal");
        assert_eq!(listed[0].member_count, 1);
        assert_eq!(listed[0].members[0].id, bilal.id);
    }

    #[tokio::test]
    async fn add_and_remove_are_idempotent() {
        let pool = test_pool().await;
        let bilal = create_user(&pool, "Bilal", "bilal@nutech.edu.pk", "h").await.unwrap();
        let sarah = create_user(&pool, "Sarah", "sarah@nutech.edu.pk", "h").await.unwrap();
        let community = create_community(&pool, bilal.id, cs_society()).await.unwrap();

        assert!(add_member(&pool, community.id, sarah.id).await.unwrap());
        assert!(!add_member(&pool, community.id, sarah.id).await.unwrap());
        assert_eq!(member_count(&pool, community.id).await.unwrap(), 2);

        assert!(remove_member(&pool, community.id, sarah.id).await.unwrap());
        assert!(!remove_member(&pool, community.id, sarah.id).await.unwrap());
        assert_eq!(member_count(&pool, community.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_unique_violation() {
        let pool = test_pool().await;
        let bilal = create_user(&pool, "Bilal", "bilal@nutech.edu.pk", "h").await.unwrap();
        create_community(&pool, bilal.id, cs_society()).await.unwrap();
        let err = create_community(&pool, bilal.id, cs_society()).await.unwrap_err();
        assert!(err.is_unique_violation());
    }
}
