use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::{optional, required, AccessError};
use crate::database::communities::{self, NewCommunity};
use crate::database::models::Community;
use crate::middleware::AuthUser;

/// Legacy join endpoint vocabulary. Anything other than an explicit leave joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipAction {
    #[default]
    Join,
    Leave,
}

impl MembershipAction {
    /// Desired membership state this action asks for
    pub fn wants_member(self) -> bool {
        matches!(self, MembershipAction::Join)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipStatus {
    pub member: bool,
    pub member_count: i64,
    /// False when the call re-asserted the existing state
    pub changed: bool,
}

/// Create a community; the caller becomes creator and first member
pub async fn create_community(
    pool: &SqlitePool,
    user: &AuthUser,
    name: &str,
    description: Option<String>,
    image_url: Option<String>,
) -> Result<Community, AccessError> {
    let new_community = NewCommunity {
        name: required(name, "Name")?,
        description: optional(description).unwrap_or_default(),
        image_url: optional(image_url),
    };

    let community = communities::create_community(pool, user.id, new_community)
        .await
        .map_err(|e| {
            if e.is_unique_violation() {
                AccessError::Conflict("Community already exists.".to_string())
            } else {
                AccessError::Database(e)
            }
        })?;

    tracing::info!(community_id = community.id, creator_id = user.id, "created community");
    Ok(community)
}

/// Bring the caller's membership to the desired state. Repeating a call is a no-op.
pub async fn set_membership(
    pool: &SqlitePool,
    user: &AuthUser,
    community_id: i64,
    member: bool,
) -> Result<MembershipStatus, AccessError> {
    if communities::find_community(pool, community_id).await?.is_none() {
        return Err(AccessError::NotFound("Community"));
    }

    let changed = if member {
        communities::add_member(pool, community_id, user.id).await?
    } else {
        communities::remove_member(pool, community_id, user.id).await?
    };

    let member_count = communities::member_count(pool, community_id).await?;
    tracing::debug!(community_id, user_id = user.id, member, changed, "membership set");

    Ok(MembershipStatus {
        member,
        member_count,
        changed,
    })
}
