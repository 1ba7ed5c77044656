// handlers/protected/communities.rs - Community creation and membership

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::database::models::Community;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::services::{community_service, MembershipAction, MembershipStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Desired membership state
#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub member: bool,
}

/// Body of the older join endpoint. An empty body joins.
#[derive(Debug, Default, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub action: MembershipAction,
}

impl JoinRequest {
    /// Parse a raw body, treating an empty or whitespace-only one as a join
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub message: String,
    pub member: bool,
    pub member_count: i64,
}

impl From<MembershipStatus> for MembershipResponse {
    fn from(status: MembershipStatus) -> Self {
        let message = if status.member { "Joined community" } else { "Left community" };
        Self {
            message: message.to_string(),
            member: status.member,
            member_count: status.member_count,
        }
    }
}

/// POST /api/communities - Create a community; the creator joins it
pub async fn community_create(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateCommunityRequest>,
) -> ApiResult<(StatusCode, Json<Community>)> {
    let community =
        community_service::create_community(&pool, &user, &body.name, body.description, body.image_url).await?;
    Ok((StatusCode::CREATED, Json(community)))
}

/// PUT /api/communities/:id/membership - Set membership to `{ "member": bool }`
///
/// Idempotent: repeating a request leaves state and count unchanged.
pub async fn membership_put(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(body): Json<MembershipRequest>,
) -> ApiResult<Json<MembershipResponse>> {
    let status = community_service::set_membership(&pool, &user, id, body.member).await?;
    Ok(Json(status.into()))
}

/// POST /api/communities/:id/join - `{ "action": "join" | "leave" }`
///
/// Same semantics as the PUT endpoint; kept for older clients.
pub async fn join_post(
    State(pool): State<SqlitePool>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Bytes,
) -> ApiResult<Json<MembershipResponse>> {
    let body = JoinRequest::from_body(&body).map_err(|e| ApiError::bad_request(format!("Invalid join request: {}", e)))?;
    let status = community_service::set_membership(&pool, &user, id, body.action.wants_member()).await?;
    Ok(Json(status.into()))
}
