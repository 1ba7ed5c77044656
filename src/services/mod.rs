//! Resource operations that consult the authenticated identity.
//!
//! Handlers stay thin: they parse the request, call into a service with the
//! `AuthUser` attached by the middleware, and map `AccessError` to HTTP.

pub mod community_service;
pub mod post_service;

use thiserror::Error;

use crate::database::DatabaseError;

pub use community_service::{MembershipAction, MembershipStatus};

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Caller is authenticated but does not own the resource
    #[error("not the owner of this resource")]
    Forbidden,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Trimmed value of a required text field
pub(crate) fn required(value: &str, field: &str) -> Result<String, AccessError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AccessError::Invalid(format!("{} is required.", field)))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trimmed optional text; blank becomes None
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use sqlx::SqlitePool;

    use crate::database::users::create_user;
    use crate::middleware::AuthUser;

    pub async fn user(pool: &SqlitePool, name: &str) -> AuthUser {
        let email = format!("{}@nutech.edu.pk", name.to_lowercase());
        let user = create_user(pool, name, &email, "hash").await.unwrap();
        AuthUser {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
