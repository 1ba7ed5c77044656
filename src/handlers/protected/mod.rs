// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Security Level: JWT authentication, enforced by middleware::jwt_auth_middleware
// Handler Context: Extension<AuthUser> built from the verified claims

pub mod auth;
pub mod comments;
pub mod communities;
pub mod posts;
