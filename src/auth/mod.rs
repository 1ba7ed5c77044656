//! Authentication: credential storage, password hashing and identity tokens.

pub mod credentials;
pub mod password;
pub mod token;

use thiserror::Error;

use crate::config::SecurityConfig;
use crate::database::DatabaseError;

pub use credentials::CredentialStore;
pub use token::{Claims, TokenError, TokenIssuer, TOKEN_TTL_SECS};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email must end with {0}")]
    InvalidDomain(String),

    #[error("password must be at least {0} characters")]
    WeakCredential(usize),

    #[error("name is required")]
    MissingName,

    #[error("user already exists")]
    DuplicateUser,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Signup rules derived from the security configuration
#[derive(Debug, Clone)]
pub struct AuthPolicy {
    pub allowed_email_domain: String,
    pub min_password_length: usize,
    pub bcrypt_cost: u32,
}

impl AuthPolicy {
    pub fn from_config(security: &SecurityConfig) -> Self {
        Self {
            allowed_email_domain: security.allowed_email_domain.to_lowercase(),
            min_password_length: security.min_password_length,
            bcrypt_cost: security.bcrypt_cost,
        }
    }

    /// Email (already normalized) ends with the institutional suffix and has a local part
    pub fn email_allowed(&self, email: &str) -> bool {
        email.len() > self.allowed_email_domain.len() && email.ends_with(&self.allowed_email_domain)
    }
}
