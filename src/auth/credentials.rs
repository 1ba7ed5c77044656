use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::OnceCell;

use super::password::{hash_password, verify_password, DUMMY_PASSWORD};
use super::{AuthError, AuthPolicy};
use crate::database::models::UserProfile;
use crate::database::users;

/// Persisted user credentials: registration and password verification
#[derive(Debug, Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
    policy: AuthPolicy,
    /// Hash at the policy cost, compared against when the email is unknown
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool, policy: AuthPolicy) -> Self {
        Self {
            pool,
            policy,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    async fn dummy_hash(&self) -> Result<&str, AuthError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD, self.policy.bcrypt_cost))
            .await?;
        Ok(hash.as_str())
    }

    /// Create a user after checking domain, password length, name and uniqueness
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = normalize_email(email);
        if !self.policy.email_allowed(&email) {
            return Err(AuthError::InvalidDomain(self.policy.allowed_email_domain.clone()));
        }
        if password.chars().count() < self.policy.min_password_length {
            return Err(AuthError::WeakCredential(self.policy.min_password_length));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }

        if users::find_user_by_email(&self.pool, &email).await?.is_some() {
            return Err(AuthError::DuplicateUser);
        }

        let hash = hash_password(password, self.policy.bcrypt_cost).await?;
        let user = users::create_user(&self.pool, name, &email, &hash)
            .await
            .map_err(|e| {
                // Lost a race with a concurrent signup for the same email
                if e.is_unique_violation() {
                    AuthError::DuplicateUser
                } else {
                    AuthError::Database(e)
                }
            })?;

        tracing::info!(user_id = user.id, "registered user {}", user.email);
        Ok(user.into())
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    pub async fn verify(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = normalize_email(email);
        let user = users::find_user_by_email(&self.pool, &email).await?;

        // Unknown emails still pay for one bcrypt comparison at the same cost
        let matched = match &user {
            Some(user) => verify_password(password, &user.password_hash).await?,
            None => {
                verify_password(password, self.dummy_hash().await?).await?;
                false
            }
        };

        match user {
            Some(user) if matched => Ok(user.into()),
            _ => {
                tracing::warn!("rejected login for {}", email);
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::manager::test_pool;

    async fn store() -> CredentialStore {
        let policy = AuthPolicy::from_config(&AppConfig::for_testing().security);
        CredentialStore::new(test_pool().await, policy)
    }

    #[tokio::test]
    async fn register_then_verify_returns_same_identity() {
        let store = store().await;
        let registered = store.register("A", "a@nutech.edu.pk", "abcdef").await.unwrap();
        let verified = store.verify("a@nutech.edu.pk", "abcdef").await.unwrap();

        assert_eq!(registered, verified);
        assert_eq!(verified.name, "A");
        assert_eq!(verified.email, "a@nutech.edu.pk");
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let store = store().await;
        store.register("A", "  A@Nutech.edu.PK ", "abcdef").await.unwrap();
        let verified = store.verify("a@nutech.edu.pk", "abcdef").await.unwrap();
        assert_eq!(verified.email, "a@nutech.edu.pk");
    }

    #[tokio::test]
    async fn rejects_foreign_domain() {
        let store = store().await;
        let err = store.register("A", "a@gmail.com", "abcdef").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidDomain(_)));

        // Suffix must match exactly, not merely appear somewhere
        let err = store.register("A", "a@nutech.edu.pk.evil.com", "abcdef").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidDomain(_)));
    }

    #[tokio::test]
    async fn rejects_short_password() {
        let store = store().await;
        let err = store.register("A", "a@nutech.edu.pk", "abcde").await.unwrap_err();
        assert!(matches!(err, AuthError::WeakCredential(6)));
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let store = store().await;
        let err = store.register("   ", "a@nutech.edu.pk", "abcdef").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingName));
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = store().await;
        store.register("A", "a@nutech.edu.pk", "abcdef").await.unwrap();
        let err = store.register("Other", "a@nutech.edu.pk", "ghijkl").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let store = store().await;
        store.register("A", "a@nutech.edu.pk", "abcdef").await.unwrap();

        let wrong_password = store.verify("a@nutech.edu.pk", "nope-nope").await.unwrap_err();
        let unknown_email = store.verify("ghost@nutech.edu.pk", "abcdef").await.unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn dummy_hash_uses_policy_cost() {
        let store = store().await;
        let cost = store.policy.bcrypt_cost;

        let dummy = store.dummy_hash().await.unwrap().to_string();
        assert!(dummy.starts_with(&format!("$2b${:02}$", cost)), "{}", dummy);

        store.register("A", "a@nutech.edu.pk", "abcdef").await.unwrap();
        let user = users::find_user_by_email(&store.pool, "a@nutech.edu.pk")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&dummy[..7], &user.password_hash[..7]);

        // Built once, reused afterwards
        assert_eq!(store.dummy_hash().await.unwrap(), dummy);
    }

    #[tokio::test]
    async fn dummy_password_does_not_unlock_unknown_email() {
        let store = store().await;
        let err = store.verify("ghost@nutech.edu.pk", DUMMY_PASSWORD).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn stores_hash_not_password() {
        let store = store().await;
        store.register("A", "a@nutech.edu.pk", "abcdef").await.unwrap();
        let user = users::find_user_by_email(&store.pool, "a@nutech.edu.pk")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "abcdef");
        assert!(user.password_hash.starts_with("$2"));
    }
}
