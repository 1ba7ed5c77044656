use super::AuthError;

/// Password hashed to build the stand-in hash for unknown emails
pub(crate) const DUMMY_PASSWORD: &str = "campus-dummy-password";

/// Hash a password with bcrypt on the blocking pool
pub async fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Compare a password against a stored hash on the blocking pool
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        // A corrupt stored hash is treated as a mismatch rather than a server fault
        .unwrap_or(false);

    Ok(matched)
}
