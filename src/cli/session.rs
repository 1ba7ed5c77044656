use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::database::models::UserProfile;

const SESSION_FILE: &str = "session.json";

/// Credentials kept between CLI invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server: String,
    pub token: String,
    pub user: UserProfile,
    /// Read from the token's `exp` claim; the signature is not checked client-side
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(server: String, token: String, user: UserProfile) -> Self {
        let expires_at = token_expiry(&token);
        Self {
            server,
            token,
            user,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |exp| exp <= now)
    }
}

/// JSON session file in the CLI config directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `$CAMPUS_CLI_CONFIG_DIR`, falling back to `~/.config/campus/cli`
    pub fn open_default() -> anyhow::Result<Self> {
        let dir = if let Ok(custom_dir) = std::env::var("CAMPUS_CLI_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("campus").join("cli")
        };
        Ok(Self::at(dir))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    pub fn load(&self) -> anyhow::Result<Option<Session>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let session = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("corrupt session file {}: {}", path.display(), e))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> anyhow::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let path = self.path();
        let content = serde_json::to_string_pretty(session)?;

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            // Created owner-only; an older file keeps its mode, so tighten it too
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&path)?;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
            file.write_all(content.as_bytes())?;
        }

        #[cfg(not(unix))]
        fs::write(&path, content)?;

        Ok(())
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear(&self) -> anyhow::Result<bool> {
        let path = self.path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaim>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    Utc.timestamp_opt(data.claims.exp, 0).single()
}
