use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SESSION_FILE: &str = "session.json";

/// Stored login for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server: String,
    pub username: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(server: String, username: String, token: String) -> Self {
        Self {
            server,
            username,
            token,
            created_at: Utc::now(),
        }
    }

    /// Expiry read from the token payload without checking the signature;
    /// the CLI never holds the server's secret.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Value>(&self.token, &DecodingKey::from_secret(&[]), &validation).ok()?;
        let exp = data.claims.get("exp")?.as_i64()?;
        DateTime::from_timestamp(exp, 0)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at().map_or(true, |exp| exp <= Utc::now())
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("CATALOG_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("catalog").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Option<Session>> {
    load_session_from(&get_config_dir()?)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?, session)
}

/// Returns whether a session file was present.
pub fn clear_session() -> anyhow::Result<bool> {
    clear_session_in(&get_config_dir()?)
}

pub fn load_session_from(dir: &Path) -> anyhow::Result<Option<Session>> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(Some(session))
}

pub fn save_session_to(dir: &Path, session: &Session) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(session)?;
    fs::write(dir.join(SESSION_FILE), content)?;
    Ok(())
}

pub fn clear_session_in(dir: &Path) -> anyhow::Result<bool> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(false);
    }

    fs::remove_file(session_file)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenSigner;
    use crate::types::Role;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "catalog-cli-{}-{}-{}",
            name,
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn session_file_lifecycle() {
        let dir = scratch_dir("lifecycle");
        assert_eq!(load_session_from(&dir).unwrap(), None);

        let session = Session::new(
            "http://localhost:3001".to_string(),
            "admin".to_string(),
            "token".to_string(),
        );
        save_session_to(&dir, &session).unwrap();
        assert_eq!(load_session_from(&dir).unwrap(), Some(session));

        assert!(clear_session_in(&dir).unwrap());
        assert!(!clear_session_in(&dir).unwrap());
        assert_eq!(load_session_from(&dir).unwrap(), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn expiry_is_read_without_the_secret() {
        let signer = TokenSigner::new(Some("server-only-secret".to_string()), 3600);
        let token = signer.issue(1, Role::Admin).unwrap();
        let session = Session::new("http://x".to_string(), "admin".to_string(), token);

        let expires_at = session.expires_at().unwrap();
        let remaining = expires_at - Utc::now();
        assert!(remaining.num_seconds() > 3500 && remaining.num_seconds() <= 3600);
        assert!(!session.is_expired());
    }

    #[test]
    fn unreadable_token_counts_as_expired() {
        let session = Session::new("http://x".to_string(), "admin".to_string(), "garbage".to_string());
        assert_eq!(session.expires_at(), None);
        assert!(session.is_expired());
    }
}
