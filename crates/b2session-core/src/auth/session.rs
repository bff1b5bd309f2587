use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Token expiry time in hours.
/// Account authorization tokens are valid for 24 hours.
const TOKEN_EXPIRY_HOURS: i64 = 24;

/// The four values an authorize call hands back.
///
/// A descriptor only exists when every field is non-empty; there is no
/// partially authorized state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SessionDescriptor {
    /// Base URL for subsequent storage API calls
    pub api_url: String,
    pub account_id: String,
    /// Bearer token for subsequent API calls
    pub authorization_token: String,
    /// Base URL for content retrieval
    pub download_url: String,
}

impl SessionDescriptor {
    pub const API_URL: &'static str = "apiUrl";
    pub const ACCOUNT_ID: &'static str = "accountId";
    pub const AUTHORIZATION_TOKEN: &'static str = "authorizationToken";
    pub const DOWNLOAD_URL: &'static str = "downloadUrl";

    /// Name/value pairs under the fixed names later calls look the session up by
    pub fn env_vars(&self) -> [(&'static str, &str); 4] {
        [
            (Self::API_URL, self.api_url.as_str()),
            (Self::ACCOUNT_ID, self.account_id.as_str()),
            (Self::AUTHORIZATION_TOKEN, self.authorization_token.as_str()),
            (Self::DOWNLOAD_URL, self.download_url.as_str()),
        ]
    }

    /// Name of the first empty field, if any
    pub(crate) fn first_empty_field(&self) -> Option<&'static str> {
        self.env_vars()
            .into_iter()
            .find(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub descriptor: SessionDescriptor,
    pub key_id: String,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(descriptor: SessionDescriptor, key_id: impl Into<String>) -> Self {
        Self {
            descriptor,
            key_id: key_id.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(TOKEN_EXPIRY_HOURS)
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        (self.expires_at() - Utc::now()).num_minutes().max(0)
    }
}

/// Caller-owned session state.
///
/// Every authorize call that succeeds overwrites `data` wholesale; failed
/// calls never touch it. Callers that share one `Session` across tasks
/// provide their own locking.
#[derive(Debug, Clone)]
pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Read the session file without judging it. Expired sessions are
    /// returned too, so callers can tell "expired" apart from "missing".
    pub fn read_saved(&self) -> Result<Option<SessionData>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let data = serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(data))
    }

    /// Load an unexpired session from disk. Returns false when there is none.
    pub fn load(&mut self) -> Result<bool> {
        match self.read_saved()? {
            Some(data) if data.is_expired() => {
                debug!(key_id = %data.key_id, expired_at = %data.expires_at(), "Skipping expired session");
                Ok(false)
            }
            Some(data) => {
                self.data = Some(data);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            write_private(&path, &contents)
                .with_context(|| format!("Failed to write session file {}", path.display()))?;
        }
        Ok(())
    }

    /// Forget the in-memory session and delete the session file
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        match std::fs::remove_file(self.session_path()) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(e).context("Failed to delete session file")
            }
            _ => Ok(()),
        }
    }

    /// Replace the session with new data, discarding whatever was there
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    pub fn descriptor(&self) -> Option<&SessionDescriptor> {
        self.data.as_ref().map(|d| &d.descriptor)
    }

    /// Get the bearer token if a session exists
    pub fn token(&self) -> Option<&str> {
        self.descriptor().map(|d| d.authorization_token.as_str())
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

// The session file holds a bearer token, so keep it owner-only.
#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::fs::{OpenOptions, Permissions};
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    std::fs::write(path, contents)
}
