use std::fmt;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use keyring::Entry;

const SERVICE_NAME: &str = "b2session";

/// An application key ID and its secret application key.
///
/// Values are forwarded as-is: no trimming, no charset checks. An empty
/// key ID or key is allowed here and will be rejected by the server.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    key_id: String,
    application_key: String,
}

impl Credentials {
    pub fn new(key_id: impl Into<String>, application_key: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            application_key: application_key.into(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn application_key(&self) -> &str {
        &self.application_key
    }

    /// Base64 (standard alphabet, padded) of `"<key_id>:<application_key>"`.
    pub fn basic_auth_token(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.key_id, self.application_key))
    }

    /// Value for the `Authorization` header of the authorize request
    pub fn authorization_header(&self) -> String {
        format!("Basic {}", self.basic_auth_token())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("application_key", &"<redacted>")
            .finish()
    }
}

/// Application keys kept in the OS keychain, one entry per key ID.
pub struct CredentialStore;

impl CredentialStore {
    /// Store an application key for a key ID in the OS keychain
    pub fn store(key_id: &str, application_key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, key_id)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(application_key)
            .context("Failed to store application key in keychain")?;
        Ok(())
    }

    /// Retrieve the application key for a key ID, `None` when nothing is stored
    pub fn get_application_key(key_id: &str) -> Result<Option<String>> {
        let entry = Entry::new(SERVICE_NAME, key_id)
            .context("Failed to create keyring entry")?;
        match entry.get_password() {
            Ok(key) => Ok(Some(key)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve application key from keychain"),
        }
    }

    /// Full credentials for a key ID, if an application key is stored
    pub fn load(key_id: &str) -> Result<Option<Credentials>> {
        Ok(Self::get_application_key(key_id)?.map(|key| Credentials::new(key_id, key)))
    }

    /// Delete the stored application key for a key ID.
    /// Returns false when there was nothing to delete.
    pub fn delete(key_id: &str) -> Result<bool> {
        let entry = Entry::new(SERVICE_NAME, key_id)
            .context("Failed to create keyring entry")?;
        match entry.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(e).context("Failed to delete application key from keychain"),
        }
    }
}
