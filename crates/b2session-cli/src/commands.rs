use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use b2session_core::{ApiClient, Config, CredentialStore, Credentials, Session};
use tracing::{debug, info, warn};

use crate::cli::{AuthorizeArgs, Format};
use crate::output;

/// Environment variable holding the application key
const APPLICATION_KEY_ENV: &str = "B2_APPLICATION_KEY";

/// Load config, falling back to defaults when the file is unreadable
fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    })
}

pub async fn authorize(args: AuthorizeArgs) -> Result<()> {
    let mut config = load_config();

    let key_id = match args.key_id.or_else(|| config.last_key_id.clone()) {
        Some(key_id) => key_id,
        None => prompt_key_id()?,
    };
    let credentials = resolve_credentials(&key_id)?;

    let endpoint = args
        .endpoint
        .unwrap_or_else(|| config.endpoint().to_string());

    let client = match config.request_timeout() {
        Some(timeout) => ApiClient::with_timeout(timeout)?,
        None => ApiClient::new()?,
    };

    let mut session = Session::new(config.cache_dir()?);
    client
        .authorize_session(&mut session, &endpoint, &credentials)
        .await?;

    if let Err(e) = session.save() {
        warn!(error = %e, "Failed to save session");
    }

    if args.remember {
        if let Err(e) = CredentialStore::store(&key_id, credentials.application_key()) {
            warn!(error = %e, "Failed to store application key");
        }
    }

    config.last_key_id = Some(key_id);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let data = session
        .data
        .as_ref()
        .context("Session missing after successful authorize")?;
    println!("{}", output::render(data, args.format)?);
    info!("Authorize complete");
    Ok(())
}

pub fn show(format: Format) -> Result<()> {
    let config = load_config();
    let session = Session::new(config.cache_dir()?);

    match session.read_saved()? {
        None => anyhow::bail!("No saved session. Run `b2session authorize` first."),
        Some(data) if data.is_expired() => anyhow::bail!(
            "Saved session for key {} expired at {}. Run `b2session authorize` again.",
            data.key_id,
            data.expires_at().format("%Y-%m-%d %H:%M UTC")
        ),
        Some(data) => println!("{}", output::render(&data, format)?),
    }
    Ok(())
}

pub fn logout(forget_key: bool) -> Result<()> {
    let config = load_config();
    let mut session = Session::new(config.cache_dir()?);
    session.clear().context("Failed to remove cached session")?;

    if forget_key {
        match config.last_key_id.as_deref() {
            Some(key_id) => match CredentialStore::delete(key_id) {
                Ok(true) => info!(key_id, "Deleted stored application key"),
                Ok(false) => debug!(key_id, "No stored application key to forget"),
                Err(e) => warn!(error = %e, "Failed to delete stored application key"),
            },
            None => debug!("No key ID on record, nothing to forget"),
        }
    }

    println!("Logged out");
    Ok(())
}

/// Application key from the environment, then the keychain, then a prompt
fn resolve_credentials(key_id: &str) -> Result<Credentials> {
    if let Ok(key) = std::env::var(APPLICATION_KEY_ENV) {
        debug!("Using application key from environment");
        return Ok(Credentials::new(key_id, key));
    }
    match CredentialStore::load(key_id) {
        Ok(Some(credentials)) => {
            debug!("Using application key from keychain");
            return Ok(credentials);
        }
        Ok(None) => debug!(key_id, "No application key in keychain"),
        Err(e) => warn!(error = %e, "Keychain unavailable"),
    }
    let key = rpassword::prompt_password("Application key: ")
        .context("Failed to read application key")?;
    Ok(Credentials::new(key_id, key))
}

fn prompt_key_id() -> Result<String> {
    eprint!("Application key ID: ");
    io::stderr().flush()?;

    let mut key_id = String::new();
    io::stdin().lock().read_line(&mut key_id)?;
    Ok(key_id.trim().to_string())
}
