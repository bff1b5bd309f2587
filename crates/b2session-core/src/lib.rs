//! Core library for b2session.
//!
//! Authorizes an account against the B2 native API and keeps the resulting
//! session (API URL, download URL, account ID, bearer token) in a
//! caller-owned [`Session`].
//!
//! ```no_run
//! use b2session_core::{ApiClient, Credentials, Session, DEFAULT_AUTHORIZE_URL};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ApiClient::new()?;
//! let credentials = Credentials::new("keyId", "applicationKey");
//! let mut session = Session::new(std::env::temp_dir());
//!
//! let descriptor = client
//!     .authorize_session(&mut session, DEFAULT_AUTHORIZE_URL, &credentials)
//!     .await?;
//! println!("{}", descriptor.api_url);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;

pub use api::client::DEFAULT_AUTHORIZE_URL;
pub use api::{ApiClient, ApiError};
pub use auth::{CredentialStore, Credentials, Session, SessionData, SessionDescriptor};
pub use config::Config;
