//! Authentication module for account credentials and session state.
//!
//! This module provides:
//! - `Credentials`: the application key ID / application key pair and its
//!   basic-auth encoding
//! - `CredentialStore`: Secure OS-level storage of application keys via keyring
//! - `Session`: Caller-owned session state holding the authorized descriptor
//!
//! Authorization tokens are valid for 24 hours and are not refreshed.

pub mod credentials;
pub mod session;

pub use credentials::{CredentialStore, Credentials};
pub use session::{Session, SessionData, SessionDescriptor};
