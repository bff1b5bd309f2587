//! HTTP client module for the B2 native API.
//!
//! This module provides the `ApiClient`, which exchanges an application key
//! ID and application key for an account authorization: the API URL,
//! download URL and bearer token every later call needs.
//!
//! Credentials are sent once, as HTTP basic auth, to the authorize endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
