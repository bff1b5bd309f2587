//! API client for the B2 account authorization endpoint.
//!
//! This module provides the `ApiClient` struct, which performs the single
//! authorize exchange and hands back a `SessionDescriptor`.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::auth::{Credentials, Session, SessionData, SessionDescriptor};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default authorize endpoint (B2 native API, version 3)
pub const DEFAULT_AUTHORIZE_URL: &str =
    "https://api.backblazeb2.com/b2api/v3/b2_authorize_account";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizeResponse {
    account_id: String,
    authorization_token: String,
    api_info: ApiInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiInfo {
    storage_api: StorageApi,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageApi {
    api_url: String,
    download_url: String,
}

impl From<AuthorizeResponse> for SessionDescriptor {
    fn from(resp: AuthorizeResponse) -> Self {
        Self {
            api_url: resp.api_info.storage_api.api_url,
            account_id: resp.account_id,
            authorization_token: resp.authorization_token,
            download_url: resp.api_info.storage_api.download_url,
        }
    }
}

/// API client for account authorization.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a new API client using the transport's default timeouts
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// Create a new API client that gives up on a request after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Exchange credentials for a session descriptor.
    ///
    /// Issues one GET to `endpoint` with basic auth. Only HTTP 200 counts as
    /// success; every other status, including other 2xx codes, is read as an
    /// error payload. `endpoint` is passed to the transport untouched, so a
    /// malformed URL surfaces as `ApiError::Transport`.
    pub async fn authorize(
        &self,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<SessionDescriptor, ApiError> {
        debug!(endpoint, key_id = credentials.key_id(), "Sending authorize request");

        let response = self
            .client
            .get(endpoint)
            .header(header::AUTHORIZATION, credentials.authorization_header())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            let err = ApiError::from_error_body(status, &body);
            warn!(status = status.as_u16(), code = ?err.code(), "Authorization rejected");
            return Err(err);
        }

        let descriptor = Self::parse_descriptor(status, &body)?;
        info!(
            account_id = %descriptor.account_id,
            api_url = %descriptor.api_url,
            "Authorization succeeded"
        );
        Ok(descriptor)
    }

    /// Authorize and store the result in a caller-owned session.
    ///
    /// The session is overwritten only on success; on any error it keeps
    /// whatever it held before.
    pub async fn authorize_session<'s>(
        &self,
        session: &'s mut Session,
        endpoint: &str,
        credentials: &Credentials,
    ) -> Result<&'s SessionDescriptor, ApiError> {
        let descriptor = self.authorize(endpoint, credentials).await?;
        let data = session
            .data
            .insert(SessionData::new(descriptor, credentials.key_id()));
        Ok(&data.descriptor)
    }

    fn parse_descriptor(status: StatusCode, body: &str) -> Result<SessionDescriptor, ApiError> {
        let parsed: AuthorizeResponse =
            serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse {
                status: status.as_u16(),
                reason: format!("Failed to parse authorize response: {}", e),
            })?;

        let descriptor = SessionDescriptor::from(parsed);
        if let Some(field) = descriptor.first_empty_field() {
            return Err(ApiError::MalformedResponse {
                status: status.as_u16(),
                reason: format!("authorize response has an empty {}", field),
            });
        }
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHORIZE_RESPONSE: &str = r#"{
        "accountId": "a1b2c3d4e5f6",
        "apiInfo": {
            "groupsApi": {},
            "storageApi": {
                "absoluteMinimumPartSize": 5000000,
                "apiUrl": "https://api001.backblazeb2.com",
                "bucketId": null,
                "bucketName": null,
                "capabilities": ["listBuckets", "readFiles"],
                "downloadUrl": "https://f001.backblazeb2.com",
                "infoType": "storageApi",
                "namePrefix": null,
                "recommendedPartSize": 100000000,
                "s3ApiUrl": "https://s3.us-west-001.backblazeb2.com"
            }
        },
        "applicationKeyExpirationTimestamp": null,
        "authorizationToken": "4_0022623512fc8f80000000001_0186e431_d18d02_acct_tH7VW03boebOXayIc43-sxptpfA="
    }"#;

    #[test]
    fn test_parse_authorize_response() {
        let d = ApiClient::parse_descriptor(StatusCode::OK, AUTHORIZE_RESPONSE)
            .expect("Failed to parse authorize test JSON");
        assert_eq!(d.api_url, "https://api001.backblazeb2.com");
        assert_eq!(d.account_id, "a1b2c3d4e5f6");
        assert_eq!(
            d.authorization_token,
            "4_0022623512fc8f80000000001_0186e431_d18d02_acct_tH7VW03boebOXayIc43-sxptpfA="
        );
        assert_eq!(d.download_url, "https://f001.backblazeb2.com");
    }

    #[test]
    fn test_parse_missing_api_info_is_malformed() {
        let json = r#"{"accountId": "a1", "authorizationToken": "tok"}"#;
        let err = ApiClient::parse_descriptor(StatusCode::OK, json).unwrap_err();
        match err {
            ApiError::MalformedResponse { status, reason } => {
                assert_eq!(status, 200);
                assert!(reason.contains("apiInfo"), "reason was: {}", reason);
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_field_is_malformed() {
        let json = r#"{
            "accountId": "a1",
            "authorizationToken": "tok",
            "apiInfo": {"storageApi": {"apiUrl": "", "downloadUrl": "https://f001.backblazeb2.com"}}
        }"#;
        let err = ApiClient::parse_descriptor(StatusCode::OK, json).unwrap_err();
        assert!(err.to_string().contains("empty apiUrl"));
    }

    #[test]
    fn test_parse_non_json_is_malformed() {
        let err = ApiClient::parse_descriptor(StatusCode::OK, "not json").unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { status: 200, .. }));
    }
}
