use serde::Deserialize;
use thiserror::Error;

/// Appended to every rejection so the user knows where to look first.
pub const CREDENTIALS_HINT: &str = "check the application key ID and application key; \
     regenerating an application key invalidates the previous one";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authorization failed (HTTP {status}): {code}: {message} - {hint}", hint = CREDENTIALS_HINT)]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Invalid response (HTTP {status}): {reason}")]
    MalformedResponse { status: u16, reason: String },
}

/// Error payload returned alongside any non-200 status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build the error for a failed authorize call from its status and body.
    pub fn from_error_body(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(err) => ApiError::Rejected {
                status: status.as_u16(),
                code: err.code,
                message: err.message,
            },
            Err(e) => ApiError::MalformedResponse {
                status: status.as_u16(),
                reason: format!(
                    "expected an error body with code and message ({}): {}",
                    e,
                    Self::truncate_body(body)
                ),
            },
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Upstream error code, for rejections
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_rejection_message_includes_upstream_fields() {
        let err = ApiError::from_error_body(
            StatusCode::UNAUTHORIZED,
            r#"{"status":401,"code":"unauthorized","message":"bad credentials"}"#,
        );
        assert!(err.is_rejected());
        assert_eq!(err.code(), Some("unauthorized"));

        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("unauthorized"));
        assert!(text.contains("bad credentials"));
        assert!(text.contains("regenerating an application key"));
    }

    #[test]
    fn test_non_json_error_body_is_malformed() {
        let err = ApiError::from_error_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        match err {
            ApiError::MalformedResponse { status, ref reason } => {
                assert_eq!(status, 502);
                assert!(reason.contains("<html>bad gateway</html>"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_error_body_missing_message_is_malformed() {
        let err = ApiError::from_error_body(StatusCode::FORBIDDEN, r#"{"code":"forbidden"}"#);
        assert!(matches!(err, ApiError::MalformedResponse { status: 403, .. }));
    }

    #[test]
    fn test_truncate_body() {
        let short = "short body";
        assert_eq!(ApiError::truncate_body(short), short);

        let long = "é".repeat(400);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated, 800 total bytes"));
        assert!(truncated.len() < long.len());
    }
}
