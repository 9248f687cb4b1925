//! Error taxonomy shared by the client and the dispatch layer.
//!
//! Every failure coming out of the HTTP layer is first captured as a [`Failure`]
//! and then classified by [`normalize`] into an [`ApiError`] with a stable code:
//! `HTTP_<status>` when the upstream answered with a status, `UNKNOWN_ERROR`
//! otherwise. The dispatch layer adds `METHOD_NOT_FOUND`, `INVALID_PARAMS` and
//! `INTERNAL_ERROR`; the stdio loop adds `PARSE_ERROR` for unreadable lines.

use log::error;
use serde::Serialize;
use serde_json::Value;

pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";

const DEFAULT_STATUS_MESSAGE: &str = "GitHub API request failed";
const DEFAULT_UNKNOWN_MESSAGE: &str = "Unknown error occurred";

pub type ApiResult<T> = Result<T, ApiError>;

/// A classified GitHub API failure. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    message: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            status_code: None,
            details: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(message, INVALID_PARAMS)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(404)
    }
}

/// A failure before classification.
#[derive(Debug)]
pub enum Failure {
    /// Already classified; passes through `normalize` untouched.
    Api(ApiError),
    /// The upstream answered with a non-success status.
    Status {
        status: u16,
        message: Option<String>,
        body: Option<Value>,
    },
    /// Anything without an HTTP status: transport, decoding, local bugs.
    Other {
        message: Option<String>,
        details: Option<Value>,
    },
}

impl Failure {
    pub fn other(message: impl Into<String>) -> Self {
        Failure::Other {
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Failure::Api(e) => e.status_code(),
            Failure::Status { status, .. } => Some(*status),
            Failure::Other { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<ApiError> for Failure {
    fn from(e: ApiError) -> Self {
        Failure::Api(e)
    }
}

impl From<reqwest::Error> for Failure {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string());
        match e.status() {
            Some(status) => Failure::Status {
                status: status.as_u16(),
                message: Some(e.to_string()),
                body: None,
            },
            None => Failure::Other {
                message: Some(e.to_string()),
                details: Some(serde_json::json!({
                    "kind": if e.is_timeout() { "timeout" } else if e.is_decode() { "decode" } else { "transport" },
                    "url": url,
                })),
            },
        }
    }
}

impl From<serde_json::Error> for Failure {
    fn from(e: serde_json::Error) -> Self {
        Failure::Other {
            message: Some(e.to_string()),
            details: Some(serde_json::json!({
                "kind": "decode",
                "line": e.line(),
                "column": e.column(),
            })),
        }
    }
}

impl From<zip::result::ZipError> for Failure {
    fn from(e: zip::result::ZipError) -> Self {
        Failure::Other {
            message: Some(e.to_string()),
            details: Some(serde_json::json!({ "kind": "archive" })),
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(e: std::io::Error) -> Self {
        Failure::Other {
            message: Some(e.to_string()),
            details: Some(serde_json::json!({ "kind": "io" })),
        }
    }
}

/// Classify any failure into an [`ApiError`]. Already-typed errors come back
/// unchanged, so normalizing twice is a no-op.
pub fn normalize(candidate: Failure) -> ApiError {
    error!("API Error occurred: {:?}", candidate);

    match candidate {
        Failure::Api(e) => e,
        Failure::Status {
            status,
            message,
            body,
        } => ApiError {
            message: non_empty(message).unwrap_or_else(|| DEFAULT_STATUS_MESSAGE.to_string()),
            code: format!("HTTP_{}", status),
            status_code: Some(status),
            details: body,
        },
        Failure::Other { message, details } => ApiError {
            message: non_empty(message).unwrap_or_else(|| DEFAULT_UNKNOWN_MESSAGE.to_string()),
            code: UNKNOWN_ERROR.to_string(),
            status_code: None,
            details,
        },
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_error_passes_through_unchanged() {
        let original = ApiError::new("Original error", "ORIGINAL_CODE")
            .with_status(500)
            .with_details(json!({"k": "v"}));
        let once = normalize(Failure::Api(original.clone()));
        assert_eq!(once, original);
        let twice = normalize(Failure::Api(once.clone()));
        assert_eq!(twice, once);
    }

    #[test]
    fn status_failure_maps_to_http_code() {
        let e = normalize(Failure::Status {
            status: 404,
            message: Some("Resource not found".into()),
            body: Some(json!({"error": "Not found"})),
        });
        assert_eq!(e.code(), "HTTP_404");
        assert_eq!(e.status_code(), Some(404));
        assert_eq!(e.message(), "Resource not found");
        assert_eq!(e.details(), Some(&json!({"error": "Not found"})));
        assert!(e.is_not_found());
    }

    #[test]
    fn status_failure_without_message_uses_default() {
        let e = normalize(Failure::Status {
            status: 500,
            message: None,
            body: None,
        });
        assert_eq!(e.message(), "GitHub API request failed");
        assert_eq!(e.code(), "HTTP_500");
        assert_eq!(e.status_code(), Some(500));
    }

    #[test]
    fn rate_limit_keeps_status_and_message() {
        let e = normalize(Failure::Status {
            status: 403,
            message: Some("API rate limit exceeded".into()),
            body: Some(json!({"message": "API rate limit exceeded for user"})),
        });
        assert_eq!(e.code(), "HTTP_403");
        assert_eq!(e.message(), "API rate limit exceeded");
    }

    #[test]
    fn statusless_failure_is_unknown() {
        let e = normalize(Failure::other("Something went wrong"));
        assert_eq!(e.code(), "UNKNOWN_ERROR");
        assert_eq!(e.message(), "Something went wrong");
        assert_eq!(e.status_code(), None);

        let bare = normalize(Failure::Other {
            message: None,
            details: None,
        });
        assert_eq!(bare.message(), "Unknown error occurred");
        assert_eq!(bare.code(), "UNKNOWN_ERROR");
    }

    #[test]
    fn decode_errors_carry_position() {
        let err = serde_json::from_str::<Value>("{").unwrap_err();
        let e = normalize(err.into());
        assert_eq!(e.code(), "UNKNOWN_ERROR");
        assert_eq!(e.details().and_then(|d| d.get("kind")), Some(&json!("decode")));
    }
}
