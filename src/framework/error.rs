//! # Resource Errors
//!
//! Every failure the resource layer can surface is a [`ResourceError`]. Error
//! bodies returned by the API are parsed once, at the boundary, into an
//! [`ApiErrorBody`] so callers never have to sniff JSON shapes themselves.
//!
//! | Variant | Source | User-facing text |
//! |---------|--------|------------------|
//! | `Transport` | connection / I/O failure | generic "unexpected" text |
//! | `Api` | non-2xx response | `detail` / `message` from the body |
//! | `Decode` | 2xx body of the wrong shape | generic "unexpected" text |

use crate::confirm::BrokerError;
use crate::session::TokenStoreError;
use serde_json::Value;
use thiserror::Error;

/// Shown when an error body carries neither `detail` nor `message`.
pub const GENERIC_API_MESSAGE: &str = "An error occurred";

/// Shown for failures that never produced an API response.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred.";

/// The parsed body of a failed API response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorBody {
    /// `{"detail": "..."}`
    Detail(String),
    /// `{"message": "..."}`
    Message(String),
    /// `detail` or `message` present but not a string (e.g. a field error map).
    Structured(Value),
    /// Anything else, including bodies that are not JSON at all.
    Unrecognized,
}

impl ApiErrorBody {
    /// Parses a raw response body.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::Unrecognized,
        }
    }

    /// Classifies an already-decoded JSON body. `detail` wins over `message`.
    pub fn from_value(value: &Value) -> Self {
        let detail = value.get("detail");
        let message = value.get("message");

        if let Some(Value::String(text)) = detail {
            return Self::Detail(text.clone());
        }
        if let Some(Value::String(text)) = message {
            return Self::Message(text.clone());
        }

        match detail.or(message) {
            None | Some(Value::Null) => Self::Unrecognized,
            Some(other) => Self::Structured(other.clone()),
        }
    }

    /// The text to show the user for this body.
    pub fn user_message(&self) -> String {
        match self {
            Self::Detail(text) | Self::Message(text) if !text.is_empty() => text.clone(),
            Self::Detail(_) | Self::Message(_) => UNEXPECTED_MESSAGE.to_string(),
            Self::Structured(value) => value.to_string(),
            Self::Unrecognized => GENERIC_API_MESSAGE.to_string(),
        }
    }
}

/// Errors returned by [`ResourceClient`](crate::framework::ResourceClient) and the domain clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResourceError {
    /// The request never produced a response (DNS, connect, TLS, timeout...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {}", .body.user_message())]
    Api { status: u16, body: ApiErrorBody },

    /// A success body could not be decoded into the expected type.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, bad multipart part...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The confirmation broker could not be reached.
    #[error("confirmation unavailable: {0}")]
    Confirmation(#[from] BrokerError),

    /// The stored auth token could not be read or written.
    #[error("token store error: {0}")]
    Token(#[from] TokenStoreError),
}

impl ResourceError {
    /// The text shown in the error notification for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { body, .. } => body.user_message(),
            _ => UNEXPECTED_MESSAGE.to_string(),
        }
    }

    /// HTTP status, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` for 401 and 403 responses.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_string_is_used_verbatim() {
        let body = ApiErrorBody::from_value(&json!({ "detail": "Invalid credentials" }));
        assert_eq!(body, ApiErrorBody::Detail("Invalid credentials".into()));
        assert_eq!(body.user_message(), "Invalid credentials");
    }

    #[test]
    fn test_message_string_is_used_verbatim() {
        let body = ApiErrorBody::from_value(&json!({ "message": "Email already taken" }));
        assert_eq!(body.user_message(), "Email already taken");
    }

    #[test]
    fn test_detail_wins_over_message() {
        let body = ApiErrorBody::from_value(&json!({ "detail": "A", "message": "B" }));
        assert_eq!(body.user_message(), "A");
    }

    #[test]
    fn test_structured_detail_is_dumped_as_json() {
        let body = ApiErrorBody::from_value(&json!({ "detail": { "email": ["required"] } }));
        assert!(matches!(body, ApiErrorBody::Structured(_)));
        assert_eq!(body.user_message(), r#"{"email":["required"]}"#);
    }

    #[test]
    fn test_unknown_shapes_fall_back_to_generic_text() {
        for raw in [&b"{\"error\": \"nope\"}"[..], b"<html>502</html>", b"", b"[1,2]"] {
            let body = ApiErrorBody::from_bytes(raw);
            assert_eq!(body, ApiErrorBody::Unrecognized);
            assert_eq!(body.user_message(), GENERIC_API_MESSAGE);
        }
    }

    #[test]
    fn test_empty_detail_uses_unexpected_text() {
        let body = ApiErrorBody::from_value(&json!({ "detail": "" }));
        assert_eq!(body.user_message(), UNEXPECTED_MESSAGE);
    }

    #[test]
    fn test_transport_error_message() {
        let err = ResourceError::Transport("connection refused".into());
        assert_eq!(err.user_message(), UNEXPECTED_MESSAGE);
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_local_failures_use_unexpected_text() {
        let errors = [
            ResourceError::Decode("missing field `id`".into()),
            ResourceError::InvalidRequest("relative URL without a base".into()),
            ResourceError::Confirmation(BrokerError::BrokerClosed),
            ResourceError::Token(TokenStoreError::Poisoned),
        ];
        for err in errors {
            assert_eq!(err.user_message(), UNEXPECTED_MESSAGE, "{err}");
            assert_eq!(err.status(), None);
        }
    }

    #[test]
    fn test_access_denied() {
        let err = ResourceError::Api { status: 401, body: ApiErrorBody::Unrecognized };
        assert!(err.is_access_denied());
        let err = ResourceError::Api { status: 404, body: ApiErrorBody::Unrecognized };
        assert!(!err.is_access_denied());
    }
}
