//! Client error types

use crate::types::ErrorBody;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and raw response body
    ///
    /// The message is the backend's `detail` when the body carries one,
    /// the raw body otherwise, and the status reason when the body is empty.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = extract_message(status, body);
        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the server rejected the credentials that were sent
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }

    /// HTTP status of the failed response, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(err) => err.status().map(|status| status.as_u16()),
            Self::ServerError { status, .. } => Some(*status),
            Self::AuthenticationFailed(_) => Some(401),
            Self::BadRequest(_) => Some(400),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }

    /// Message suitable for showing to a user
    pub fn message(&self) -> String {
        match self {
            Self::ServerError { message, .. }
            | Self::AuthenticationFailed(message)
            | Self::NotFound(message)
            | Self::BadRequest(message)
            | Self::Forbidden(message)
            | Self::Conflict(message)
            | Self::Configuration(message) => message.clone(),
            Self::Request(err) if err.is_timeout() => "Request timed out".to_string(),
            Self::Request(err) if err.is_connect() => "Could not reach the server".to_string(),
            Self::Request(_) => "Network error".to_string(),
            Self::Serialization(_) => "Unexpected response from server".to_string(),
        }
    }
}

fn extract_message(status: reqwest::StatusCode, body: String) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
    {
        return message;
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_mapping() {
        let err = ClientError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"Could not validate credentials"}"#.into(),
        );
        assert!(err.is_auth_expired());
        assert_eq!(err.message(), "Could not validate credentials");
        assert_eq!(err.status(), Some(401));

        let err = ClientError::from_status(StatusCode::CONFLICT, "exists".into());
        assert!(matches!(err, ClientError::Conflict(ref m) if m == "exists"));
    }

    #[test]
    fn test_empty_body_uses_reason_phrase() {
        let err = ClientError::from_status(StatusCode::BAD_GATEWAY, String::new());
        match err {
            ClientError::ServerError { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
