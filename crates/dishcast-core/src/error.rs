//! Centralized error types for Dishcast.
//!
//! Handlers catch these at the call site, log the full error and show
//! `user_message()` in the affected page region. Nothing propagates further.

use thiserror::Error;

/// Top-level application error type.
///
/// Service and weather errors convert into this type so every handler has a
/// single error to log and a single `user_message()` to render.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// A third-party API answered, but not with something we can use.
    #[error("Service error: {0}")]
    Service(String),

    /// The response arrived but could not be interpreted.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A capability the environment does not provide (e.g. geolocation).
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in a page region.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Service(_) => "The recipe service could not complete the request.",
            AppError::Malformed(_) => "Received an unexpected response. Please try again.",
            AppError::Unsupported(_) => "This feature is not available here.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Network(NetworkError::Timeout),
            AppError::Service("quota".into()),
            AppError::Malformed("not json".into()),
            AppError::Unsupported("geolocation".into()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let upstream = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        assert!(upstream.user_message().contains("later"));

        let client = NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        };
        assert!(!client.user_message().contains("later"));
    }

    #[test]
    fn test_error_conversion_chain() {
        let err: AppError = NetworkError::ConnectionFailed("refused".into()).into();
        assert!(matches!(err, AppError::Network(NetworkError::ConnectionFailed(_))));
        assert!(err.to_string().contains("refused"));
    }
}
