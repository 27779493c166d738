//! Errors shared by the recipe, image and suggestion clients.

use dishcast_core::{AppError, NetworkError, ReqwestErrorExt};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Daily quota exceeded")]
    QuotaExceeded,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Network(err.into_network_error())
    }
}

impl ServiceError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(e) => e.user_message().to_string(),
            Self::InvalidApiKey => "API key rejected. Check your settings.".to_string(),
            Self::QuotaExceeded => "Daily request quota used up. Try again tomorrow.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::NotFound(_) => "Nothing found for that request.".to_string(),
            Self::Api { .. } => "The service could not complete the request.".to_string(),
            Self::Parse(_) => "Received an unexpected response. Please try again.".to_string(),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Network(e) => AppError::Network(e),
            ServiceError::Parse(msg) => AppError::Malformed(msg),
            other => AppError::Service(other.to_string()),
        }
    }
}

/// Map a response to `T`, turning non-2xx statuses into typed errors.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        return serde_json::from_str(&body)
            .map_err(|e| ServiceError::Parse(format!("JSON parse error: {}", e)));
    }

    match status.as_u16() {
        401 | 403 => Err(ServiceError::InvalidApiKey),
        402 => Err(ServiceError::QuotaExceeded),
        404 => {
            let text = response.text().await.unwrap_or_default();
            Err(ServiceError::NotFound(text))
        }
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(ServiceError::RateLimited(retry_after))
        }
        code => {
            let message = response.text().await.unwrap_or_default();
            Err(ServiceError::Api {
                status: code,
                message,
            })
        }
    }
}

/// HTTP client with the configured timeout.
pub(crate) fn build_client(timeout: std::time::Duration) -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
