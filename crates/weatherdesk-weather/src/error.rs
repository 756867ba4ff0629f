//! Weather lookup error types.

use thiserror::Error;
use weatherdesk_core::{AppError, NetworkError};

#[derive(Error, Debug)]
pub enum WeatherError {
    /// Provider answered with a non-2xx status
    #[error("Upstream returned {status}")]
    UpstreamHttp {
        status: u16,
        /// `message` field of the provider's error body, when present
        message: Option<String>,
        /// Canonical status text, e.g. "404 Not Found"
        status_text: String,
    },

    /// Timeout, DNS failure, refused connection
    #[error("{0}")]
    UpstreamConnection(#[from] NetworkError),

    /// Body could not be decoded as the expected JSON
    #[error("Invalid upstream response: {0}")]
    UpstreamProtocol(String),

    /// Body decoded but a required field was absent
    #[error("Malformed upstream data: missing {0}")]
    MalformedData(String),
}

impl WeatherError {
    pub fn malformed(field: impl Into<String>) -> Self {
        Self::MalformedData(field.into())
    }

    /// The single error line shown to the user for a failed lookup.
    pub fn user_message(&self) -> String {
        match self {
            Self::UpstreamHttp {
                message,
                status_text,
                ..
            } => {
                let detail = message
                    .as_deref()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(status_text.as_str());
                format!("API error: {}", detail)
            }
            Self::UpstreamConnection(e) => format!("Connection error: {}", e),
            other => format!("Unexpected error: {}", other),
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::UpstreamConnection(network) => AppError::Network(network),
            other => AppError::Other(anyhow::anyhow!(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_prefers_provider_message() {
        let err = WeatherError::UpstreamHttp {
            status: 404,
            message: Some("city not found".into()),
            status_text: "404 Not Found".into(),
        };
        assert_eq!(err.user_message(), "API error: city not found");
    }

    #[test]
    fn test_http_error_falls_back_to_status() {
        let err = WeatherError::UpstreamHttp {
            status: 502,
            message: Some("  ".into()),
            status_text: "502 Bad Gateway".into(),
        };
        assert_eq!(err.user_message(), "API error: 502 Bad Gateway");
    }

    #[test]
    fn test_connection_error_message() {
        let err = WeatherError::from(NetworkError::Timeout);
        assert_eq!(err.user_message(), "Connection error: Request timed out");
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = WeatherError::from(NetworkError::Timeout).into();
        assert!(matches!(app, AppError::Network(NetworkError::Timeout)));

        let app: AppError = WeatherError::malformed("sys").into();
        assert!(matches!(app, AppError::Other(_)));
    }

    #[test]
    fn test_other_errors_are_unexpected() {
        assert_eq!(
            WeatherError::malformed("main.temp").user_message(),
            "Unexpected error: Malformed upstream data: missing main.temp"
        );
        assert!(WeatherError::UpstreamProtocol("eof".into())
            .user_message()
            .starts_with("Unexpected error: "));
    }
}
