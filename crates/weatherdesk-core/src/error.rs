//! Centralized error types for WeatherDesk.
//!
//! Service crates define their own error enums and convert into these where
//! they cross a crate boundary. Use `user_message()` for text that is safe to
//! show to an end user.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Recover a typed error from an `anyhow` chain, falling back to `Other`.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ConfigError>() {
            Ok(config) => return AppError::Config(config),
            Err(err) => err,
        };
        match err.downcast::<NetworkError>() {
            Ok(network) => AppError::Network(network),
            Err(err) => AppError::Other(err),
        }
    }

    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP transport, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

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
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
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
        } else if self.is_decode() || self.is_body() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_conversion() {
        let net_err = NetworkError::Timeout;
        let app_err: AppError = net_err.into();
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Config(ConfigError::Invalid("server.bind_addr".into()));
        assert_eq!(
            app_err.user_message(),
            "Invalid configuration. Check your settings."
        );
    }

    #[test]
    fn test_from_anyhow_recovers_config_error() {
        let err = anyhow::Error::from(ConfigError::ParseError("expected `=`".into()));
        let app_err = AppError::from_anyhow(err);
        assert!(matches!(app_err, AppError::Config(ConfigError::ParseError(_))));
        assert_eq!(
            app_err.user_message(),
            "Configuration file is malformed. Check your settings."
        );
    }

    #[test]
    fn test_from_anyhow_recovers_network_error() {
        let app_err = AppError::from_anyhow(NetworkError::Timeout.into());
        assert!(matches!(app_err, AppError::Network(NetworkError::Timeout)));
    }

    #[test]
    fn test_from_anyhow_falls_back_to_other() {
        let app_err = AppError::from_anyhow(anyhow::anyhow!("disk full"));
        assert!(matches!(app_err, AppError::Other(_)));
        assert_eq!(
            app_err.user_message(),
            "An unexpected error occurred. Please try again."
        );
    }

    #[test]
    fn test_network_error_display() {
        assert_eq!(NetworkError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            NetworkError::ConnectionFailed("refused".into()).to_string(),
            "Connection failed: refused"
        );
    }
}
