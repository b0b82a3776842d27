//! Error types for client construction

use thiserror::Error;

/// Errors raised while building a service client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid service URL
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Result type alias for client construction
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::ConfigError("request_timeout must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: request_timeout must be greater than 0"
        );

        let err: ClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid service URL"));
    }
}
