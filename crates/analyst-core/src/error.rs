//! Error types for ingestion and evaluation workflows

use thiserror::Error;

/// Failure reported by a scoring service implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service answered, but refused the request
    #[error("{message}")]
    Rejected {
        /// HTTP status, when the service is reached over HTTP
        status: Option<u16>,
        /// Server-provided error message, or a generic fallback
        message: String,
    },

    /// The service could not be reached (connect failure, timeout, broken body)
    #[error("Service unreachable: {0}")]
    Unreachable(String),
}

impl ServiceError {
    /// Build a rejection without an HTTP status
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            status: None,
            message: message.into(),
        }
    }
}

/// Errors raised while ingesting a dataset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// No file was selected
    #[error("No file selected")]
    NoFileSelected,

    /// The file could not be read
    #[error("Could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The file is not JSON, or not the expected shape
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The service refused the dataset
    #[error("{0}")]
    ServiceRejected(String),

    /// The service could not be reached
    #[error("{0}")]
    Unreachable(String),

    /// Another ingestion or evaluation is in flight
    #[error("Another request is already in progress")]
    Busy,
}

/// Errors raised while evaluating an entity or dataset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Another ingestion or evaluation is in flight
    #[error("Another request is already in progress")]
    Busy,

    /// Whole-dataset evaluation requested before any upload
    #[error("No dataset has been uploaded")]
    NoDataset,

    /// The service refused the evaluation
    #[error("{0}")]
    ServiceRejected(String),

    /// The service could not be reached
    #[error("{0}")]
    Unreachable(String),
}

impl From<ServiceError> for IngestError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Rejected { message, .. } => IngestError::ServiceRejected(message),
            err @ ServiceError::Unreachable(_) => IngestError::Unreachable(err.to_string()),
        }
    }
}

impl From<ServiceError> for EvalError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Rejected { message, .. } => EvalError::ServiceRejected(message),
            err @ ServiceError::Unreachable(_) => EvalError::Unreachable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::MalformedInput("expected a JSON array".to_string());
        assert_eq!(err.to_string(), "Malformed input: expected a JSON array");

        let err = ServiceError::Rejected {
            status: Some(404),
            message: "Stock not found".to_string(),
        };
        assert_eq!(err.to_string(), "Stock not found");
    }

    #[test]
    fn test_service_error_conversion() {
        let rejected = ServiceError::rejected("Customer not found");
        assert_eq!(
            EvalError::from(rejected.clone()),
            EvalError::ServiceRejected("Customer not found".to_string())
        );
        assert_eq!(
            IngestError::from(rejected),
            IngestError::ServiceRejected("Customer not found".to_string())
        );

        match EvalError::from(ServiceError::Unreachable("connection refused".to_string())) {
            EvalError::Unreachable(msg) => assert!(msg.contains("connection refused")),
            other => panic!("Expected Unreachable variant, got {other:?}"),
        }
    }
}
