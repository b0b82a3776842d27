//! User-facing failure notices

use crate::error::{EvalError, IngestError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A failure the user has to acknowledge before carrying on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(&self.title)
        } else {
            write!(f, "{}: {}", self.title, self.message)
        }
    }
}

impl From<&IngestError> for Notice {
    fn from(err: &IngestError) -> Self {
        match err {
            IngestError::NoFileSelected => Notice::new("Please upload a JSON file", ""),
            other => Notice::new("Upload failed", other.to_string()),
        }
    }
}

impl From<&EvalError> for Notice {
    fn from(err: &EvalError) -> Self {
        Notice::new("Evaluation failed", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_titles() {
        assert_eq!(
            Notice::from(&IngestError::NoFileSelected).to_string(),
            "Please upload a JSON file"
        );
        assert_eq!(
            Notice::from(&IngestError::ServiceRejected("Invalid or empty JSON.".to_string())).to_string(),
            "Upload failed: Invalid or empty JSON."
        );
        assert_eq!(
            Notice::from(&EvalError::Busy).to_string(),
            "Evaluation failed: Another request is already in progress"
        );
    }
}
