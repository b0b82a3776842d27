//! Dataset loading and structural validation
//!
//! A dataset is a JSON array of entity records. Each workflow variant has its
//! own [`DatasetSchema`]; a document that does not match fails as a whole, so
//! nothing downstream ever sees a partially valid dataset.

use crate::error::IngestError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Structural shape expected from an uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatasetSchema {
    /// Array of `{stockSymbol, parameters, ...}` records
    Stock,
    /// Array of `{clientId, funds?, ...}` records
    Portfolio,
}

impl DatasetSchema {
    /// Field holding the entity identifier
    pub fn id_field(self) -> &'static str {
        match self {
            Self::Stock => "stockSymbol",
            Self::Portfolio => "clientId",
        }
    }

    /// Check a parsed document against this schema
    pub fn validate(self, document: &Value) -> Result<(), String> {
        let records = document
            .as_array()
            .ok_or_else(|| "expected a JSON array of records".to_string())?;

        for (index, record) in records.iter().enumerate() {
            let object = record
                .as_object()
                .ok_or_else(|| format!("record {index} is not an object"))?;

            let id_field = self.id_field();
            match object.get(id_field).and_then(Value::as_str) {
                Some(id) if !id.trim().is_empty() => {}
                _ => return Err(format!("record {index} has no string '{id_field}'")),
            }

            match self {
                Self::Stock => {
                    if !object.get("parameters").is_some_and(Value::is_object) {
                        return Err(format!("record {index} has no 'parameters' object"));
                    }
                }
                Self::Portfolio => {
                    if let Some(funds) = object.get("funds") {
                        let all_objects = funds
                            .as_array()
                            .is_some_and(|funds| funds.iter().all(Value::is_object));
                        if !all_objects {
                            return Err(format!(
                                "record {index} has a 'funds' field that is not an array of objects"
                            ));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// A validated, user-supplied dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawDataset {
    file_name: String,
    text: String,
    records: Vec<Map<String, Value>>,
}

impl RawDataset {
    /// Parse and validate a document
    pub fn parse(
        file_name: impl Into<String>,
        text: impl Into<String>,
        schema: DatasetSchema,
    ) -> Result<Self, IngestError> {
        let text = text.into();
        let document: Value = serde_json::from_str(&text)
            .map_err(|e| IngestError::MalformedInput(format!("invalid JSON: {e}")))?;

        schema.validate(&document).map_err(IngestError::MalformedInput)?;

        let records = match document {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(object) => Some(object),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            file_name: file_name.into(),
            text,
            records,
        })
    }

    /// Read a file fully and parse it
    ///
    /// `None` means the user never picked a file, which is reported before
    /// touching the filesystem.
    pub async fn read(path: Option<&Path>, schema: DatasetSchema) -> Result<Self, IngestError> {
        let path = path.ok_or(IngestError::NoFileSelected)?;

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| IngestError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let file_name = path
            .file_name()
            .map_or_else(|| "dataset.json".to_string(), |name| name.to_string_lossy().into_owned());

        debug!("Read {} bytes from {}", text.len(), path.display());
        Self::parse(file_name, text, schema)
    }

    /// Original file name, used for multipart uploads
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Original document text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn records(&self) -> &[Map<String, Value>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The dataset as a JSON array, for JSON-body uploads
    pub fn to_json(&self) -> Value {
        Value::Array(self.records.iter().cloned().map(Value::Object).collect())
    }
}
