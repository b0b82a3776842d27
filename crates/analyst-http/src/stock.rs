//! Stock evaluation service client

use crate::config::{ClientConfig, StockEndpoints};
use crate::error::Result;
use crate::transport::Transport;
use crate::wire::{StockEvaluationWire, listing_records};
use analyst_core::{
    DatasetSchema, EntityRecord, RawDataset, ScoringService, ServiceError, StockEvaluation,
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "json";

/// Client for the stock evaluation service
///
/// Ingestion is two calls: the raw file goes up as a multipart form, then
/// the company listing is fetched.
#[derive(Debug, Clone)]
pub struct StockServiceClient {
    transport: Transport,
    endpoints: StockEndpoints,
}

impl StockServiceClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            endpoints: config.stock.clone(),
        })
    }

    /// Fetch the current company listing
    pub async fn list_companies(&self) -> std::result::Result<Vec<EntityRecord>, ServiceError> {
        let url = self.transport.endpoint(&self.endpoints.companies)?;
        let companies: Vec<Map<String, Value>> = self
            .transport
            .send_json(self.transport.client().get(url), "Listing failed")
            .await?;

        Ok(listing_records(&companies, DatasetSchema::Stock.id_field()))
    }
}

#[async_trait]
impl ScoringService for StockServiceClient {
    type Evaluation = StockEvaluation;

    fn schema(&self) -> DatasetSchema {
        DatasetSchema::Stock
    }

    async fn upload(&self, dataset: &RawDataset) -> std::result::Result<Vec<EntityRecord>, ServiceError> {
        let url = self.transport.endpoint(&self.endpoints.upload)?;
        let part = Part::text(dataset.text().to_string())
            .file_name(dataset.file_name().to_string())
            .mime_str("application/json")
            .map_err(|e| ServiceError::rejected(format!("Upload failed: {e}")))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        self.transport
            .send(self.transport.client().post(url).multipart(form), "Upload failed")
            .await?;
        info!("Uploaded {} to stock service", dataset.file_name());

        let companies = self.list_companies().await?;
        debug!("Stock service lists {} companies", companies.len());
        Ok(companies)
    }

    async fn evaluate_entity(&self, id: &str) -> std::result::Result<StockEvaluation, ServiceError> {
        let url = self.transport.endpoint_with(&self.endpoints.evaluate, Some(id))?;
        let wire: StockEvaluationWire = self
            .transport
            .send_json(self.transport.client().get(url), "Evaluation failed")
            .await?;

        Ok(wire.into())
    }
}
