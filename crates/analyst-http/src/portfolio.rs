//! Portfolio analysis service client

use crate::config::{ClientConfig, PortfolioEndpoints};
use crate::error::Result;
use crate::transport::Transport;
use crate::wire::{CustomerListWire, PortfolioEvaluationWire};
use analyst_core::{
    DatasetSchema, EntityRecord, EvaluationResult, RawDataset, ScoringService, ServiceError,
};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

/// Client for the portfolio analysis service
#[derive(Debug, Clone)]
pub struct PortfolioServiceClient {
    transport: Transport,
    endpoints: PortfolioEndpoints,
}

impl PortfolioServiceClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            endpoints: config.portfolio.clone(),
        })
    }
}

#[async_trait]
impl ScoringService for PortfolioServiceClient {
    type Evaluation = EvaluationResult;

    fn schema(&self) -> DatasetSchema {
        DatasetSchema::Portfolio
    }

    async fn upload(&self, dataset: &RawDataset) -> std::result::Result<Vec<EntityRecord>, ServiceError> {
        let url = self.transport.endpoint(&self.endpoints.upload)?;
        let request = self.transport.client().post(url).json(&dataset.to_json());

        let customers: CustomerListWire = self.transport.send_json(request, "Upload failed").await?;
        let records = customers.into_records();
        info!("Portfolio service lists {} customers", records.len());
        Ok(records)
    }

    async fn evaluate_entity(&self, id: &str) -> std::result::Result<EvaluationResult, ServiceError> {
        let url = self.transport.endpoint(&self.endpoints.evaluate)?;
        let request = self.transport.client().post(url).json(&json!({ "clientId": id }));

        let wire: PortfolioEvaluationWire = self.transport.send_json(request, "Evaluation failed").await?;
        EvaluationResult::try_from(wire)
            .map_err(|e| ServiceError::rejected(format!("Unexpected response from service: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{closed_port_url, serve, serve_once};
    use analyst_core::{
        EntityStatus, EvalError, EvalTarget, EvaluationSession, IngestError, to_gauge_series,
    };
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn client(base: &str) -> PortfolioServiceClient {
        let config = ClientConfig::builder()
            .base_url(base)
            .use_system_proxy(false)
            .build()
            .unwrap();
        PortfolioServiceClient::new(&config).unwrap()
    }

    fn dataset() -> RawDataset {
        RawDataset::parse(
            "portfolio.json",
            r#"[{"clientId": "C1", "currency": "USD", "funds": [{"fundCode": "F1", "amount": 1000}]}]"#,
            DatasetSchema::Portfolio,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_upload_posts_dataset_as_json() {
        let (base, request) = serve_once("200 OK", r#"{"customers": [{"clientId": "C1"}]}"#).await;

        let records = client(&base).upload(&dataset()).await.unwrap();
        assert_eq!(records, vec![EntityRecord::new("C1")]);

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /upload-json "));
        assert!(request.contains(r#""clientId":"C1""#));
        assert!(request.to_lowercase().contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn test_evaluate_posts_client_id() {
        let body = r#"{"clientId": "C1", "currency": "USD", "fundOverlap": {}, "finalScore": 150, "weightedSectorExposure": {"Technology": 1.0}}"#;
        let (base, request) = serve_once("200 OK", body).await;

        let result = client(&base).evaluate_entity("C1").await.unwrap();
        assert_eq!(result.final_score(), 100.0);
        assert_eq!(result.category_exposure, vec![("Technology".to_string(), 1.0)]);

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /evaluate-customer "));
        assert!(request.ends_with(r#"{"clientId":"C1"}"#));
    }

    #[tokio::test]
    async fn test_server_error_without_message_uses_fallback() {
        let (base, _request) = serve_once("500 INTERNAL SERVER ERROR", "oops").await;

        let err = assert_err!(client(&base).evaluate_entity("C1").await);
        assert_eq!(
            err,
            ServiceError::Rejected {
                status: Some(500),
                message: "Evaluation failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_rejected() {
        let (base, _request) = serve_once("200 OK", r#"{"customers": "C1"}"#).await;

        let err = assert_err!(client(&base).upload(&dataset()).await);
        assert!(matches!(err, ServiceError::Rejected { message, .. } if message.starts_with("Unexpected response")));
    }

    #[tokio::test]
    async fn test_session_over_http() {
        let path = std::env::temp_dir().join(format!("analyst-http-portfolio-{}.json", std::process::id()));
        tokio::fs::write(&path, dataset().text()).await.unwrap();

        let (base, requests) = serve(vec![
            ("200 OK".to_string(), r#"{"customers": [{"clientId": "C1"}, {"clientId": "C2"}]}"#.to_string()),
            ("200 OK".to_string(), r#"{"clientId": "C1", "finalScore": 150, "summary": "Well spread."}"#.to_string()),
        ])
        .await;
        let session = EvaluationSession::new(Arc::new(client(&base)));

        assert_ok!(session.ingest(Some(&path)).await);
        let ids: Vec<_> = session.entities().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["C1", "C2"]);

        let result = assert_ok!(session.evaluate(EvalTarget::entity("C1")).await);
        assert_eq!(to_gauge_series(result.final_score()).values, vec![100.0, 0.0]);
        assert_eq!(session.entity_status("C1"), Some(EntityStatus::Evaluated));
        assert_eq!(session.entity_status("C2"), Some(EntityStatus::Pending));
        assert_eq!(requests.await.unwrap().len(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_session_with_unreachable_service() {
        let path = std::env::temp_dir().join(format!("analyst-http-unreachable-{}.json", std::process::id()));
        tokio::fs::write(&path, dataset().text()).await.unwrap();

        let base = closed_port_url().await;
        let session = EvaluationSession::new(Arc::new(client(&base)));

        let err = assert_err!(session.ingest(Some(&path)).await);
        assert!(matches!(err, IngestError::Unreachable(_)));
        assert!(session.entities().is_empty());
        assert!(!session.is_busy());

        let err = assert_err!(session.evaluate(EvalTarget::entity("C1")).await);
        assert!(matches!(err, EvalError::Unreachable(_)));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
