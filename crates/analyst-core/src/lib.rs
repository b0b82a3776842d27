//! Evaluation workflow core
//!
//! Shared core of the Stock Evaluator and the Portfolio Analyzer. Both tools
//! follow the same workflow:
//!
//! - Ingest a JSON dataset and upload it to a remote scoring service
//! - List the entities the service returns (companies or customers)
//! - Evaluate one entity at a time and keep the latest result
//! - Turn the result into chart series for display
//!
//! # Architecture
//!
//! - [`RawDataset`]: validated upload, one [`DatasetSchema`] per tool
//! - [`EntityRegistry`]: listed entities with their evaluation status
//! - [`EvaluationSession`]: single-flight workflow controller, generic over
//!   a [`ScoringService`]
//! - [`view_model`]: pure transforms into [`ChartSeries`]
//!
//! # Example
//!
//! ```rust,ignore
//! use analyst_core::{EvalTarget, EvaluationSession, PortfolioView};
//! use analyst_http::{ClientConfig, PortfolioServiceClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PortfolioServiceClient::new(&ClientConfig::default())?;
//!     let session = EvaluationSession::new(Arc::new(client));
//!
//!     session.ingest(Some("portfolio.json".as_ref())).await?;
//!     let result = session.evaluate(EvalTarget::entity("C1")).await?;
//!
//!     let view = PortfolioView::from_result(&result);
//!     println!("Final score: {}", view.score_label);
//!     Ok(())
//! }
//! ```

pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod notice;
pub mod registry;
pub mod service;
pub mod session;
pub mod view_model;

pub use dataset::{DatasetSchema, RawDataset};
pub use error::{EvalError, IngestError, ServiceError};
pub use evaluation::{
    Evaluation, EvaluationResult, Metrics, Recommendation, StockEvaluation, clamp_score,
};
pub use notice::Notice;
pub use registry::{Entity, EntityRecord, EntityRegistry, EntityStatus};
pub use service::ScoringService;
pub use session::{EvalTarget, EvaluationSession, SessionState, ViewStage};
pub use view_model::{
    ChartKind, ChartSeries, Color, PortfolioView, StockView, humanize_label, to_distribution_series,
    to_gauge_series, to_ranked_bars,
};
