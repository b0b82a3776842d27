//! The remote scoring service, as seen by the workflow

use crate::dataset::{DatasetSchema, RawDataset};
use crate::error::ServiceError;
use crate::evaluation::Evaluation;
use crate::registry::EntityRecord;
use async_trait::async_trait;

/// A scoring service backing one workflow variant
///
/// Implementations perform the network calls; the session decides when they
/// run and what state changes follow.
#[cfg_attr(test, mockall::automock(type Evaluation = crate::evaluation::EvaluationResult;))]
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Payload returned by an evaluation
    type Evaluation: Evaluation;

    /// Shape uploaded files must have
    fn schema(&self) -> DatasetSchema;

    /// Upload a dataset and return the entities the service now tracks
    async fn upload(&self, dataset: &RawDataset) -> Result<Vec<EntityRecord>, ServiceError>;

    /// Evaluate one entity
    async fn evaluate_entity(&self, id: &str) -> Result<Self::Evaluation, ServiceError>;

    /// Evaluate a whole dataset
    ///
    /// Services without a whole-dataset endpoint keep this default.
    async fn evaluate_dataset(&self, dataset: &RawDataset) -> Result<Self::Evaluation, ServiceError> {
        let _ = dataset;
        Err(ServiceError::rejected(
            "Whole-dataset evaluation is not supported by this service",
        ))
    }
}
