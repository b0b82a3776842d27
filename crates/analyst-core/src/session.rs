//! Evaluation session: the upload → list → evaluate → display workflow
//!
//! One [`EvaluationSession`] drives one tool instance. It owns the
//! [`SessionState`] and a single busy flag; every state change goes through
//! the operations here. At most one ingestion or evaluation runs at a time,
//! and a second request made while one is in flight is rejected, never queued.

use crate::dataset::RawDataset;
use crate::error::{EvalError, IngestError};
use crate::notice::Notice;
use crate::registry::{Entity, EntityRegistry, EntityStatus};
use crate::service::ScoringService;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// What an evaluation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalTarget {
    /// One listed entity
    Entity(String),
    /// The uploaded dataset as a whole
    Dataset,
}

impl EvalTarget {
    pub fn entity(id: impl Into<String>) -> Self {
        Self::Entity(id.into())
    }
}

/// Which view the session is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewStage {
    AwaitingUpload,
    Listing,
    ShowingResult,
}

/// Everything a session knows, as one value
#[derive(Debug, Clone)]
pub struct SessionState<E> {
    pub dataset: Option<Arc<RawDataset>>,
    pub registry: EntityRegistry,
    pub current: Option<E>,
    /// Last failure, until dismissed
    pub notice: Option<Notice>,
    pub created_at: DateTime<Utc>,
}

impl<E> SessionState<E> {
    pub fn new() -> Self {
        Self {
            dataset: None,
            registry: EntityRegistry::new(),
            current: None,
            notice: None,
            created_at: Utc::now(),
        }
    }

    pub fn stage(&self) -> ViewStage {
        if self.current.is_some() {
            ViewStage::ShowingResult
        } else if self.dataset.is_some() {
            ViewStage::Listing
        } else {
            ViewStage::AwaitingUpload
        }
    }
}

impl<E> Default for SessionState<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds the busy flag for as long as it lives
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Workflow controller for one tool instance
pub struct EvaluationSession<S: ScoringService> {
    service: Arc<S>,
    state: Mutex<SessionState<S::Evaluation>>,
    busy: AtomicBool,
}

impl<S: ScoringService> EvaluationSession<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            state: Mutex::new(SessionState::new()),
            busy: AtomicBool::new(false),
        }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    // Never held across an await point.
    fn state(&self) -> MutexGuard<'_, SessionState<S::Evaluation>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> SessionState<S::Evaluation> {
        self.state().clone()
    }

    pub fn stage(&self) -> ViewStage {
        self.state().stage()
    }

    /// Listed entities in service order
    pub fn entities(&self) -> Vec<Entity> {
        self.state().registry.iter().cloned().collect()
    }

    pub fn entity_status(&self, id: &str) -> Option<EntityStatus> {
        self.state().registry.status(id)
    }

    pub fn current(&self) -> Option<S::Evaluation> {
        self.state().current.clone()
    }

    pub fn dataset(&self) -> Option<Arc<RawDataset>> {
        self.state().dataset.clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.state().notice.clone()
    }

    /// Acknowledge the pending notice
    pub fn dismiss_notice(&self) -> Option<Notice> {
        self.state().notice.take()
    }

    /// Close the displayed result and go back to the entity listing
    pub fn clear(&self) {
        self.state().current = None;
    }

    /// Return to the upload step with an empty state
    ///
    /// Refused (returns `false`) while a request is in flight, so a response
    /// can never land in a state it was not issued from.
    pub fn reset(&self) -> bool {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return false;
        };
        *self.state() = SessionState::new();
        info!("Session reset");
        true
    }

    /// Read, validate and upload a dataset, then list its entities
    ///
    /// The registry is replaced only when every step succeeds.
    pub async fn ingest(&self, file: Option<&Path>) -> Result<Arc<RawDataset>, IngestError> {
        let result = match BusyGuard::acquire(&self.busy) {
            Some(_guard) => self.run_ingest(file).await,
            None => Err(IngestError::Busy),
        };

        if let Err(err) = &result {
            warn!("Ingestion failed: {}", err);
            self.state().notice = Some(Notice::from(err));
        }
        result
    }

    async fn run_ingest(&self, file: Option<&Path>) -> Result<Arc<RawDataset>, IngestError> {
        let dataset = RawDataset::read(file, self.service.schema()).await?;
        info!(
            file = dataset.file_name(),
            records = dataset.len(),
            "Uploading dataset"
        );

        let records = self.service.upload(&dataset).await?;
        let registry = EntityRegistry::from_records(records);
        let dataset = Arc::new(dataset);

        let mut state = self.state();
        state.dataset = Some(Arc::clone(&dataset));
        state.registry = registry;
        state.current = None;
        info!(entities = state.registry.len(), "Dataset ingested");

        Ok(dataset)
    }

    /// Evaluate an entity or the uploaded dataset
    pub async fn evaluate(&self, target: EvalTarget) -> Result<S::Evaluation, EvalError> {
        let result = match BusyGuard::acquire(&self.busy) {
            Some(_guard) => match target {
                EvalTarget::Entity(id) => self.run_entity_evaluation(&id).await,
                EvalTarget::Dataset => self.run_dataset_evaluation().await,
            },
            None => Err(EvalError::Busy),
        };

        if let Err(err) = &result {
            warn!("Evaluation failed: {}", err);
            self.state().notice = Some(Notice::from(err));
        }
        result
    }

    async fn run_entity_evaluation(&self, id: &str) -> Result<S::Evaluation, EvalError> {
        let row = EvaluatingGuard::mark(self, id);
        debug!("Evaluating entity {}", id);

        let evaluation = self.service.evaluate_entity(id).await?;
        row.finish(&evaluation);
        info!("Entity {} evaluated", id);
        Ok(evaluation)
    }

    async fn run_dataset_evaluation(&self) -> Result<S::Evaluation, EvalError> {
        let dataset = self.dataset().ok_or(EvalError::NoDataset)?;
        debug!("Evaluating dataset {}", dataset.file_name());

        let evaluation = self.service.evaluate_dataset(&dataset).await?;
        self.state().current = Some(evaluation.clone());
        info!("Dataset {} evaluated", dataset.file_name());
        Ok(evaluation)
    }
}

/// Keeps an entity row `Evaluating` while its request is in flight
///
/// Dropped without [`EvaluatingGuard::finish`], the row goes back to
/// `Pending` so it can be retried. That covers a service error as well as
/// the evaluation future being dropped mid-request.
struct EvaluatingGuard<'a, S: ScoringService> {
    session: &'a EvaluationSession<S>,
    id: &'a str,
    finished: bool,
}

impl<'a, S: ScoringService> EvaluatingGuard<'a, S> {
    fn mark(session: &'a EvaluationSession<S>, id: &'a str) -> Self {
        session.state().registry.set_status(id, EntityStatus::Evaluating);
        Self {
            session,
            id,
            finished: false,
        }
    }

    /// Mark the row `Evaluated` and show the result
    fn finish(mut self, evaluation: &S::Evaluation) {
        self.finished = true;
        let mut state = self.session.state();
        state.registry.set_status(self.id, EntityStatus::Evaluated);
        state.current = Some(evaluation.clone());
    }
}

impl<S: ScoringService> Drop for EvaluatingGuard<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            self.session
                .state()
                .registry
                .set_status(self.id, EntityStatus::Pending);
        }
    }
}
