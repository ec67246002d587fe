use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::decision::{apply_decision, transition_for, TransitionError};
use super::domain::{Decision, NewSolicitation, SolicitationId, SolicitationRecord};
use super::notify::{NotificationPublisher, PipelineNotification};
use super::queues::{QueueSummary, StageQueues};
use super::reason::{ReasonCapture, ReasonOutcome, ReasonResolution};
use super::review::{group_by_company, CompanyGroup};
use super::store::{ConsistencyViolation, SolicitationStore, StoreError};

/// Service composing the store, the decision table, and outbound notifications.
///
/// The store sits behind a single mutex so every decision is applied as one
/// read-compute-write step.
pub struct PipelineService<N> {
    store: Mutex<SolicitationStore>,
    notifications: Arc<N>,
}

/// Result of starting a decision that may need a reason first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionStep {
    Applied(SolicitationRecord),
    AwaitingReason(ReasonCapture),
}

impl<N> PipelineService<N>
where
    N: NotificationPublisher + 'static,
{
    pub fn new(store: SolicitationStore, notifications: Arc<N>) -> Self {
        Self {
            store: Mutex::new(store),
            notifications,
        }
    }

    fn store(&self) -> MutexGuard<'_, SolicitationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admit a new solicitation at `Matching/Pending`.
    pub fn ingest(
        &self,
        new: NewSolicitation,
    ) -> Result<SolicitationRecord, PipelineServiceError> {
        let record = self.store().insert_new(new)?;
        info!(id = %record.id, company = %record.company_id, "solicitation ingested");
        Ok(record)
    }

    /// Apply `decision` to the stored record and announce qualifying transitions.
    pub fn decide(
        &self,
        id: &SolicitationId,
        decision: Decision,
        reason: Option<&str>,
    ) -> Result<SolicitationRecord, PipelineServiceError> {
        let (before, after) = {
            let mut store = self.store();
            let before = store.fetch(id)?.clone();

            let after = apply_decision(&before, decision, reason).map_err(|err| {
                warn!(%id, %decision, error = %err, "decision rejected");
                err
            })?;

            store.upsert(after.clone()).map_err(|err| {
                warn!(%id, %decision, error = %err, "store write rejected");
                err
            })?;

            (before, after)
        };

        info!(
            %id,
            %decision,
            stage = after.stage.label(),
            status = after.status.label(),
            "decision applied"
        );

        if let Some(notification) = PipelineNotification::for_transition(&before, &after) {
            if let Err(err) = self.notifications.publish(notification) {
                warn!(%id, error = %err, "notification dispatch failed");
            }
        }

        Ok(after)
    }

    /// Start a decision, opening a reason capture for `No` and `Soft`.
    ///
    /// Legality is checked before the capture is opened so a reviewer is never asked to
    /// justify a decision that cannot be applied.
    pub fn begin_decision(
        &self,
        id: &SolicitationId,
        decision: Decision,
    ) -> Result<DecisionStep, PipelineServiceError> {
        if !decision.requires_reason() {
            return self.decide(id, decision, None).map(DecisionStep::Applied);
        }

        let store = self.store();
        let record = store.fetch(id)?;
        if transition_for(record.stage, record.status, decision).is_none() {
            let err = TransitionError::InvalidTransition {
                decision,
                stage: record.stage,
                status: record.status,
            };
            warn!(%id, %decision, error = %err, "decision rejected");
            return Err(err.into());
        }

        Ok(DecisionStep::AwaitingReason(ReasonCapture::open(
            id.clone(),
            decision,
        )))
    }

    /// Finish a reason capture. Returns `None` when the reviewer cancelled.
    pub fn resolve_reason(
        &self,
        capture: ReasonCapture,
        resolution: ReasonResolution,
    ) -> Result<Option<SolicitationRecord>, PipelineServiceError> {
        match capture.resolve(resolution) {
            ReasonOutcome::Proceed {
                id,
                decision,
                reason,
            } => self.decide(&id, decision, Some(&reason)).map(Some),
            ReasonOutcome::Cancelled { id, decision } => {
                debug!(%id, %decision, "reason capture cancelled");
                Ok(None)
            }
        }
    }

    pub fn get(&self, id: &SolicitationId) -> Result<SolicitationRecord, PipelineServiceError> {
        Ok(self.store().fetch(id)?.clone())
    }

    pub fn all(&self) -> Vec<SolicitationRecord> {
        self.store().all().to_vec()
    }

    pub fn queues(&self) -> StageQueues {
        self.store().queues().clone()
    }

    pub fn summary(&self) -> QueueSummary {
        let store = self.store();
        store.queues().summary(store.len())
    }

    /// The matching queue grouped by company, largest group first.
    pub fn company_groups(&self) -> Vec<CompanyGroup> {
        group_by_company(&self.store().queues().matching)
    }
}

/// Error raised by the pipeline service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Consistency(#[from] ConsistencyViolation),
    #[error(transparent)]
    Store(#[from] StoreError),
}
