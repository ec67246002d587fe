//! Solicitation pipeline: matching, qualification, and proposal decisioning.
//!
//! Records live in a [`SolicitationStore`] that checks every write. Decisions are computed by
//! the pure [`apply_decision`] table and applied through [`PipelineService`], which also
//! announces stage changes. Review sessions walk one company's matching queue a record at a
//! time, with reason capture for `No` and `Soft`.

pub mod decision;
pub mod domain;
pub mod import;
pub mod notify;
pub mod queues;
pub mod reason;
pub mod review;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use decision::{apply_decision, transition_for, Transition, TransitionError};
pub use domain::{
    Decision, NewSolicitation, Priority, ProposalStatus, SolicitationId, SolicitationRecord,
    Stage, Status,
};
pub use import::{ImportError, SolicitationImporter};
pub use notify::{NotificationError, NotificationKind, NotificationPublisher, PipelineNotification};
pub use queues::{queue_for, QueueSummary, StageQueues};
pub use reason::{ReasonCapture, ReasonOutcome, ReasonResolution};
pub use review::{group_by_company, CompanyGroup, ReviewError, ReviewSession, ReviewState, ReviewStep};
pub use router::{pipeline_router, DecisionRequest, QueuesView};
pub use service::{DecisionStep, PipelineService, PipelineServiceError};
pub use store::{check_invariants, ConsistencyViolation, SolicitationStore, StoreError};
