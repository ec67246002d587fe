//! Swipe-style review sessions over a company's slice of the matching queue.

use std::collections::HashMap;
use std::mem;

use serde::Serialize;

use super::domain::{Decision, SolicitationRecord};
use super::notify::NotificationPublisher;
use super::reason::{ReasonCapture, ReasonResolution};
use super::service::{DecisionStep, PipelineService, PipelineServiceError};

/// Records for one company, as offered to the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyGroup {
    pub company_id: String,
    pub company_name: String,
    pub count: usize,
    pub records: Vec<SolicitationRecord>,
}

/// Group `records` by company, largest group first.
///
/// Groups with equal counts keep the order in which their company first appeared.
pub fn group_by_company(records: &[SolicitationRecord]) -> Vec<CompanyGroup> {
    let mut groups: Vec<CompanyGroup> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let position = *positions
            .entry(record.company_id.as_str())
            .or_insert_with(|| {
                groups.push(CompanyGroup {
                    company_id: record.company_id.clone(),
                    company_name: record.company_name.clone(),
                    count: 0,
                    records: Vec::new(),
                });
                groups.len() - 1
            });

        let group = &mut groups[position];
        group.count += 1;
        group.records.push(record.clone());
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    /// Cancelled by the reviewer.
    Idle,
    Active {
        cursor: usize,
    },
    AwaitingReason {
        cursor: usize,
        capture: ReasonCapture,
    },
    /// Every record in the group was decided.
    Closed,
}

/// What a session operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewStep {
    ReasonRequested { prompt: &'static str },
    Advanced { cursor: usize },
    Reverted { cursor: usize },
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("review cursor {cursor} is out of range for a group of {len}")]
    IndexOutOfRange { cursor: usize, len: usize },
    #[error("review session is not active")]
    NotActive,
    #[error("a reason must be submitted or cancelled before the next decision")]
    ReasonPending,
    #[error("no reason capture is open")]
    NoReasonPending,
    #[error(transparent)]
    Pipeline(#[from] PipelineServiceError),
}

/// One-at-a-time decisioning over a [`CompanyGroup`].
#[derive(Debug, Clone)]
pub struct ReviewSession {
    group: CompanyGroup,
    state: ReviewState,
}

impl ReviewSession {
    pub fn start(group: CompanyGroup) -> Self {
        let state = if group.records.is_empty() {
            ReviewState::Closed
        } else {
            ReviewState::Active { cursor: 0 }
        };

        Self { group, state }
    }

    pub fn group(&self) -> &CompanyGroup {
        &self.group
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.group.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group.records.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state {
            ReviewState::Active { cursor } | ReviewState::AwaitingReason { cursor, .. } => {
                Some(cursor)
            }
            ReviewState::Idle | ReviewState::Closed => None,
        }
    }

    pub fn current(&self) -> Option<&SolicitationRecord> {
        self.cursor().and_then(|cursor| self.group.records.get(cursor))
    }

    pub fn is_closed(&self) -> bool {
        self.state == ReviewState::Closed
    }

    /// Decide the record under the cursor.
    ///
    /// `No` and `Soft` without a `reason` open a reason capture instead of applying;
    /// resolve it with [`ReviewSession::resolve_reason`].
    pub fn decide<N>(
        &mut self,
        service: &PipelineService<N>,
        decision: Decision,
        reason: Option<&str>,
    ) -> Result<ReviewStep, ReviewError>
    where
        N: NotificationPublisher + 'static,
    {
        let cursor = match &self.state {
            ReviewState::Active { cursor } => *cursor,
            ReviewState::AwaitingReason { .. } => return Err(ReviewError::ReasonPending),
            ReviewState::Closed => {
                return Err(ReviewError::IndexOutOfRange {
                    cursor: self.len(),
                    len: self.len(),
                })
            }
            ReviewState::Idle => return Err(ReviewError::NotActive),
        };

        let id = self
            .group
            .records
            .get(cursor)
            .map(|record| record.id.clone())
            .ok_or(ReviewError::IndexOutOfRange {
                cursor,
                len: self.len(),
            })?;

        if reason.is_some() || !decision.requires_reason() {
            service.decide(&id, decision, reason)?;
            return Ok(self.advance(cursor));
        }

        match service.begin_decision(&id, decision)? {
            DecisionStep::AwaitingReason(capture) => {
                let prompt = capture.prompt();
                self.state = ReviewState::AwaitingReason { cursor, capture };
                Ok(ReviewStep::ReasonRequested { prompt })
            }
            DecisionStep::Applied(_) => Ok(self.advance(cursor)),
        }
    }

    /// Resolve an open reason capture. Cancel leaves both the record and the cursor as they were.
    pub fn resolve_reason<N>(
        &mut self,
        service: &PipelineService<N>,
        resolution: ReasonResolution,
    ) -> Result<ReviewStep, ReviewError>
    where
        N: NotificationPublisher + 'static,
    {
        let (cursor, capture) = match mem::replace(&mut self.state, ReviewState::Idle) {
            ReviewState::AwaitingReason { cursor, capture } => (cursor, capture),
            other => {
                self.state = other;
                return Err(ReviewError::NoReasonPending);
            }
        };

        match service.resolve_reason(capture, resolution) {
            Ok(Some(_)) => Ok(self.advance(cursor)),
            Ok(None) => {
                self.state = ReviewState::Active { cursor };
                Ok(ReviewStep::Reverted { cursor })
            }
            Err(err) => {
                self.state = ReviewState::Active { cursor };
                Err(err.into())
            }
        }
    }

    /// Abandon the session. Nothing is written; a finished session stays closed.
    pub fn cancel(&mut self) {
        if self.state != ReviewState::Closed {
            self.state = ReviewState::Idle;
        }
    }

    fn advance(&mut self, cursor: usize) -> ReviewStep {
        let next = cursor + 1;
        if next >= self.len() {
            self.state = ReviewState::Closed;
            ReviewStep::Closed
        } else {
            self.state = ReviewState::Active { cursor: next };
            ReviewStep::Advanced { cursor: next }
        }
    }
}
