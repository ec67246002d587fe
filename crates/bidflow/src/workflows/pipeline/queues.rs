use serde::Serialize;

use super::domain::{SolicitationRecord, Stage, Status};

/// Active work lists derived from the store, one per stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageQueues {
    pub matching: Vec<SolicitationRecord>,
    pub qualification: Vec<SolicitationRecord>,
    pub proposal: Vec<SolicitationRecord>,
}

impl StageQueues {
    /// Partition `records` into the three queues, preserving input order.
    ///
    /// Records with a terminal or parked outcome land in no queue.
    pub fn project(records: &[SolicitationRecord]) -> Self {
        let mut queues = Self::default();

        for record in records {
            match queue_for(record) {
                Some(Stage::Matching) => queues.matching.push(record.clone()),
                Some(Stage::Qualification) => queues.qualification.push(record.clone()),
                Some(Stage::Proposal) => queues.proposal.push(record.clone()),
                None => {}
            }
        }

        queues
    }

    pub fn queue(&self, stage: Stage) -> &[SolicitationRecord] {
        match stage {
            Stage::Matching => &self.matching,
            Stage::Qualification => &self.qualification,
            Stage::Proposal => &self.proposal,
        }
    }

    pub fn active_len(&self) -> usize {
        self.matching.len() + self.qualification.len() + self.proposal.len()
    }

    pub fn summary(&self, total: usize) -> QueueSummary {
        QueueSummary {
            matching: self.matching.len(),
            qualification: self.qualification.len(),
            proposal: self.proposal.len(),
            inactive: total.saturating_sub(self.active_len()),
            total,
        }
    }
}

/// The queue a record belongs to, if any.
pub fn queue_for(record: &SolicitationRecord) -> Option<Stage> {
    match (record.stage, record.status) {
        (Stage::Matching, Status::Pending) => Some(Stage::Matching),
        (Stage::Qualification, Status::Matched | Status::Pending) => Some(Stage::Qualification),
        (Stage::Proposal, Status::Qualified) => Some(Stage::Proposal),
        _ => None,
    }
}

/// Queue sizes for dashboards and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueSummary {
    pub matching: usize,
    pub qualification: usize,
    pub proposal: usize,
    pub inactive: usize,
    pub total: usize,
}
