use std::collections::HashMap;

use super::domain::{NewSolicitation, SolicitationId, SolicitationRecord, Stage, Status};
use super::queues::StageQueues;

/// A write that would leave the store holding an inconsistent record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyViolation {
    #[error("{id}: status {status:?} is not legal in stage {stage:?}")]
    IllegalStatus {
        id: SolicitationId,
        stage: Stage,
        status: Status,
    },
    #[error("{id}: rejection reason present while status is {status:?}")]
    StrayRejectionReason { id: SolicitationId, status: Status },
    #[error("{id}: soft match reason present while status is {status:?}")]
    StraySoftMatchReason { id: SolicitationId, status: Status },
    #[error("{id}: stage cannot move backward from {from:?} to {to:?}")]
    StageRegression {
        id: SolicitationId,
        from: Stage,
        to: Stage,
    },
    #[error("{id}: stage cannot skip from {from:?} to {to:?}")]
    StageSkipped {
        id: SolicitationId,
        from: Stage,
        to: Stage,
    },
    #[error("{id}: {stage:?}/{status:?} is a final outcome and cannot change")]
    TerminalOutcome {
        id: SolicitationId,
        stage: Stage,
        status: Status,
    },
    #[error("{id}: {field} cannot change once the record is stored")]
    ImmutableField {
        id: SolicitationId,
        field: &'static str,
    },
    #[error("{id}: proposal fields populated while stage is {stage:?}")]
    ProposalFieldsOutsideProposal { id: SolicitationId, stage: Stage },
    #[error("{id}: proposal progress {progress} exceeds 100")]
    ProposalProgressOutOfRange { id: SolicitationId, progress: u8 },
}

/// Error enumeration for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("solicitation {0} not found")]
    NotFound(SolicitationId),
    #[error("solicitation {0} already exists")]
    Conflict(SolicitationId),
    #[error(transparent)]
    Consistency(#[from] ConsistencyViolation),
}

/// Check a candidate record against the stage/status, reason, and progression invariants.
///
/// With a `previous` version, the write must also move at most one stage forward, leave a
/// `NotQualified` outcome untouched, and keep the descriptive identity fields.
pub fn check_invariants(
    record: &SolicitationRecord,
    previous: Option<&SolicitationRecord>,
) -> Result<(), ConsistencyViolation> {
    let id = || record.id.clone();

    if !record.stage.allows(record.status) {
        return Err(ConsistencyViolation::IllegalStatus {
            id: id(),
            stage: record.stage,
            status: record.status,
        });
    }

    if record.rejection_reason.is_some() && record.status != Status::Rejected {
        return Err(ConsistencyViolation::StrayRejectionReason {
            id: id(),
            status: record.status,
        });
    }

    if record.soft_match_reason.is_some() && record.status != Status::SoftMatch {
        return Err(ConsistencyViolation::StraySoftMatchReason {
            id: id(),
            status: record.status,
        });
    }

    let has_proposal_fields = record.proposal_status.is_some()
        || record.proposal_progress.is_some()
        || record.writer.is_some();
    if has_proposal_fields && record.stage != Stage::Proposal {
        return Err(ConsistencyViolation::ProposalFieldsOutsideProposal {
            id: id(),
            stage: record.stage,
        });
    }

    if let Some(progress) = record.proposal_progress.filter(|progress| *progress > 100) {
        return Err(ConsistencyViolation::ProposalProgressOutOfRange { id: id(), progress });
    }

    if let Some(previous) = previous {
        check_progression(record, previous)?;
    }

    Ok(())
}

fn check_progression(
    record: &SolicitationRecord,
    previous: &SolicitationRecord,
) -> Result<(), ConsistencyViolation> {
    let id = || record.id.clone();

    let immutable = [
        ("name", &record.name, &previous.name),
        ("company_id", &record.company_id, &previous.company_id),
        ("company_name", &record.company_name, &previous.company_name),
    ];
    if let Some(&(field, _, _)) = immutable.iter().find(|(_, next, prior)| next != prior) {
        return Err(ConsistencyViolation::ImmutableField { id: id(), field });
    }

    if previous.status == Status::NotQualified
        && (record.stage, record.status) != (previous.stage, previous.status)
    {
        return Err(ConsistencyViolation::TerminalOutcome {
            id: id(),
            stage: previous.stage,
            status: previous.status,
        });
    }

    if record.stage < previous.stage {
        return Err(ConsistencyViolation::StageRegression {
            id: id(),
            from: previous.stage,
            to: record.stage,
        });
    }

    if record.stage > previous.stage && previous.stage.next() != Some(record.stage) {
        return Err(ConsistencyViolation::StageSkipped {
            id: id(),
            from: previous.stage,
            to: record.stage,
        });
    }

    Ok(())
}

/// Authoritative in-memory collection of solicitations.
///
/// Records keep their insertion order. The stage queues are re-projected after every
/// successful write so readers never observe a stale view.
#[derive(Debug, Default)]
pub struct SolicitationStore {
    records: Vec<SolicitationRecord>,
    index: HashMap<SolicitationId, usize>,
    queues: StageQueues,
}

impl SolicitationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from ingested records, rejecting duplicates.
    pub fn with_records<I>(records: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = NewSolicitation>,
    {
        let mut store = Self::new();
        for record in records {
            store.insert_new(record)?;
        }
        Ok(store)
    }

    /// Insert or replace a record after validating it against the stored version.
    pub fn upsert(&mut self, record: SolicitationRecord) -> Result<(), ConsistencyViolation> {
        let slot = self.index.get(&record.id).copied();
        check_invariants(&record, slot.map(|position| &self.records[position]))?;

        match slot {
            Some(position) => self.records[position] = record,
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }

        self.queues = StageQueues::project(&self.records);
        Ok(())
    }

    /// Admit a freshly ingested solicitation at `Matching/Pending`.
    pub fn insert_new(
        &mut self,
        new: NewSolicitation,
    ) -> Result<SolicitationRecord, StoreError> {
        if self.index.contains_key(&new.id) {
            return Err(StoreError::Conflict(new.id));
        }

        let record = SolicitationRecord::from_new(new);
        self.upsert(record.clone())?;
        Ok(record)
    }

    pub fn get(&self, id: &SolicitationId) -> Option<&SolicitationRecord> {
        self.index.get(id).map(|position| &self.records[*position])
    }

    pub fn fetch(&self, id: &SolicitationId) -> Result<&SolicitationRecord, StoreError> {
        self.get(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    pub fn all(&self) -> &[SolicitationRecord] {
        &self.records
    }

    pub fn queues(&self) -> &StageQueues {
        &self.queues
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
