use super::domain::{Decision, ProposalStatus, SolicitationRecord, Stage, Status};

/// Error raised when a decision has no entry in the transition table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("decision '{decision}' is not legal for a {stage:?}/{status:?} record")]
    InvalidTransition {
        decision: Decision,
        stage: Stage,
        status: Status,
    },
}

/// Stage and status a record lands on after a legal decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub stage: Stage,
    pub status: Status,
}

impl Transition {
    const fn to(stage: Stage, status: Status) -> Self {
        Self { stage, status }
    }
}

/// The transition table. `None` means the decision is illegal from `(stage, status)`.
///
/// Matching decisions are accepted from every matching status so rejected and soft-matched
/// records can be revisited. `NotQualified` is a dead end and `Proposal` takes no decisions.
pub fn transition_for(stage: Stage, status: Status, decision: Decision) -> Option<Transition> {
    match (stage, status, decision) {
        (Stage::Matching, _, Decision::Yes) => {
            Some(Transition::to(Stage::Qualification, Status::Matched))
        }
        (Stage::Matching, _, Decision::No) => Some(Transition::to(Stage::Matching, Status::Rejected)),
        (Stage::Matching, _, Decision::Soft) => {
            Some(Transition::to(Stage::Matching, Status::SoftMatch))
        }
        (Stage::Qualification, Status::Matched | Status::Pending, Decision::Qualified) => {
            Some(Transition::to(Stage::Proposal, Status::Qualified))
        }
        (Stage::Qualification, Status::Matched | Status::Pending, Decision::NotQualified) => {
            Some(Transition::to(Stage::Qualification, Status::NotQualified))
        }
        _ => None,
    }
}

/// Compute the next state of `record` for `decision`.
///
/// Pure: the input is never touched and identical inputs always produce identical output.
/// `reason` is only consulted for `No` and `Soft`; `Some("")` records a skipped reason.
pub fn apply_decision(
    record: &SolicitationRecord,
    decision: Decision,
    reason: Option<&str>,
) -> Result<SolicitationRecord, TransitionError> {
    let transition = transition_for(record.stage, record.status, decision).ok_or(
        TransitionError::InvalidTransition {
            decision,
            stage: record.stage,
            status: record.status,
        },
    )?;

    let mut next = record.clone();
    next.stage = transition.stage;
    next.status = transition.status;
    next.rejection_reason = None;
    next.soft_match_reason = None;

    match decision {
        Decision::No => next.rejection_reason = reason.map(str::to_owned),
        Decision::Soft => next.soft_match_reason = reason.map(str::to_owned),
        Decision::Qualified => {
            next.proposal_status = Some(ProposalStatus::Drafting);
            next.proposal_progress = Some(0);
            next.writer = Some(record.account_manager.clone());
        }
        Decision::Yes | Decision::NotQualified => {}
    }

    Ok(next)
}
