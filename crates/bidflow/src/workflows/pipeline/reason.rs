//! Free-text justification exchange for `No` and `Soft` decisions.
//!
//! A [`ReasonCapture`] is opened before the decision is applied and must be resolved exactly
//! once. Submitting an empty string is a skip and still applies the decision; cancelling
//! applies nothing.

use super::domain::{Decision, SolicitationId};

/// An open request for a reason, tied to one pending decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonCapture {
    id: SolicitationId,
    decision: Decision,
}

impl ReasonCapture {
    pub(crate) fn open(id: SolicitationId, decision: Decision) -> Self {
        Self { id, decision }
    }

    pub fn id(&self) -> &SolicitationId {
        &self.id
    }

    pub fn decision(&self) -> Decision {
        self.decision
    }

    pub fn prompt(&self) -> &'static str {
        match self.decision {
            Decision::Soft => "Why is this a soft match?",
            _ => "Why is this not a match?",
        }
    }

    /// Close the request. Consuming `self` keeps a capture from being resolved twice.
    pub fn resolve(self, resolution: ReasonResolution) -> ReasonOutcome {
        match resolution {
            ReasonResolution::Submit(reason) => ReasonOutcome::Proceed {
                id: self.id,
                decision: self.decision,
                reason,
            },
            ReasonResolution::Cancel => ReasonOutcome::Cancelled {
                id: self.id,
                decision: self.decision,
            },
        }
    }
}

/// Reviewer answer to a [`ReasonCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonResolution {
    Submit(String),
    Cancel,
}

impl ReasonResolution {
    pub fn skip() -> Self {
        Self::Submit(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonOutcome {
    Proceed {
        id: SolicitationId,
        decision: Decision,
        reason: String,
    },
    Cancelled {
        id: SolicitationId,
        decision: Decision,
    },
}
