use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tracked solicitations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SolicitationId(pub String);

impl fmt::Display for SolicitationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SolicitationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Coarse pipeline phase. Declaration order is the only legal direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Matching,
    Qualification,
    Proposal,
}

impl Stage {
    pub const fn ordered() -> [Self; 3] {
        [Self::Matching, Self::Qualification, Self::Proposal]
    }

    /// The stage a record enters next, if any.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Matching => Some(Self::Qualification),
            Self::Qualification => Some(Self::Proposal),
            Self::Proposal => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Matching => "Matching",
            Self::Qualification => "Qualification",
            Self::Proposal => "Proposal",
        }
    }

    /// Whether `status` is a legal value while a record sits in this stage.
    pub const fn allows(self, status: Status) -> bool {
        matches!(
            (self, status),
            (
                Self::Matching,
                Status::Pending | Status::Rejected | Status::SoftMatch
            ) | (
                Self::Qualification,
                Status::Matched | Status::Pending | Status::NotQualified
            ) | (Self::Proposal, Status::Qualified)
        )
    }
}

/// Fine-grained state within a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Matched,
    Rejected,
    SoftMatch,
    Qualified,
    NotQualified,
}

impl Status {
    pub const fn all() -> [Self; 6] {
        [
            Self::Pending,
            Self::Matched,
            Self::Rejected,
            Self::SoftMatch,
            Self::Qualified,
            Self::NotQualified,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Matched => "Matched",
            Self::Rejected => "Rejected",
            Self::SoftMatch => "Soft Match",
            Self::Qualified => "Qualified",
            Self::NotQualified => "Not Qualified",
        }
    }
}

/// Reviewer action driving a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Yes,
    No,
    Soft,
    Qualified,
    NotQualified,
}

impl Decision {
    pub const fn all() -> [Self; 5] {
        [
            Self::Yes,
            Self::No,
            Self::Soft,
            Self::Qualified,
            Self::NotQualified,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Soft => "soft",
            Self::Qualified => "qualified",
            Self::NotQualified => "not_qualified",
        }
    }

    /// Decisions that open a reason capture before they are applied.
    pub const fn requires_reason(self) -> bool {
        matches!(self, Self::No | Self::Soft)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" | "med" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Drafting,
    InReview,
    Submitted,
}

impl ProposalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Drafting => "Drafting",
            Self::InReview => "In Review",
            Self::Submitted => "Submitted",
        }
    }
}

/// Descriptive payload supplied by ingestion; pipeline state is never accepted from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSolicitation {
    pub id: SolicitationId,
    pub name: String,
    pub company_id: String,
    pub company_name: String,
    pub due_date: NaiveDate,
    pub value: u64,
    pub score: u8,
    pub match_percentage: u8,
    pub priority: Priority,
    pub account_manager: String,
}

/// The single entity tracked by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolicitationRecord {
    pub id: SolicitationId,
    pub name: String,
    pub company_id: String,
    pub company_name: String,
    pub stage: Stage,
    pub status: Status,
    pub due_date: NaiveDate,
    pub value: u64,
    pub score: u8,
    pub match_percentage: u8,
    pub priority: Priority,
    pub account_manager: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_match_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_status: Option<ProposalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writer: Option<String>,
}

impl SolicitationRecord {
    /// Fresh records always enter the pipeline at `Matching/Pending`.
    pub fn from_new(new: NewSolicitation) -> Self {
        let NewSolicitation {
            id,
            name,
            company_id,
            company_name,
            due_date,
            value,
            score,
            match_percentage,
            priority,
            account_manager,
        } = new;

        Self {
            id,
            name,
            company_id,
            company_name,
            stage: Stage::Matching,
            status: Status::Pending,
            due_date,
            value,
            score,
            match_percentage,
            priority,
            account_manager,
            rejection_reason: None,
            soft_match_reason: None,
            proposal_status: None,
            proposal_progress: None,
            writer: None,
        }
    }

    pub fn status_label(&self) -> String {
        format!("{} / {}", self.stage.label(), self.status.label())
    }
}
