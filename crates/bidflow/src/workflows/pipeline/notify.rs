use serde::{Deserialize, Serialize};

use super::domain::{SolicitationId, SolicitationRecord, Stage};

/// Transitions that are announced to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MatchApproved,
    SolicitationQualified,
}

impl NotificationKind {
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::MatchApproved => "Match approved",
            Self::SolicitationQualified => "Solicitation qualified",
        }
    }
}

/// Payload handed to toast/e-mail collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineNotification {
    pub kind: NotificationKind,
    pub solicitation_id: SolicitationId,
    pub name: String,
    pub company_name: String,
    pub message: String,
}

impl PipelineNotification {
    /// The notification owed for moving from `before` to `after`, if any.
    ///
    /// Only Matching -> Qualification and Qualification -> Proposal announce anything.
    pub fn for_transition(before: &SolicitationRecord, after: &SolicitationRecord) -> Option<Self> {
        let kind = match (before.stage, after.stage) {
            (Stage::Matching, Stage::Qualification) => NotificationKind::MatchApproved,
            (Stage::Qualification, Stage::Proposal) => NotificationKind::SolicitationQualified,
            _ => return None,
        };

        Some(Self {
            kind,
            solicitation_id: after.id.clone(),
            name: after.name.clone(),
            company_name: after.company_name.clone(),
            message: format!("{}: {}", kind.default_message(), after.name),
        })
    }
}

/// Outbound hook for transition notifications.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: PipelineNotification) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
