use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::pipeline::domain::{
    NewSolicitation, Priority, SolicitationId, SolicitationRecord, Stage, Status,
};
use crate::workflows::pipeline::notify::{
    NotificationError, NotificationPublisher, PipelineNotification,
};
use crate::workflows::pipeline::{pipeline_router, PipelineService, SolicitationStore};

pub(super) fn new_solicitation(id: &str, company_id: &str) -> NewSolicitation {
    NewSolicitation {
        id: SolicitationId::from(id),
        name: format!("RFP {id}"),
        company_id: company_id.to_string(),
        company_name: format!("{} Holdings", company_id.to_uppercase()),
        due_date: NaiveDate::from_ymd_opt(2025, 11, 14).expect("valid date"),
        value: 125_000,
        score: 78,
        match_percentage: 86,
        priority: Priority::High,
        account_manager: "Sarah".to_string(),
    }
}

pub(super) fn pending_record(id: &str) -> SolicitationRecord {
    SolicitationRecord::from_new(new_solicitation(id, "acme"))
}

/// A consistent record parked at `(stage, status)`.
pub(super) fn record_at(id: &str, stage: Stage, status: Status) -> SolicitationRecord {
    let mut record = pending_record(id);
    record.stage = stage;
    record.status = status;
    match status {
        Status::Rejected => record.rejection_reason = Some("out of scope".to_string()),
        Status::SoftMatch => record.soft_match_reason = Some("partial fit".to_string()),
        _ => {}
    }
    if stage == Stage::Proposal {
        record.proposal_status = Some(crate::workflows::pipeline::ProposalStatus::Drafting);
        record.proposal_progress = Some(40);
        record.writer = Some("Sarah".to_string());
    }
    record
}

/// Every `(stage, status)` pair the store accepts.
pub(super) fn legal_records() -> Vec<SolicitationRecord> {
    let mut records = Vec::new();
    for stage in Stage::ordered() {
        for status in Status::all() {
            if stage.allows(status) {
                records.push(record_at(
                    &format!("{}-{}", stage.label(), status.label()),
                    stage,
                    status,
                ));
            }
        }
    }
    records
}

pub(super) fn store_with(ids_and_companies: &[(&str, &str)]) -> SolicitationStore {
    SolicitationStore::with_records(
        ids_and_companies
            .iter()
            .map(|(id, company)| new_solicitation(id, company)),
    )
    .expect("seed store")
}

pub(super) fn build_service(
    ids_and_companies: &[(&str, &str)],
) -> (PipelineService<MemoryNotifications>, Arc<MemoryNotifications>) {
    let notifications = Arc::new(MemoryNotifications::default());
    let service = PipelineService::new(store_with(ids_and_companies), notifications.clone());
    (service, notifications)
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<PipelineNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<PipelineNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: PipelineNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct OfflineNotifications;

impl NotificationPublisher for OfflineNotifications {
    fn publish(&self, _notification: PipelineNotification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("toast service offline".to_string()))
    }
}

pub(super) fn router_with_service(service: PipelineService<MemoryNotifications>) -> axum::Router {
    pipeline_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
