use super::common::*;
use crate::workflows::pipeline::domain::{ProposalStatus, SolicitationId, Stage, Status};
use crate::workflows::pipeline::store::{ConsistencyViolation, SolicitationStore, StoreError};

#[test]
fn insert_new_admits_records_at_matching_pending() {
    let mut store = SolicitationStore::new();

    let record = store
        .insert_new(new_solicitation("rfp-1", "acme"))
        .expect("insert succeeds");

    assert_eq!(record.stage, Stage::Matching);
    assert_eq!(record.status, Status::Pending);
    assert_eq!(store.len(), 1);
    assert_eq!(store.queues().matching.len(), 1);
}

#[test]
fn insert_new_rejects_duplicate_ids() {
    let mut store = store_with(&[("rfp-1", "acme")]);

    match store.insert_new(new_solicitation("rfp-1", "globex")) {
        Err(StoreError::Conflict(id)) => assert_eq!(id, SolicitationId::from("rfp-1")),
        other => panic!("expected conflict, got {other:?}"),
    }
    assert_eq!(store.len(), 1);
    assert_eq!(store.all()[0].company_id, "acme");
}

#[test]
fn upsert_rejects_status_outside_stage() {
    let mut store = store_with(&[("rfp-1", "acme")]);
    let mut record = store.all()[0].clone();
    record.status = Status::Qualified;

    match store.upsert(record) {
        Err(ConsistencyViolation::IllegalStatus { stage, status, .. }) => {
            assert_eq!(stage, Stage::Matching);
            assert_eq!(status, Status::Qualified);
        }
        other => panic!("expected illegal status, got {other:?}"),
    }
    assert_eq!(store.all()[0].status, Status::Pending);
}

#[test]
fn upsert_rejects_reasons_on_the_wrong_status() {
    let mut store = store_with(&[("rfp-1", "acme")]);

    let mut stray_rejection = store.all()[0].clone();
    stray_rejection.rejection_reason = Some("left over".to_string());
    assert!(matches!(
        store.upsert(stray_rejection),
        Err(ConsistencyViolation::StrayRejectionReason { .. })
    ));

    let mut both = record_at("rfp-1", Stage::Matching, Status::Rejected);
    both.soft_match_reason = Some("also soft".to_string());
    assert!(matches!(
        store.upsert(both),
        Err(ConsistencyViolation::StraySoftMatchReason { .. })
    ));

    assert!(store.all()[0].rejection_reason.is_none());
}

#[test]
fn upsert_rejects_stage_regression() {
    let mut store = SolicitationStore::new();
    store
        .upsert(record_at("rfp-1", Stage::Qualification, Status::Matched))
        .expect("seed qualification record");

    match store.upsert(record_at("rfp-1", Stage::Matching, Status::Pending)) {
        Err(ConsistencyViolation::StageRegression { from, to, .. }) => {
            assert_eq!(from, Stage::Qualification);
            assert_eq!(to, Stage::Matching);
        }
        other => panic!("expected regression, got {other:?}"),
    }
    assert_eq!(store.all()[0].stage, Stage::Qualification);
    assert_eq!(store.queues().qualification.len(), 1);
}

#[test]
fn upsert_keeps_not_qualified_records_final() {
    let mut store = SolicitationStore::new();
    store
        .upsert(record_at("rfp-1", Stage::Qualification, Status::NotQualified))
        .expect("seed not qualified record");

    match store.upsert(record_at("rfp-1", Stage::Qualification, Status::Matched)) {
        Err(ConsistencyViolation::TerminalOutcome { stage, status, .. }) => {
            assert_eq!(stage, Stage::Qualification);
            assert_eq!(status, Status::NotQualified);
        }
        other => panic!("expected terminal outcome, got {other:?}"),
    }
    assert!(matches!(
        store.upsert(record_at("rfp-1", Stage::Proposal, Status::Qualified)),
        Err(ConsistencyViolation::TerminalOutcome { .. })
    ));

    assert_eq!(store.all()[0].status, Status::NotQualified);
    assert!(store.queues().proposal.is_empty());

    let mut annotated = store.all()[0].clone();
    annotated.score = 12;
    store
        .upsert(annotated)
        .expect("metadata update on a final record");
    assert_eq!(store.all()[0].score, 12);
}

#[test]
fn upsert_rejects_skipping_qualification() {
    let mut store = store_with(&[("rfp-1", "acme")]);

    match store.upsert(record_at("rfp-1", Stage::Proposal, Status::Qualified)) {
        Err(ConsistencyViolation::StageSkipped { from, to, .. }) => {
            assert_eq!(from, Stage::Matching);
            assert_eq!(to, Stage::Proposal);
        }
        other => panic!("expected skipped stage, got {other:?}"),
    }
    assert_eq!(store.all()[0].stage, Stage::Matching);
    assert_eq!(store.queues().matching.len(), 1);
    assert!(store.queues().proposal.is_empty());
}

#[test]
fn upsert_rejects_identity_changes() {
    let mut store = store_with(&[("rfp-1", "acme")]);

    let mut renamed = store.all()[0].clone();
    renamed.name = "Different Bid".to_string();
    assert!(matches!(
        store.upsert(renamed),
        Err(ConsistencyViolation::ImmutableField { field: "name", .. })
    ));

    let mut moved = store.all()[0].clone();
    moved.company_id = "globex".to_string();
    assert!(matches!(
        store.upsert(moved),
        Err(ConsistencyViolation::ImmutableField { field: "company_id", .. })
    ));

    let mut relabelled = store.all()[0].clone();
    relabelled.company_name = "Globex Holdings".to_string();
    assert!(matches!(
        store.upsert(relabelled),
        Err(ConsistencyViolation::ImmutableField { field: "company_name", .. })
    ));

    assert_eq!(store.all()[0].company_id, "acme");
}

#[test]
fn upsert_rejects_proposal_fields_before_proposal() {
    let mut store = SolicitationStore::new();
    let mut record = record_at("rfp-1", Stage::Qualification, Status::Matched);
    record.writer = Some("Sarah".to_string());

    assert!(matches!(
        store.upsert(record),
        Err(ConsistencyViolation::ProposalFieldsOutsideProposal { .. })
    ));
    assert!(store.is_empty());
}

#[test]
fn upsert_rejects_progress_beyond_complete() {
    let mut store = SolicitationStore::new();
    let mut record = record_at("rfp-1", Stage::Proposal, Status::Qualified);
    record.proposal_progress = Some(101);

    assert!(matches!(
        store.upsert(record),
        Err(ConsistencyViolation::ProposalProgressOutOfRange { progress: 101, .. })
    ));
}

#[test]
fn upsert_replaces_in_place_and_refreshes_queues() {
    let mut store = store_with(&[("rfp-1", "acme"), ("rfp-2", "acme"), ("rfp-3", "globex")]);

    let mut promoted = store.all()[1].clone();
    promoted.stage = Stage::Qualification;
    promoted.status = Status::Matched;
    store.upsert(promoted).expect("forward move accepted");

    let ids: Vec<&str> = store.all().iter().map(|record| record.id.0.as_str()).collect();
    assert_eq!(ids, vec!["rfp-1", "rfp-2", "rfp-3"]);
    assert_eq!(store.queues().matching.len(), 2);
    assert_eq!(store.queues().qualification.len(), 1);
    assert_eq!(store.queues().qualification[0].id.0, "rfp-2");

    let mut proposal = store.all()[1].clone();
    proposal.stage = Stage::Proposal;
    proposal.status = Status::Qualified;
    proposal.proposal_status = Some(ProposalStatus::InReview);
    proposal.proposal_progress = Some(55);
    proposal.writer = Some("Dana".to_string());
    store.upsert(proposal).expect("collaborator update accepted");

    assert_eq!(store.queues().proposal.len(), 1);
    assert!(store.queues().qualification.is_empty());
}

#[test]
fn fetch_reports_missing_ids() {
    let store = store_with(&[("rfp-1", "acme")]);

    match store.fetch(&SolicitationId::from("rfp-404")) {
        Err(StoreError::NotFound(id)) => assert_eq!(id.0, "rfp-404"),
        other => panic!("expected not found, got {other:?}"),
    }
}
