//! End-to-end scenarios for the solicitation pipeline through its public facade.

mod common {
    use std::sync::{Arc, Mutex};

    use bidflow::workflows::pipeline::{
        NewSolicitation, NotificationError, NotificationPublisher, PipelineNotification,
        PipelineService, Priority, SolicitationId, SolicitationStore,
    };
    use chrono::NaiveDate;

    pub(super) fn solicitation(id: &str, company_id: &str, manager: &str) -> NewSolicitation {
        NewSolicitation {
            id: SolicitationId::from(id),
            name: format!("Solicitation {id}"),
            company_id: company_id.to_string(),
            company_name: format!("Company {company_id}"),
            due_date: NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date"),
            value: 480_000,
            score: 91,
            match_percentage: 88,
            priority: Priority::Medium,
            account_manager: manager.to_string(),
        }
    }

    #[derive(Default)]
    pub(super) struct RecordingPublisher {
        events: Mutex<Vec<PipelineNotification>>,
    }

    impl RecordingPublisher {
        pub(super) fn events(&self) -> Vec<PipelineNotification> {
            self.events.lock().expect("publisher mutex poisoned").clone()
        }
    }

    impl NotificationPublisher for RecordingPublisher {
        fn publish(&self, notification: PipelineNotification) -> Result<(), NotificationError> {
            self.events
                .lock()
                .expect("publisher mutex poisoned")
                .push(notification);
            Ok(())
        }
    }

    pub(super) fn service(
        seed: Vec<NewSolicitation>,
    ) -> (PipelineService<RecordingPublisher>, Arc<RecordingPublisher>) {
        let publisher = Arc::new(RecordingPublisher::default());
        let store = SolicitationStore::with_records(seed).expect("seed store");
        (PipelineService::new(store, publisher.clone()), publisher)
    }
}

use bidflow::workflows::pipeline::{
    Decision, NotificationKind, ProposalStatus, ReasonResolution, ReviewSession, ReviewStep,
    SolicitationId, Stage, Status,
};
use common::{service, solicitation};

#[test]
fn matched_solicitation_flows_into_proposal_with_account_manager_as_writer() {
    let (service, publisher) = service(vec![solicitation("rfp-1", "a", "Sarah")]);
    let id = SolicitationId::from("rfp-1");

    let matched = service.decide(&id, Decision::Yes, None).expect("match");
    assert_eq!((matched.stage, matched.status), (Stage::Qualification, Status::Matched));
    assert!(matched.rejection_reason.is_none() && matched.soft_match_reason.is_none());

    let qualified = service
        .decide(&id, Decision::Qualified, None)
        .expect("qualify");
    assert_eq!(qualified.stage, Stage::Proposal);
    assert_eq!(qualified.status, Status::Qualified);
    assert_eq!(qualified.proposal_status, Some(ProposalStatus::Drafting));
    assert_eq!(qualified.proposal_progress, Some(0));
    assert_eq!(qualified.writer.as_deref(), Some("Sarah"));

    let queues = service.queues();
    assert!(queues.matching.is_empty());
    assert!(queues.qualification.is_empty());
    assert_eq!(queues.proposal.len(), 1);

    let kinds: Vec<NotificationKind> = publisher.events().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NotificationKind::MatchApproved,
            NotificationKind::SolicitationQualified
        ]
    );
}

#[test]
fn review_session_over_largest_company_group() {
    let (service, _) = service(vec![
        solicitation("rfp-1", "b", "Marcus"),
        solicitation("rfp-2", "a", "Sarah"),
        solicitation("rfp-3", "a", "Sarah"),
        solicitation("rfp-4", "a", "Sarah"),
    ]);

    let groups = service.company_groups();
    let counts: Vec<(String, usize)> = groups
        .iter()
        .map(|group| (group.company_id.clone(), group.count))
        .collect();
    assert_eq!(counts, vec![("a".to_string(), 3), ("b".to_string(), 1)]);

    let mut session = ReviewSession::start(groups[0].clone());

    assert_eq!(
        session.decide(&service, Decision::Yes, None).expect("yes"),
        ReviewStep::Advanced { cursor: 1 }
    );

    assert!(matches!(
        session.decide(&service, Decision::No, None).expect("no"),
        ReviewStep::ReasonRequested { .. }
    ));
    assert_eq!(
        session
            .resolve_reason(&service, ReasonResolution::Cancel)
            .expect("cancel"),
        ReviewStep::Reverted { cursor: 1 }
    );
    assert_eq!(
        service
            .get(&SolicitationId::from("rfp-3"))
            .expect("present")
            .status,
        Status::Pending
    );

    session.decide(&service, Decision::No, None).expect("no again");
    assert_eq!(
        session
            .resolve_reason(&service, ReasonResolution::skip())
            .expect("skip"),
        ReviewStep::Advanced { cursor: 2 }
    );

    session
        .decide(&service, Decision::Soft, Some("teaming required"))
        .expect("soft");
    assert!(session.is_closed());

    let summary = service.summary();
    assert_eq!(summary.matching, 1);
    assert_eq!(summary.qualification, 1);
    assert_eq!(summary.inactive, 2);

    let rejected = service.get(&SolicitationId::from("rfp-3")).expect("present");
    assert_eq!(rejected.status, Status::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some(""));
}
