use bidflow::error::AppError;
use bidflow::workflows::pipeline::{
    ImportError, NewSolicitation, NotificationError, NotificationPublisher, PipelineNotification,
    PipelineService, Priority, SolicitationId, SolicitationImporter, SolicitationRecord,
    SolicitationStore,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps dispatched notifications in memory and mirrors them to the log.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<PipelineNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: PipelineNotification) -> Result<(), NotificationError> {
        info!(
            id = %notification.solicitation_id,
            kind = ?notification.kind,
            "{}",
            notification.message
        );
        let mut guard = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<PipelineNotification> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub(crate) type AppService = PipelineService<InMemoryNotificationPublisher>;

/// Seed a service from `seed_csv`, or from the built-in sample set when no export is given.
pub(crate) fn build_service(
    seed_csv: Option<PathBuf>,
) -> Result<(Arc<AppService>, Arc<InMemoryNotificationPublisher>), AppError> {
    let seed = match seed_csv {
        Some(path) => {
            let rows = SolicitationImporter::from_path(&path)?;
            info!(path = %path.display(), rows = rows.len(), "seeding from csv export");
            rows
        }
        None => sample_solicitations()?,
    };

    let store = SolicitationStore::with_records(seed)?;
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = Arc::new(PipelineService::new(store, notifications.clone()));
    Ok((service, notifications))
}

struct Sample {
    id: &'static str,
    name: &'static str,
    company: (&'static str, &'static str),
    due: (i32, u32, u32),
    value: u64,
    score: u8,
    match_percentage: u8,
    priority: Priority,
    account_manager: &'static str,
}

const TECHCORP: (&str, &str) = ("techcorp", "TechCorp Solutions");
const NORTHWIND: (&str, &str) = ("northwind", "Northwind Federal");
const BLUESKY: (&str, &str) = ("bluesky", "BlueSky Analytics");

/// Demo data: uneven per-company counts so review grouping has something to sort.
const SAMPLES: [Sample; 6] = [
    Sample {
        id: "sol-001",
        name: "Cloud Infrastructure Modernization",
        company: TECHCORP,
        due: (2025, 11, 15),
        value: 2_400_000,
        score: 92,
        match_percentage: 94,
        priority: Priority::High,
        account_manager: "Sarah Johnson",
    },
    Sample {
        id: "sol-002",
        name: "Cybersecurity Operations Support",
        company: TECHCORP,
        due: (2025, 11, 28),
        value: 1_150_000,
        score: 85,
        match_percentage: 88,
        priority: Priority::High,
        account_manager: "Sarah Johnson",
    },
    Sample {
        id: "sol-003",
        name: "Help Desk Tier 1 Services",
        company: TECHCORP,
        due: (2025, 12, 5),
        value: 480_000,
        score: 61,
        match_percentage: 67,
        priority: Priority::Low,
        account_manager: "Sarah Johnson",
    },
    Sample {
        id: "sol-004",
        name: "Logistics Data Platform",
        company: NORTHWIND,
        due: (2025, 12, 12),
        value: 3_100_000,
        score: 78,
        match_percentage: 81,
        priority: Priority::Medium,
        account_manager: "Michael Chen",
    },
    Sample {
        id: "sol-005",
        name: "Fleet Telematics Integration",
        company: NORTHWIND,
        due: (2026, 1, 9),
        value: 720_000,
        score: 70,
        match_percentage: 74,
        priority: Priority::Medium,
        account_manager: "Michael Chen",
    },
    Sample {
        id: "sol-006",
        name: "Predictive Maintenance Analytics",
        company: BLUESKY,
        due: (2026, 1, 20),
        value: 950_000,
        score: 83,
        match_percentage: 90,
        priority: Priority::High,
        account_manager: "Emily Rodriguez",
    },
];

impl Sample {
    fn to_new(&self, row: usize) -> Result<NewSolicitation, ImportError> {
        let (year, month, day) = self.due;
        let due_date =
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ImportError::InvalidRow {
                row,
                message: format!("{}: invalid due date {year}-{month}-{day}", self.id),
            })?;

        Ok(NewSolicitation {
            id: SolicitationId::from(self.id),
            name: self.name.to_string(),
            company_id: self.company.0.to_string(),
            company_name: self.company.1.to_string(),
            due_date,
            value: self.value,
            score: self.score,
            match_percentage: self.match_percentage,
            priority: self.priority,
            account_manager: self.account_manager.to_string(),
        })
    }
}

fn collect_samples(samples: &[Sample]) -> Result<Vec<NewSolicitation>, ImportError> {
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| sample.to_new(index + 1))
        .collect()
}

pub(crate) fn sample_solicitations() -> Result<Vec<NewSolicitation>, ImportError> {
    collect_samples(&SAMPLES)
}

pub(crate) fn print_queues(service: &AppService) {
    let queues = service.queues();
    let summary = service.summary();

    println!("Solicitation pipeline");
    println!(
        "{} total | {} matching | {} qualification | {} proposal | {} inactive",
        summary.total, summary.matching, summary.qualification, summary.proposal, summary.inactive
    );

    print_queue("Matching queue", &queues.matching);
    print_queue("Qualification queue", &queues.qualification);
    print_queue("Proposal queue", &queues.proposal);

    println!("\nReview groups");
    for group in service.company_groups() {
        println!("- {} ({}): {}", group.company_name, group.company_id, group.count);
    }
}

fn print_queue(title: &str, records: &[SolicitationRecord]) {
    if records.is_empty() {
        println!("\n{title}: none");
        return;
    }

    println!("\n{title}");
    for record in records {
        let writer = record
            .writer
            .as_deref()
            .map(|writer| format!(" | writer {writer}"))
            .unwrap_or_default();
        println!(
            "- {} | {} | {} | due {} | {}{}",
            record.id,
            record.name,
            record.company_name,
            record.due_date,
            record.status_label(),
            writer
        );
    }
}
