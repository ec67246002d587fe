use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::domain::{Decision, NewSolicitation, SolicitationId};
use super::notify::NotificationPublisher;
use super::queues::{QueueSummary, StageQueues};
use super::service::{PipelineService, PipelineServiceError};

/// Body of a decision request. Reason capture happens client-side over HTTP.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DecisionRequest {
    pub decision: Decision,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueuesView {
    #[serde(flatten)]
    pub queues: StageQueues,
    pub summary: QueueSummary,
}

/// Router builder exposing the pipeline over JSON.
pub fn pipeline_router<N>(service: Arc<PipelineService<N>>) -> Router
where
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/solicitations",
            get(list_handler::<N>).post(ingest_handler::<N>),
        )
        .route("/api/v1/solicitations/:id", get(detail_handler::<N>))
        .route(
            "/api/v1/solicitations/:id/decision",
            post(decision_handler::<N>),
        )
        .route("/api/v1/queues", get(queues_handler::<N>))
        .route("/api/v1/review/groups", get(review_groups_handler::<N>))
        .with_state(service)
}

fn error_response(error: PipelineServiceError) -> Response {
    AppError::from(error).into_response()
}

pub(crate) async fn list_handler<N>(State(service): State<Arc<PipelineService<N>>>) -> Response
where
    N: NotificationPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.all())).into_response()
}

pub(crate) async fn ingest_handler<N>(
    State(service): State<Arc<PipelineService<N>>>,
    axum::Json(new): axum::Json<NewSolicitation>,
) -> Response
where
    N: NotificationPublisher + 'static,
{
    match service.ingest(new) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<N>(
    State(service): State<Arc<PipelineService<N>>>,
    Path(id): Path<String>,
) -> Response
where
    N: NotificationPublisher + 'static,
{
    match service.get(&SolicitationId(id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<N>(
    State(service): State<Arc<PipelineService<N>>>,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    N: NotificationPublisher + 'static,
{
    let id = SolicitationId(id);
    match service.decide(&id, request.decision, request.reason.as_deref()) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn queues_handler<N>(State(service): State<Arc<PipelineService<N>>>) -> Response
where
    N: NotificationPublisher + 'static,
{
    let view = QueuesView {
        queues: service.queues(),
        summary: service.summary(),
    };
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn review_groups_handler<N>(
    State(service): State<Arc<PipelineService<N>>>,
) -> Response
where
    N: NotificationPublisher + 'static,
{
    (StatusCode::OK, axum::Json(service.company_groups())).into_response()
}
