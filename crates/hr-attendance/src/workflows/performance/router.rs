use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{EvaluationId, EvaluationSubmission};
use super::repository::EvaluationRepository;
use super::service::{EvaluationError, EvaluationService};
use crate::workflows::organization::domain::EmployeeId;
use crate::workflows::organization::OrganizationRepository;
use crate::workflows::repository::RepositoryError;

#[derive(Debug, Deserialize)]
pub struct ApprovalPayload {
    pub approver_id: EmployeeId,
}

/// Router builder exposing the evaluation form and its lifecycle actions.
pub fn evaluation_router<E, O>(service: Arc<EvaluationService<E, O>>) -> Router
where
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(submit_handler::<E, O>))
        .route(
            "/api/v1/evaluations/{evaluation_id}",
            get(fetch_handler::<E, O>).delete(delete_handler::<E, O>),
        )
        .route(
            "/api/v1/evaluations/{evaluation_id}/submit",
            post(mark_submitted_handler::<E, O>),
        )
        .route(
            "/api/v1/evaluations/{evaluation_id}/approve",
            post(approve_handler::<E, O>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<E, O>(
    State(service): State<Arc<EvaluationService<E, O>>>,
    Json(submission): Json<EvaluationSubmission>,
) -> Response
where
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.submit(submission, today) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn fetch_handler<E, O>(
    State(service): State<Arc<EvaluationService<E, O>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.get(&EvaluationId(evaluation_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn mark_submitted_handler<E, O>(
    State(service): State<Arc<EvaluationService<E, O>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.mark_submitted(&EvaluationId(evaluation_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn approve_handler<E, O>(
    State(service): State<Arc<EvaluationService<E, O>>>,
    Path(evaluation_id): Path<String>,
    Json(payload): Json<ApprovalPayload>,
) -> Response
where
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.approve(&EvaluationId(evaluation_id), &payload.approver_id) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<E, O>(
    State(service): State<Arc<EvaluationService<E, O>>>,
    Path(evaluation_id): Path<String>,
) -> Response
where
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.delete(&EvaluationId(evaluation_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for EvaluationError {
    fn into_response(self) -> Response {
        let status = match &self {
            EvaluationError::NoCriteria
            | EvaluationError::InvalidPeriod { .. }
            | EvaluationError::ApprovedOnSubmission
            | EvaluationError::ScoreOutOfRange { .. }
            | EvaluationError::DuplicateCriterion(_)
            | EvaluationError::InactiveCriterion(_)
            | EvaluationError::CriterionOutOfScope { .. }
            | EvaluationError::MissingCriterion(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EvaluationError::UnknownCriterion(_)
            | EvaluationError::UnknownEmployee(_)
            | EvaluationError::UnknownEvaluator(_)
            | EvaluationError::UnknownEvaluation(_)
            | EvaluationError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            EvaluationError::NotPermitted(_) => StatusCode::FORBIDDEN,
            EvaluationError::InvalidTransition { .. }
            | EvaluationError::ApprovedLocked(_)
            | EvaluationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            EvaluationError::Repository(RepositoryError::Unavailable(detail)) => {
                error!(%detail, "evaluation store failure");
                let body = json!({ "error": "evaluation could not be saved, please retry" });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
