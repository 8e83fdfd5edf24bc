use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::service::{trend_months, ReportingError, ReportingService};
use super::views::AggregateQuery;
use crate::workflows::attendance::repository::AttendanceRepository;
use crate::workflows::organization::domain::DepartmentId;
use crate::workflows::organization::OrganizationRepository;
use crate::workflows::performance::repository::EvaluationRepository;
use crate::workflows::repository::RepositoryError;

#[derive(Debug, Default, Deserialize)]
pub struct DepartmentsPayload {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendsPayload {
    #[serde(default)]
    pub months: Option<u32>,
    #[serde(default)]
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyPayload {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
}

/// Router builder exposing the dashboard, reports and analytics aggregates.
pub fn reporting_router<R, E, O>(service: Arc<ReportingService<R, E, O>>) -> Router
where
    R: AttendanceRepository + 'static,
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    Router::new()
        .route("/api/v1/reports/summary", post(summary_handler::<R, E, O>))
        .route(
            "/api/v1/reports/departments",
            post(departments_handler::<R, E, O>),
        )
        .route("/api/v1/reports/trends", post(trends_handler::<R, E, O>))
        .route("/api/v1/reports/daily", post(daily_handler::<R, E, O>))
        .with_state(service)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) async fn summary_handler<R, E, O>(
    State(service): State<Arc<ReportingService<R, E, O>>>,
    Json(query): Json<AggregateQuery>,
) -> Response
where
    R: AttendanceRepository + 'static,
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.get_aggregates(&query) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn departments_handler<R, E, O>(
    State(service): State<Arc<ReportingService<R, E, O>>>,
    Json(payload): Json<DepartmentsPayload>,
) -> Response
where
    R: AttendanceRepository + 'static,
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    let today = payload.today.unwrap_or_else(today);
    let mut query = service.lookback_query(today);
    if let Some(start) = payload.start {
        query.start = start;
    }
    if let Some(end) = payload.end {
        query.end = end;
    }

    match service.department_breakdown(&query, today) {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn trends_handler<R, E, O>(
    State(service): State<Arc<ReportingService<R, E, O>>>,
    Json(payload): Json<TrendsPayload>,
) -> Response
where
    R: AttendanceRepository + 'static,
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    let months = match trend_months(payload.months) {
        Ok(months) => months,
        Err(err) => return err.into_response(),
    };
    let today = payload.today.unwrap_or_else(today);
    match service.trend_report(months, today, payload.department_id.as_ref()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn daily_handler<R, E, O>(
    State(service): State<Arc<ReportingService<R, E, O>>>,
    Json(payload): Json<DailyPayload>,
) -> Response
where
    R: AttendanceRepository + 'static,
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    let date = payload.date.unwrap_or_else(today);
    match service.daily_snapshot(date, payload.department_id.as_ref()) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for ReportingError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReportingError::InvalidRange { .. } | ReportingError::InvalidMonths(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ReportingError::UnknownDepartment(_)
            | ReportingError::UnknownEmployee(_)
            | ReportingError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            ReportingError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ReportingError::Repository(RepositoryError::Unavailable(detail)) => {
                error!(%detail, "report store failure");
                let body = json!({ "error": "report data is temporarily unavailable" });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
