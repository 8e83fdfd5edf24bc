use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{AttendanceId, BulkCheckInRequest, CheckInRequest, CheckOutRequest};
use super::repository::AttendanceRepository;
use super::service::{AttendanceError, AttendanceService};
use crate::workflows::organization::domain::EmployeeId;
use crate::workflows::organization::OrganizationRepository;
use crate::workflows::repository::RepositoryError;

/// Check-out by record id (supervisor view) or by employee (self-service).
#[derive(Debug, Deserialize)]
pub struct CheckOutPayload {
    #[serde(default)]
    pub record_id: Option<AttendanceId>,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloseDayPayload {
    pub date: NaiveDate,
}

/// Router builder exposing check-in, check-out and day-close endpoints.
pub fn attendance_router<R, O>(service: Arc<AttendanceService<R, O>>) -> Router
where
    R: AttendanceRepository + 'static,
    O: OrganizationRepository + 'static,
{
    Router::new()
        .route("/api/v1/attendance/check-in", post(check_in_handler::<R, O>))
        .route("/api/v1/attendance/check-out", post(check_out_handler::<R, O>))
        .route(
            "/api/v1/attendance/bulk-check-in",
            post(bulk_check_in_handler::<R, O>),
        )
        .route("/api/v1/attendance/close-day", post(close_day_handler::<R, O>))
        .route(
            "/api/v1/attendance/records/{record_id}",
            get(record_handler::<R, O>),
        )
        .with_state(service)
}

pub(crate) async fn check_in_handler<R, O>(
    State(service): State<Arc<AttendanceService<R, O>>>,
    Json(request): Json<CheckInRequest>,
) -> Response
where
    R: AttendanceRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.check_in(request) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn check_out_handler<R, O>(
    State(service): State<Arc<AttendanceService<R, O>>>,
    Json(payload): Json<CheckOutPayload>,
) -> Response
where
    R: AttendanceRepository + 'static,
    O: OrganizationRepository + 'static,
{
    let result = match (payload.record_id, payload.employee_id) {
        (Some(record_id), _) => service.check_out(CheckOutRequest {
            record_id,
            timestamp: payload.timestamp,
            notes: payload.notes,
        }),
        (None, Some(employee_id)) => {
            service.check_out_open(&employee_id, payload.timestamp, payload.notes)
        }
        (None, None) => {
            let body = json!({ "error": "record_id or employee_id is required" });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        }
    };

    match result {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn bulk_check_in_handler<R, O>(
    State(service): State<Arc<AttendanceService<R, O>>>,
    Json(request): Json<BulkCheckInRequest>,
) -> Response
where
    R: AttendanceRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.bulk_check_in(request) {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn close_day_handler<R, O>(
    State(service): State<Arc<AttendanceService<R, O>>>,
    Json(payload): Json<CloseDayPayload>,
) -> Response
where
    R: AttendanceRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.close_day(payload.date) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn record_handler<R, O>(
    State(service): State<Arc<AttendanceService<R, O>>>,
    Path(record_id): Path<String>,
) -> Response
where
    R: AttendanceRepository + 'static,
    O: OrganizationRepository + 'static,
{
    match service.get(&AttendanceId(record_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for AttendanceError {
    fn into_response(self) -> Response {
        let status = match &self {
            AttendanceError::ShiftNotSelected
            | AttendanceError::NoEmployeesSelected
            | AttendanceError::InactiveEmployee(_)
            | AttendanceError::InactiveShift(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AttendanceError::UnknownEmployee(_)
            | AttendanceError::UnknownShift(_)
            | AttendanceError::UnknownRecord(_)
            | AttendanceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            AttendanceError::NotPermitted(_) => StatusCode::FORBIDDEN,
            AttendanceError::DuplicateRecord { .. }
            | AttendanceError::NoOpenCheckIn
            | AttendanceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            AttendanceError::Repository(RepositoryError::Unavailable(detail)) => {
                error!(%detail, "attendance store failure");
                let body = json!({ "error": "attendance could not be saved, please retry" });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
