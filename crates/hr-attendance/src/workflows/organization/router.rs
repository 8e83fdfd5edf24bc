use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{CriterionDraft, DepartmentDraft, EmployeeDraft, EmployeeId, ShiftDraft};
use super::repository::OrganizationRepository;
use super::service::{OrganizationError, OrganizationService};
use crate::workflows::attendance::domain::ShiftId;
use crate::workflows::repository::RepositoryError;

#[derive(Debug, Deserialize)]
pub struct ShiftAvailabilityPayload {
    pub active: bool,
}

/// Router builder exposing the manager maintenance forms.
pub fn organization_router<O>(service: Arc<OrganizationService<O>>) -> Router
where
    O: OrganizationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/organization/departments",
            post(create_department_handler::<O>),
        )
        .route(
            "/api/v1/organization/employees",
            post(create_employee_handler::<O>),
        )
        .route(
            "/api/v1/organization/employees/{employee_id}/deactivate",
            post(deactivate_employee_handler::<O>),
        )
        .route(
            "/api/v1/organization/shifts",
            get(list_shifts_handler::<O>).post(create_shift_handler::<O>),
        )
        .route(
            "/api/v1/organization/shifts/{shift_id}/active",
            post(shift_availability_handler::<O>),
        )
        .route(
            "/api/v1/organization/criteria",
            get(list_criteria_handler::<O>).post(create_criterion_handler::<O>),
        )
        .with_state(service)
}

pub(crate) async fn create_department_handler<O>(
    State(service): State<Arc<OrganizationService<O>>>,
    Json(draft): Json<DepartmentDraft>,
) -> Response
where
    O: OrganizationRepository + 'static,
{
    match service.create_department(draft) {
        Ok(department) => (StatusCode::CREATED, Json(department)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_employee_handler<O>(
    State(service): State<Arc<OrganizationService<O>>>,
    Json(draft): Json<EmployeeDraft>,
) -> Response
where
    O: OrganizationRepository + 'static,
{
    match service.create_employee(draft) {
        Ok(employee) => (StatusCode::CREATED, Json(employee)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn deactivate_employee_handler<O>(
    State(service): State<Arc<OrganizationService<O>>>,
    Path(employee_id): Path<String>,
) -> Response
where
    O: OrganizationRepository + 'static,
{
    match service.deactivate_employee(&EmployeeId(employee_id)) {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_shift_handler<O>(
    State(service): State<Arc<OrganizationService<O>>>,
    Json(draft): Json<ShiftDraft>,
) -> Response
where
    O: OrganizationRepository + 'static,
{
    match service.create_shift(draft) {
        Ok(shift) => (StatusCode::CREATED, Json(shift)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_shifts_handler<O>(
    State(service): State<Arc<OrganizationService<O>>>,
) -> Response
where
    O: OrganizationRepository + 'static,
{
    match service.selectable_shifts(None) {
        Ok(shifts) => (StatusCode::OK, Json(shifts)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn shift_availability_handler<O>(
    State(service): State<Arc<OrganizationService<O>>>,
    Path(shift_id): Path<String>,
    Json(payload): Json<ShiftAvailabilityPayload>,
) -> Response
where
    O: OrganizationRepository + 'static,
{
    match service.set_shift_active(&ShiftId(shift_id), payload.active) {
        Ok(shift) => (StatusCode::OK, Json(shift)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_criterion_handler<O>(
    State(service): State<Arc<OrganizationService<O>>>,
    Json(draft): Json<CriterionDraft>,
) -> Response
where
    O: OrganizationRepository + 'static,
{
    match service.create_criterion(draft) {
        Ok(criterion) => (StatusCode::CREATED, Json(criterion)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_criteria_handler<O>(
    State(service): State<Arc<OrganizationService<O>>>,
) -> Response
where
    O: OrganizationRepository + 'static,
{
    let criteria = service.active_criteria(None);
    let total = service.criteria_weight_total(None);
    match (criteria, total) {
        (Ok(criteria), Ok(weight_total)) => (
            StatusCode::OK,
            Json(json!({ "criteria": criteria, "weight_total": weight_total })),
        )
            .into_response(),
        (Err(err), _) | (_, Err(err)) => err.into_response(),
    }
}

impl IntoResponse for OrganizationError {
    fn into_response(self) -> Response {
        let status = match &self {
            OrganizationError::MissingField(_) | OrganizationError::InvalidWeight(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            OrganizationError::DuplicateEmployeeNumber(_)
            | OrganizationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            OrganizationError::UnknownDepartment(_)
            | OrganizationError::UnknownEmployee(_)
            | OrganizationError::UnknownShift(_)
            | OrganizationError::UnknownCriterion(_)
            | OrganizationError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            OrganizationError::Repository(RepositoryError::Unavailable(detail)) => {
                error!(%detail, "organization store failure");
                let body = json!({ "error": "changes could not be saved, please retry" });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let body = json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
