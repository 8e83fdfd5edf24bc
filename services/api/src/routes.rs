use crate::infra::{deserialize_optional_date, AppState, Workforce};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use hr_attendance::error::AppError;
use hr_attendance::workflows::attendance::{
    attendance_router, AttendanceCsvImporter, AttendanceRecord,
};
use hr_attendance::workflows::organization::organization_router;
use hr_attendance::workflows::performance::evaluation_router;
use hr_attendance::workflows::reporting::{
    compare_periods, count_by_status, month_bounds, monthly_trends, reporting_router,
    trend_months, MonthlyTrend, PeriodComparison, StatusCounts, MAX_TREND_MONTHS,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

#[derive(Debug, Deserialize)]
pub(crate) struct ImportReportRequest {
    pub(crate) csv: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) months: Option<u32>,
}

/// Summary of an attendance export that never touches the live store.
#[derive(Debug, Serialize)]
pub(crate) struct OfflineReport {
    pub(crate) today: NaiveDate,
    pub(crate) records: usize,
    pub(crate) counts: StatusCounts,
    pub(crate) attendance_rate: f64,
    pub(crate) months: Vec<MonthlyTrend>,
    pub(crate) comparison: PeriodComparison,
}

pub(crate) fn offline_report(
    records: &[AttendanceRecord],
    today: NaiveDate,
    months: u32,
) -> OfflineReport {
    let within = |bounds: Option<(NaiveDate, NaiveDate)>| match bounds {
        Some((start, end)) => count_by_status(
            records
                .iter()
                .filter(|record| record.falls_within(start, end)),
        ),
        None => StatusCounts::default(),
    };
    let counts = count_by_status(records);

    OfflineReport {
        today,
        records: records.len(),
        counts,
        attendance_rate: counts.attendance_rate(),
        months: monthly_trends(records, months.clamp(1, MAX_TREND_MONTHS), today),
        comparison: compare_periods(
            &within(month_bounds(today, 0)),
            &within(month_bounds(today, 1)),
        ),
    }
}

pub(crate) fn with_workforce_routes(workforce: &Workforce) -> axum::Router {
    attendance_router(workforce.attendance.clone())
        .merge(organization_router(workforce.organization.clone()))
        .merge(evaluation_router(workforce.evaluations.clone()))
        .merge(reporting_router(workforce.reporting.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/reports/import",
            axum::routing::post(import_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn import_report_endpoint(
    Json(payload): Json<ImportReportRequest>,
) -> Result<Json<OfflineReport>, AppError> {
    let ImportReportRequest { csv, today, months } = payload;

    let months = trend_months(months)?;
    let records = AttendanceCsvImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    Ok(Json(offline_report(&records, today, months)))
}
