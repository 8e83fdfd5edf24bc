use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::attendance::AttendanceImportError;
use crate::workflows::reporting::ReportingError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Failure raised while starting the attendance service, running a CLI command
/// or summarising an attendance export outside the live store.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("attendance service configuration is invalid: {0}")]
    Config(#[from] ConfigError),
    #[error("attendance service logging could not start: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("attendance service io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("attendance service http failure: {0}")]
    Server(#[from] axum::Error),
    #[error("attendance export rejected: {0}")]
    Import(#[from] AttendanceImportError),
    #[error(transparent)]
    Report(#[from] ReportingError),
}

impl AppError {
    /// Short machine-readable tag carried in error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "configuration",
            AppError::Telemetry(_) => "telemetry",
            AppError::Io(_) | AppError::Server(_) => "service",
            AppError::Import(_) => "attendance_import",
            AppError::Report(_) => "report",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match self {
            AppError::Report(err) => err.into_response(),
            AppError::Import(_) => {
                let body = json!({ "error": self.to_string(), "kind": kind });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) | AppError::Server(_) => {
                error!(kind, error = %self, "attendance service failure");
                let body = json!({
                    "error": "the attendance service could not complete the request",
                    "kind": kind,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::reporting::trend_months;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn import_failures_name_the_rejected_line() {
        let err = AppError::from(AttendanceImportError::InvalidRow {
            line: 3,
            reason: "unknown status 'holiday'".to_string(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["kind"], "attendance_import");
        let message = body["error"].as_str().expect("message");
        assert!(message.starts_with("attendance export rejected"));
        assert!(message.contains("line 3"));
    }

    #[tokio::test]
    async fn startup_failures_hide_their_detail() {
        let err = AppError::from(ConfigError::InvalidWeekday("funday".to_string()));
        assert!(err.to_string().contains("funday"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["kind"], "configuration");
        assert!(!body["error"].as_str().expect("message").contains("funday"));
    }

    #[test]
    fn oversized_trend_windows_are_unprocessable() {
        let err = AppError::from(trend_months(Some(u32::MAX)).unwrap_err());
        assert_eq!(err.kind(), "report");
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
