use chrono::{NaiveDate, NaiveTime};
use hr_attendance::config::WorkforceConfig;
use hr_attendance::workflows::attendance::{AttendanceService, WorkCalendar};
use hr_attendance::workflows::organization::OrganizationService;
use hr_attendance::workflows::performance::EvaluationService;
use hr_attendance::workflows::reporting::ReportingService;
use hr_attendance::workflows::InMemoryWorkforceStore;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Store = InMemoryWorkforceStore;

/// Every workflow service wired to one shared store.
#[derive(Clone)]
pub(crate) struct Workforce {
    pub(crate) organization: Arc<OrganizationService<Store>>,
    pub(crate) attendance: Arc<AttendanceService<Store, Store>>,
    pub(crate) evaluations: Arc<EvaluationService<Store, Store>>,
    pub(crate) reporting: Arc<ReportingService<Store, Store, Store>>,
}

impl Workforce {
    pub(crate) fn in_memory(settings: WorkforceConfig) -> Self {
        let store = Arc::new(InMemoryWorkforceStore::new());
        let calendar = WorkCalendar::from(&settings);

        Self {
            organization: Arc::new(OrganizationService::new(store.clone())),
            attendance: Arc::new(AttendanceService::new(
                store.clone(),
                store.clone(),
                calendar,
            )),
            evaluations: Arc::new(EvaluationService::new(store.clone(), store.clone())),
            reporting: Arc::new(ReportingService::new(
                store.clone(),
                store.clone(),
                store,
                settings,
            )),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_clock(raw: &str) -> Result<NaiveTime, String> {
    hr_attendance::workflows::attendance::clock::parse_clock(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as HH:MM"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
