use std::sync::Arc;

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::config::WorkforceConfig;
use crate::workflows::attendance::domain::{
    AttendanceId, AttendanceRecord, CheckInMethod, CheckInRequest, ShiftType, WorkShift,
};
use crate::workflows::attendance::repository::AttendanceRepository;
use crate::workflows::attendance::{AttendanceService, WorkCalendar};
use crate::workflows::memory::InMemoryWorkforceStore;
use crate::workflows::organization::domain::{
    CriterionDraft, Department, DepartmentDraft, Employee, EmployeeDraft, EmployeeId, Role,
    ShiftDraft,
};
use crate::workflows::organization::OrganizationService;
use crate::workflows::performance::domain::{
    CriterionScore, EvaluationCriterion, EvaluationStatus, EvaluationSubmission,
};
use crate::workflows::performance::EvaluationService;
use crate::workflows::reporting::ReportingService;
use crate::workflows::repository::RepositoryError;

pub(super) type Store = InMemoryWorkforceStore;

/// Services sharing one in-memory store seeded with a small sales team.
pub(super) struct Fixture {
    pub(super) store: Arc<Store>,
    pub(super) organization: Arc<OrganizationService<Store>>,
    pub(super) attendance: Arc<AttendanceService<Store, Store>>,
    pub(super) evaluations: Arc<EvaluationService<Store, Store>>,
    pub(super) reporting: Arc<ReportingService<Store, Store, Store>>,
    pub(super) sales: Department,
    pub(super) manager: Employee,
    pub(super) supervisor: Employee,
    pub(super) staff: Vec<Employee>,
    pub(super) morning: WorkShift,
    pub(super) criteria: Vec<EvaluationCriterion>,
}

pub(super) fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
}

/// 2024-03-04 is a Monday.
pub(super) fn monday() -> NaiveDate {
    date(3, 4)
}

pub(super) fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn employee_draft(name: &str, number: &str, role: Role, department: &Department) -> EmployeeDraft {
    EmployeeDraft {
        full_name: name.to_string(),
        email: format!("{}@example.com", number.to_lowercase()),
        phone: None,
        department_id: Some(department.id.clone()),
        role,
        employee_number: number.to_string(),
        hire_date: date(1, 2),
    }
}

pub(super) fn shift_draft(name: &str, start: NaiveTime, end: NaiveTime, grace: u32) -> ShiftDraft {
    ShiftDraft {
        name: name.to_string(),
        start_time: start,
        end_time: end,
        shift_type: ShiftType::Morning,
        grace_period_minutes: grace,
        department_id: None,
    }
}

pub(super) fn criterion_draft(name: &str, weight: f64) -> CriterionDraft {
    CriterionDraft {
        name: name.to_string(),
        description: None,
        weight,
        department_id: None,
    }
}

pub(super) fn build_fixture() -> Fixture {
    let store = Arc::new(InMemoryWorkforceStore::new());
    let settings = WorkforceConfig::default();
    let organization = Arc::new(OrganizationService::new(store.clone()));
    let attendance = Arc::new(AttendanceService::new(
        store.clone(),
        store.clone(),
        WorkCalendar::from(&settings),
    ));
    let evaluations = Arc::new(EvaluationService::new(store.clone(), store.clone()));
    let reporting = Arc::new(ReportingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        settings,
    ));

    let sales = organization
        .create_department(DepartmentDraft {
            name: "Sales".to_string(),
            description: Some("Field and counter sales".to_string()),
        })
        .expect("department created");
    let manager = organization
        .create_employee(employee_draft("Huda Saleh", "M-001", Role::Manager, &sales))
        .expect("manager created");
    let supervisor = organization
        .create_employee(employee_draft("Omar Nasser", "S-001", Role::Supervisor, &sales))
        .expect("supervisor created");
    let staff = vec![
        organization
            .create_employee(employee_draft("Amal Hassan", "E-001", Role::Employee, &sales))
            .expect("employee created"),
        organization
            .create_employee(employee_draft("Badr Khalil", "E-002", Role::Employee, &sales))
            .expect("employee created"),
    ];
    let morning = organization
        .create_shift(shift_draft("Morning", clock(8, 0), clock(16, 0), 15))
        .expect("shift created");
    let criteria = vec![
        organization
            .create_criterion(criterion_draft("Punctuality", 40.0))
            .expect("criterion created"),
        organization
            .create_criterion(criterion_draft("Quality", 35.0))
            .expect("criterion created"),
        organization
            .create_criterion(criterion_draft("Teamwork", 25.0))
            .expect("criterion created"),
    ];

    Fixture {
        store,
        organization,
        attendance,
        evaluations,
        reporting,
        sales,
        manager,
        supervisor,
        staff,
        morning,
        criteria,
    }
}

impl Fixture {
    pub(super) fn check_in_request(&self, employee: &EmployeeId, timestamp: NaiveDateTime) -> CheckInRequest {
        CheckInRequest {
            employee_id: employee.clone(),
            shift_id: Some(self.morning.id.clone()),
            timestamp,
            method: CheckInMethod::Manual,
            location: None,
            notes: None,
            recorded_by: None,
        }
    }

    pub(super) fn check_in(&self, employee: &EmployeeId, timestamp: NaiveDateTime) -> AttendanceRecord {
        self.attendance
            .check_in(self.check_in_request(employee, timestamp))
            .expect("check-in recorded")
    }

    /// Scores 90/80/70 against weights 40/35/25, which averages to 81.5.
    pub(super) fn submission(&self, employee: &EmployeeId, status: EvaluationStatus) -> EvaluationSubmission {
        let scores = [90, 80, 70];
        EvaluationSubmission {
            employee_id: employee.clone(),
            evaluator_id: self.supervisor.id.clone(),
            evaluation_date: Some(date(3, 28)),
            period_start: date(3, 1),
            period_end: date(3, 27),
            criteria_scores: self
                .criteria
                .iter()
                .zip(scores)
                .map(|(criterion, score)| CriterionScore {
                    criterion_id: criterion.id.clone(),
                    score,
                    notes: None,
                })
                .collect(),
            comments: Some("Consistent month".to_string()),
            status,
        }
    }
}

/// Attendance store whose every call fails as if the database were down.
pub(super) struct UnavailableAttendance;

impl AttendanceRepository for UnavailableAttendance {
    fn insert(&self, _record: AttendanceRecord) -> Result<AttendanceRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".into()))
    }

    fn update(&self, _record: AttendanceRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".into()))
    }

    fn fetch(&self, _id: &AttendanceId) -> Result<Option<AttendanceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".into()))
    }

    fn for_employee_on(
        &self,
        _employee_id: &EmployeeId,
        _date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".into()))
    }

    fn between(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".into()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
