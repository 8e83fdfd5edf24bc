use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::aggregate::{PeriodDelta, StatusCounts};
use crate::workflows::organization::domain::{DepartmentId, EmployeeId};
use crate::workflows::performance::scoring::ScoreBand;

/// Date range plus optional department or employee scope shared by every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<DepartmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
}

impl AggregateQuery {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            department_id: None,
            employee_id: None,
        }
    }

    pub fn for_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn for_employee(mut self, employee_id: EmployeeId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub headcount: usize,
    pub counts: StatusCounts,
    pub attendance_rate: f64,
    pub working_days: u32,
    pub possible_attendance: usize,
    pub discipline_rate: f64,
    pub approved_evaluations: usize,
    pub average_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_band: Option<ScoreBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_band_label: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySnapshot {
    pub date: NaiveDate,
    pub headcount: usize,
    pub checked_in: usize,
    pub present: usize,
    pub late: usize,
    pub completed: usize,
    pub absent: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentRow {
    pub department_id: DepartmentId,
    pub name: String,
    pub headcount: usize,
    pub attendance_rate: u8,
    pub discipline_rate: u8,
    pub average_score: u8,
    pub present_today: usize,
    pub late_today: usize,
    pub absent_today: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supervisor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrend {
    pub month: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub present: usize,
    pub absent: usize,
    pub total: usize,
    pub rate: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtRiskEmployee {
    pub employee_id: EmployeeId,
    pub full_name: String,
    pub attendance_rate: u8,
    pub days_absent: usize,
    pub total_records: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub present: PeriodDelta,
    pub absent: PeriodDelta,
}

/// Analytics page payload: month-by-month trend, month-over-month change and follow-up list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub months: Vec<MonthlyTrend>,
    pub comparison: PeriodComparison,
    pub at_risk: Vec<AtRiskEmployee>,
}
