use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::aggregate::{average_score, count_by_status, percentage, rounded_percent};
use super::summary::{
    at_risk_employees, compare_periods, daily_snapshot, month_bounds, monthly_trends,
};
use super::views::{
    AggregateQuery, AggregateSummary, AtRiskEmployee, DailySnapshot, DepartmentRow,
    PeriodComparison, TrendReport,
};
use crate::config::WorkforceConfig;
use crate::workflows::attendance::calendar::WorkCalendar;
use crate::workflows::attendance::domain::AttendanceRecord;
use crate::workflows::attendance::repository::AttendanceRepository;
use crate::workflows::organization::domain::{
    Department, DepartmentId, Employee, EmployeeId, Role,
};
use crate::workflows::organization::OrganizationRepository;
use crate::workflows::performance::domain::{Evaluation, EvaluationStatus};
use crate::workflows::performance::repository::EvaluationRepository;
use crate::workflows::performance::scoring::ScoreBand;
use crate::workflows::repository::RepositoryError;

/// Upper bound on the follow-up list shown on the analytics page.
pub const AT_RISK_LIMIT: usize = 10;

/// Trend window used when a request names none.
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Longest trend window a report will build; each month rescans the scoped records.
pub const MAX_TREND_MONTHS: u32 = 24;

/// Resolve a requested trend window, falling back to [`DEFAULT_TREND_MONTHS`].
pub fn trend_months(requested: Option<u32>) -> Result<u32, ReportingError> {
    let months = requested.unwrap_or(DEFAULT_TREND_MONTHS);
    if months == 0 || months > MAX_TREND_MONTHS {
        return Err(ReportingError::InvalidMonths(months));
    }
    Ok(months)
}

/// Read-only service computing dashboard and report aggregates from the stores.
pub struct ReportingService<R, E, O> {
    records: Arc<R>,
    evaluations: Arc<E>,
    organization: Arc<O>,
    calendar: WorkCalendar,
    settings: WorkforceConfig,
}

/// Records and evaluations selected by an [`AggregateQuery`].
///
/// `employees` holds the active roster; records and evaluations also cover
/// deactivated employees matching the query.
struct Scope {
    employees: Vec<Employee>,
    records: Vec<AttendanceRecord>,
    evaluations: Vec<Evaluation>,
}

impl<R, E, O> ReportingService<R, E, O>
where
    R: AttendanceRepository + 'static,
    E: EvaluationRepository + 'static,
    O: OrganizationRepository + 'static,
{
    pub fn new(
        records: Arc<R>,
        evaluations: Arc<E>,
        organization: Arc<O>,
        settings: WorkforceConfig,
    ) -> Self {
        Self {
            records,
            evaluations,
            organization,
            calendar: WorkCalendar::from(&settings),
            settings,
        }
    }

    pub fn settings(&self) -> &WorkforceConfig {
        &self.settings
    }

    /// Counts, rates and evaluation average in scope; headcount covers active employees only.
    pub fn get_aggregates(
        &self,
        query: &AggregateQuery,
    ) -> Result<AggregateSummary, ReportingError> {
        let scope = self.scope(query)?;
        Ok(self.summarise(query, &scope))
    }

    /// Department rows over `query`'s range, with today's board per department.
    pub fn department_breakdown(
        &self,
        query: &AggregateQuery,
        today: NaiveDate,
    ) -> Result<Vec<DepartmentRow>, ReportingError> {
        let departments = match &query.department_id {
            Some(id) => vec![self.department(id)?],
            None => self.organization.departments()?,
        };
        let todays_records = self.records.between(today, today)?;

        let mut rows = Vec::with_capacity(departments.len());
        for department in departments {
            let scoped = AggregateQuery {
                department_id: Some(department.id.clone()),
                ..query.clone()
            };
            let scope = self.scope(&scoped)?;
            let summary = self.summarise(&scoped, &scope);
            let board = daily_snapshot(&scope.employees, &todays_records, today);
            let supervisor = scope
                .employees
                .iter()
                .filter(|employee| employee.role == Role::Supervisor)
                .map(|employee| employee.full_name.clone())
                .min();

            rows.push(DepartmentRow {
                department_id: department.id,
                name: department.name,
                headcount: summary.headcount,
                attendance_rate: rounded_percent(summary.attendance_rate),
                discipline_rate: rounded_percent(summary.discipline_rate),
                average_score: rounded_percent(summary.average_score),
                present_today: board.present + board.late,
                late_today: board.late,
                absent_today: board.absent,
                supervisor,
            });
        }

        rows.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(rows)
    }

    /// Query covering the configured performance lookback window up to `today`.
    pub fn lookback_query(&self, today: NaiveDate) -> AggregateQuery {
        let start = month_bounds(today, self.settings.performance_lookback_months)
            .map(|(start, _)| start)
            .unwrap_or(today);
        AggregateQuery::new(start, today)
    }

    pub fn daily_snapshot(
        &self,
        date: NaiveDate,
        department_id: Option<&DepartmentId>,
    ) -> Result<DailySnapshot, ReportingError> {
        let mut query = AggregateQuery::new(date, date);
        query.department_id = department_id.cloned();
        let scope = self.scope(&query)?;
        Ok(daily_snapshot(&scope.employees, &scope.records, date))
    }

    /// Monthly trend, current-versus-previous month comparison and the follow-up list.
    pub fn trend_report(
        &self,
        months: u32,
        today: NaiveDate,
        department_id: Option<&DepartmentId>,
    ) -> Result<TrendReport, ReportingError> {
        let months = trend_months(Some(months))?;
        let (window_start, _) = month_bounds(today, months - 1).unwrap_or((today, today));
        let (current_start, current_end) = month_bounds(today, 0).unwrap_or((today, today));
        let (previous_start, previous_end) =
            month_bounds(today, 1).unwrap_or((current_start, current_start));

        let mut query = AggregateQuery::new(window_start.min(previous_start), current_end);
        query.department_id = department_id.cloned();
        let scope = self.scope(&query)?;

        let current: Vec<AttendanceRecord> = scope
            .records
            .iter()
            .filter(|record| record.falls_within(current_start, current_end))
            .cloned()
            .collect();
        let previous = scope
            .records
            .iter()
            .filter(|record| record.falls_within(previous_start, previous_end));

        let trend_records: Vec<AttendanceRecord> = scope
            .records
            .iter()
            .filter(|record| record.date >= window_start)
            .cloned()
            .collect();

        let mut at_risk = self.at_risk(&scope.employees, &current);
        at_risk.truncate(AT_RISK_LIMIT);

        Ok(TrendReport {
            months: monthly_trends(&trend_records, months, today),
            comparison: compare_periods(&count_by_status(&current), &count_by_status(previous)),
            at_risk,
        })
    }

    /// Present and absent change between two scoped ranges.
    pub fn compare_periods(
        &self,
        current: &AggregateQuery,
        previous: &AggregateQuery,
    ) -> Result<PeriodComparison, ReportingError> {
        let current = self.scope(current)?;
        let previous = self.scope(previous)?;
        Ok(compare_periods(
            &count_by_status(&current.records),
            &count_by_status(&previous.records),
        ))
    }

    pub fn at_risk_employees(
        &self,
        query: &AggregateQuery,
    ) -> Result<Vec<AtRiskEmployee>, ReportingError> {
        let scope = self.scope(query)?;
        Ok(self.at_risk(&scope.employees, &scope.records))
    }

    fn at_risk(&self, employees: &[Employee], records: &[AttendanceRecord]) -> Vec<AtRiskEmployee> {
        at_risk_employees(
            employees,
            records,
            self.settings.at_risk_rate,
            self.settings.at_risk_min_records,
        )
    }

    fn summarise(&self, query: &AggregateQuery, scope: &Scope) -> AggregateSummary {
        let counts = count_by_status(&scope.records);
        let working_days = self.calendar.working_days_between(query.start, query.end);
        let headcount = scope.employees.len();
        let possible_attendance = headcount * working_days as usize;
        let approved_evaluations = scope
            .evaluations
            .iter()
            .filter(|evaluation| evaluation.status == EvaluationStatus::Approved)
            .count();
        let average = average_score(&scope.evaluations);
        let score_band = (approved_evaluations > 0).then(|| ScoreBand::for_score(average));

        AggregateSummary {
            start: query.start,
            end: query.end,
            headcount,
            counts,
            attendance_rate: counts.attendance_rate(),
            working_days,
            possible_attendance,
            discipline_rate: percentage(counts.present, possible_attendance),
            approved_evaluations,
            average_score: average,
            score_band,
            score_band_label: score_band.map(ScoreBand::label),
        }
    }

    fn scope(&self, query: &AggregateQuery) -> Result<Scope, ReportingError> {
        if query.start > query.end {
            return Err(ReportingError::InvalidRange {
                start: query.start,
                end: query.end,
            });
        }
        if let Some(department_id) = &query.department_id {
            self.department(department_id)?;
        }
        if let Some(employee_id) = &query.employee_id {
            if self.organization.employee(employee_id)?.is_none() {
                return Err(ReportingError::UnknownEmployee(employee_id.0.clone()));
            }
        }

        let matching: Vec<Employee> = self
            .organization
            .employees()?
            .into_iter()
            .filter(|employee| {
                query
                    .department_id
                    .as_ref()
                    .map_or(true, |department| employee.belongs_to(department))
            })
            .filter(|employee| {
                query
                    .employee_id
                    .as_ref()
                    .map_or(true, |id| &employee.id == id)
            })
            .collect();
        // Deactivated employees keep their history; only headcount needs them active.
        let ids: HashSet<&EmployeeId> = matching.iter().map(|employee| &employee.id).collect();

        let records = self
            .records
            .between(query.start, query.end)?
            .into_iter()
            .filter(|record| ids.contains(&record.employee_id))
            .collect();
        let evaluations = self
            .evaluations
            .dated_between(query.start, query.end)?
            .into_iter()
            .filter(|evaluation| ids.contains(&evaluation.employee_id))
            .collect();
        let employees: Vec<Employee> = matching
            .iter()
            .filter(|employee| employee.is_active)
            .cloned()
            .collect();

        debug!(
            start = %query.start,
            end = %query.end,
            employees = employees.len(),
            matching = matching.len(),
            "report scope resolved"
        );
        Ok(Scope {
            employees,
            records,
            evaluations,
        })
    }

    fn department(&self, id: &DepartmentId) -> Result<Department, ReportingError> {
        self.organization
            .department(id)?
            .ok_or_else(|| ReportingError::UnknownDepartment(id.0.clone()))
    }
}

/// Error raised while computing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    #[error("report range start {start} is after its end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("trend window of {0} months is outside 1..={max}", max = MAX_TREND_MONTHS)]
    InvalidMonths(u32),
    #[error("department {0} not found")]
    UnknownDepartment(String),
    #[error("employee {0} not found")]
    UnknownEmployee(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
