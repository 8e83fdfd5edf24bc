//! Attendance and evaluation aggregates behind the dashboards, reports and analytics pages.

pub mod aggregate;
pub mod router;
pub mod service;
mod summary;
pub mod views;

pub use aggregate::{
    attendance_rate, average_score, count_by_status, period_over_period_delta,
    working_days_between, PeriodDelta, StatusCounts,
};
pub use router::reporting_router;
pub use service::{
    trend_months, ReportingError, ReportingService, AT_RISK_LIMIT, DEFAULT_TREND_MONTHS,
    MAX_TREND_MONTHS,
};
pub use summary::{at_risk_employees, compare_periods, daily_snapshot, month_bounds, monthly_trends};
pub use views::{
    AggregateQuery, AggregateSummary, AtRiskEmployee, DailySnapshot, DepartmentRow, MonthlyTrend,
    PeriodComparison, TrendReport,
};
