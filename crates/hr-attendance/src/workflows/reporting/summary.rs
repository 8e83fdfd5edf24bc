use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Months, NaiveDate};

use super::aggregate::{count_by_status, period_over_period_delta, rounded_percent, StatusCounts};
use super::views::{AtRiskEmployee, DailySnapshot, MonthlyTrend, PeriodComparison};
use crate::workflows::attendance::domain::{AttendanceRecord, AttendanceStatus};
use crate::workflows::organization::domain::{Employee, EmployeeId};

/// Today's board: absence is inferred from headcount, not from stored absent rows.
pub fn daily_snapshot(
    employees: &[Employee],
    records: &[AttendanceRecord],
    date: NaiveDate,
) -> DailySnapshot {
    let roster: HashSet<&EmployeeId> = employees.iter().map(|employee| &employee.id).collect();
    let todays = records
        .iter()
        .filter(|record| record.date == date && roster.contains(&record.employee_id));

    let mut snapshot = DailySnapshot {
        date,
        headcount: roster.len(),
        checked_in: 0,
        present: 0,
        late: 0,
        completed: 0,
        absent: 0,
    };
    for record in todays {
        if record.has_checked_in() {
            snapshot.checked_in += 1;
        }
        if record.check_out_time.is_some() {
            snapshot.completed += 1;
        }
        match record.status {
            AttendanceStatus::Present => snapshot.present += 1,
            AttendanceStatus::Late => snapshot.late += 1,
            _ => {}
        }
    }
    snapshot.absent = snapshot.headcount.saturating_sub(snapshot.checked_in);
    snapshot
}

/// Employees below `threshold` percent attendance with at least `min_records` records, worst
/// first. Records of employees missing from `employees` are ignored.
pub fn at_risk_employees(
    employees: &[Employee],
    records: &[AttendanceRecord],
    threshold: f64,
    min_records: usize,
) -> Vec<AtRiskEmployee> {
    let mut per_employee: HashMap<&EmployeeId, Vec<&AttendanceRecord>> = HashMap::new();
    for record in records {
        per_employee.entry(&record.employee_id).or_default().push(record);
    }

    let mut flagged: Vec<(f64, AtRiskEmployee)> = employees
        .iter()
        .filter_map(|employee| {
            let history = per_employee.get(&employee.id)?;
            let counts = count_by_status(history.iter().copied());
            let rate = counts.attendance_rate();
            if counts.total < min_records || rate >= threshold {
                return None;
            }
            Some((
                rate,
                AtRiskEmployee {
                    employee_id: employee.id.clone(),
                    full_name: employee.full_name.clone(),
                    attendance_rate: rounded_percent(rate),
                    days_absent: counts.total - counts.present,
                    total_records: counts.total,
                },
            ))
        })
        .collect();

    flagged.sort_by(|(left_rate, left), (right_rate, right)| {
        left_rate
            .total_cmp(right_rate)
            .then_with(|| left.full_name.cmp(&right.full_name))
    });
    flagged.into_iter().map(|(_, entry)| entry).collect()
}

/// First and last day of the month `months_back` months before the month of `today`.
pub fn month_bounds(today: NaiveDate, months_back: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = today
        .with_day(1)?
        .checked_sub_months(Months::new(months_back))?;
    let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((start, end))
}

/// The last `months` calendar months ending with the month of `today`, oldest first.
pub fn monthly_trends(records: &[AttendanceRecord], months: u32, today: NaiveDate) -> Vec<MonthlyTrend> {
    (0..months)
        .rev()
        .filter_map(|months_back| month_bounds(today, months_back))
        .map(|(start, end)| {
            let counts = count_by_status(records.iter().filter(|record| record.falls_within(start, end)));
            MonthlyTrend {
                month: start.format("%Y-%m").to_string(),
                start,
                end,
                present: counts.present,
                absent: counts.absent,
                total: counts.total,
                rate: rounded_percent(counts.attendance_rate()),
            }
        })
        .collect()
}

pub fn compare_periods(current: &StatusCounts, previous: &StatusCounts) -> PeriodComparison {
    PeriodComparison {
        present: period_over_period_delta(current.present, previous.present),
        absent: period_over_period_delta(current.absent, previous.absent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::attendance::domain::AttendanceId;
    use crate::workflows::organization::domain::Role;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).expect("valid date")
    }

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            id: EmployeeId(id.into()),
            full_name: name.into(),
            email: format!("{id}@example.com"),
            phone: None,
            department_id: None,
            role: Role::Employee,
            employee_number: id.to_uppercase(),
            hire_date: date(1, 1),
            is_active: true,
        }
    }

    fn record(
        employee: &str,
        on: NaiveDate,
        status: AttendanceStatus,
        checked_in: bool,
        checked_out: bool,
    ) -> AttendanceRecord {
        let at = on.and_hms_opt(8, 0, 0).expect("valid time");
        AttendanceRecord {
            id: AttendanceId(format!("{employee}-{on}")),
            employee_id: EmployeeId(employee.into()),
            date: on,
            shift_id: None,
            check_in_time: checked_in.then_some(at),
            check_out_time: checked_out.then_some(at),
            status,
            late_minutes: 0,
            check_in_method: None,
            check_in_location: None,
            notes: None,
            approved_by: None,
        }
    }

    #[test]
    fn daily_snapshot_infers_absence_from_headcount() {
        let today = date(3, 4);
        let staff = vec![
            employee("emp-1", "Amal"),
            employee("emp-2", "Badr"),
            employee("emp-3", "Dana"),
            employee("emp-4", "Faris"),
        ];
        let records = vec![
            record("emp-1", today, AttendanceStatus::Present, true, true),
            record("emp-2", today, AttendanceStatus::Late, true, false),
            record("emp-3", date(3, 3), AttendanceStatus::Present, true, true),
            record("emp-9", today, AttendanceStatus::Present, true, false),
        ];

        let snapshot = daily_snapshot(&staff, &records, today);
        assert_eq!(snapshot.headcount, 4);
        assert_eq!(snapshot.checked_in, 2);
        assert_eq!(snapshot.present, 1);
        assert_eq!(snapshot.late, 1);
        assert_eq!(snapshot.completed, 1);
        assert_eq!(snapshot.absent, 2);
    }

    #[test]
    fn at_risk_requires_enough_history() {
        let staff = vec![employee("emp-1", "Amal"), employee("emp-2", "Badr")];
        let mut records = Vec::new();
        // Amal: 2 present out of 5 -> 40%.
        for day in 1..=5 {
            let status = if day <= 2 {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            records.push(record("emp-1", date(3, day), status, day <= 2, false));
        }
        // Badr: 1 present out of 4, too few records to flag.
        for day in 1..=4 {
            let status = if day == 1 {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            records.push(record("emp-2", date(3, day), status, day == 1, false));
        }

        let flagged = at_risk_employees(&staff, &records, 75.0, 5);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].employee_id, EmployeeId("emp-1".into()));
        assert_eq!(flagged[0].attendance_rate, 40);
        assert_eq!(flagged[0].days_absent, 3);
    }

    #[test]
    fn at_risk_counts_late_as_attendance() {
        let staff = vec![employee("emp-1", "Amal")];
        let records: Vec<_> = (1..=5)
            .map(|day| record("emp-1", date(3, day), AttendanceStatus::Late, true, false))
            .collect();
        assert!(at_risk_employees(&staff, &records, 75.0, 5).is_empty());
    }

    #[test]
    fn month_bounds_cross_year_boundaries() {
        let (start, end) = month_bounds(date(1, 15), 1).expect("bounds");
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid"));
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid"));

        let (start, end) = month_bounds(date(3, 31), 1).expect("bounds");
        assert_eq!(start, date(2, 1));
        assert_eq!(end, date(2, 29));
    }

    #[test]
    fn monthly_trends_list_oldest_month_first() {
        let records = vec![
            record("emp-1", date(2, 5), AttendanceStatus::Present, true, true),
            record("emp-1", date(2, 6), AttendanceStatus::Absent, false, false),
            record("emp-1", date(3, 5), AttendanceStatus::Late, true, true),
        ];

        let trends = monthly_trends(&records, 3, date(3, 20));
        let months: Vec<_> = trends.iter().map(|trend| trend.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(trends[0].rate, 0);
        assert_eq!(trends[1].present, 1);
        assert_eq!(trends[1].absent, 1);
        assert_eq!(trends[1].rate, 50);
        assert_eq!(trends[2].rate, 100);
    }

    #[test]
    fn compare_periods_tracks_present_and_absent_separately() {
        let current = StatusCounts {
            total: 12,
            present: 10,
            absent: 2,
            ..StatusCounts::default()
        };
        let previous = StatusCounts {
            total: 12,
            present: 8,
            absent: 4,
            ..StatusCounts::default()
        };

        let comparison = compare_periods(&current, &previous);
        assert_eq!(comparison.present.difference, 2);
        assert!((comparison.present.percentage_change - 25.0).abs() < f64::EPSILON);
        assert_eq!(comparison.absent.difference, -2);
        assert!((comparison.absent.percentage_change + 50.0).abs() < f64::EPSILON);
    }
}
