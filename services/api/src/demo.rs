use crate::infra::Workforce;
use crate::routes::{offline_report, OfflineReport};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use hr_attendance::config::WorkforceConfig;
use hr_attendance::error::AppError;
use hr_attendance::workflows::attendance::clock::format_clock;
use hr_attendance::workflows::attendance::{
    assess_check_in, AttendanceCsvImporter, BulkCheckInRequest, CheckInMethod, CheckInRequest,
    CheckOutRequest, ShiftId, ShiftType, WorkCalendar, WorkShift,
};
use hr_attendance::workflows::organization::{
    CriterionDraft, DepartmentDraft, Employee, EmployeeDraft, OrganizationError, Role, ShiftDraft,
};
use hr_attendance::workflows::performance::{
    CriterionScore, EvaluationCriterion, EvaluationStatus, EvaluationSubmission,
};
use hr_attendance::workflows::reporting::{AggregateQuery, DEFAULT_TREND_MONTHS, MAX_TREND_MONTHS};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Shift start time (HH:MM)
    #[arg(long, value_parser = crate::infra::parse_clock)]
    pub(crate) shift_start: NaiveTime,
    /// Shift end time (HH:MM), only used to flag overnight shifts
    #[arg(long, value_parser = crate::infra::parse_clock)]
    pub(crate) shift_end: Option<NaiveTime>,
    /// Minutes tolerated after the shift start
    #[arg(long, default_value_t = 15)]
    pub(crate) grace: u32,
    /// Check-in time (HH:MM)
    #[arg(long, value_parser = crate::infra::parse_clock)]
    pub(crate) at: NaiveTime,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Attendance CSV export to summarise
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reporting date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of calendar months in the trend listing
    #[arg(
        long,
        default_value_t = DEFAULT_TREND_MONTHS,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TREND_MONTHS))
    )]
    pub(crate) months: u32,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Day to simulate (YYYY-MM-DD). Defaults to the latest working day.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Skip the evaluation portion of the demo.
    #[arg(long)]
    pub(crate) skip_evaluation: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        shift_start,
        shift_end,
        grace,
        at,
    } = args;

    let shift = WorkShift {
        id: ShiftId("cli".to_string()),
        name: "Ad hoc".to_string(),
        start_time: shift_start,
        end_time: shift_end.unwrap_or(shift_start),
        shift_type: ShiftType::Morning,
        grace_period_minutes: grace,
        department_id: None,
        is_active: true,
    };
    let assessment = assess_check_in(&shift, at);

    println!(
        "Shift starts {} with {} min grace (late after {})",
        format_clock(shift.start_time),
        grace,
        format_clock(shift.start_time + chrono::Duration::minutes(i64::from(grace)))
    );
    if shift_end.is_some() && shift.crosses_midnight() {
        println!("Overnight shift: lateness is judged against the same day's start time");
    }
    println!(
        "Check-in at {} -> {} ({} min late)",
        format_clock(at),
        assessment.status.label(),
        assessment.late_minutes
    );
    Ok(())
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        csv,
        today,
        months,
        json,
    } = args;

    let records = AttendanceCsvImporter::from_path(&csv)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = offline_report(&records, today, months);

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Report payload unavailable: {err}"),
        }
    } else {
        println!("Attendance export: {}", csv.display());
        render_offline_report(&report);
    }
    Ok(())
}

fn render_offline_report(report: &OfflineReport) {
    let counts = &report.counts;
    println!(
        "{} records as of {} | {:.1}% attendance",
        report.records, report.today, report.attendance_rate
    );
    println!(
        "- present {} (late {}) | absent {} | half day {} | excused {}",
        counts.present, counts.late, counts.absent, counts.half_day, counts.excused
    );

    println!("\nMonthly trend");
    for month in &report.months {
        println!(
            "- {}: {} present / {} records | {}%",
            month.month, month.present, month.total, month.rate
        );
    }

    let comparison = &report.comparison;
    println!(
        "\nThis month vs last: present {:+} ({:+.0}%), absent {:+} ({:+.0}%)",
        comparison.present.difference,
        comparison.present.percentage_change,
        comparison.absent.difference,
        comparison.absent.percentage_change
    );
}

struct DemoTeam {
    manager: Employee,
    supervisor: Employee,
    staff: Vec<Employee>,
    shift: WorkShift,
    criteria: Vec<EvaluationCriterion>,
}

fn seed_team(workforce: &Workforce, hire_date: NaiveDate) -> Result<DemoTeam, OrganizationError> {
    let organization = &workforce.organization;
    let department = organization.create_department(DepartmentDraft {
        name: "Customer Care".to_string(),
        description: Some("Phone and walk-in support".to_string()),
    })?;

    let hire = |name: &str, number: &str, role: Role| {
        organization.create_employee(EmployeeDraft {
            full_name: name.to_string(),
            email: format!("{}@example.com", number.to_ascii_lowercase()),
            phone: None,
            department_id: Some(department.id.clone()),
            role,
            employee_number: number.to_string(),
            hire_date,
        })
    };
    let manager = hire("Nadia Karam", "M-100", Role::Manager)?;
    let supervisor = hire("Fadi Saab", "S-100", Role::Supervisor)?;
    let staff = vec![
        hire("Jana Mourad", "E-101", Role::Employee)?,
        hire("Ziad Halabi", "E-102", Role::Employee)?,
        hire("Rami Tannous", "E-103", Role::Employee)?,
        hire("Maya Aoun", "E-104", Role::Employee)?,
    ];

    let shift = organization.create_shift(ShiftDraft {
        name: "Day".to_string(),
        start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
        end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
        shift_type: ShiftType::Morning,
        grace_period_minutes: 15,
        department_id: Some(department.id.clone()),
    })?;

    let criteria = [("Punctuality", 30.0), ("Service quality", 45.0), ("Teamwork", 25.0)]
        .into_iter()
        .map(|(name, weight)| {
            organization.create_criterion(CriterionDraft {
                name: name.to_string(),
                description: None,
                weight,
                department_id: None,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DemoTeam {
        manager,
        supervisor,
        staff,
        shift,
        criteria,
    })
}

fn latest_working_day(calendar: &WorkCalendar, mut day: NaiveDate) -> NaiveDate {
    for _ in 0..7 {
        if calendar.is_working_day(day) {
            break;
        }
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    day
}

fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        date,
        skip_evaluation,
    } = args;

    let settings = WorkforceConfig::default();
    let calendar = WorkCalendar::from(&settings);
    let day = latest_working_day(
        &calendar,
        date.unwrap_or_else(|| Local::now().date_naive()),
    );
    let workforce = Workforce::in_memory(settings);

    println!("Attendance demo for {day}");
    let team = match seed_team(&workforce, day - chrono::Duration::days(180)) {
        Ok(team) => team,
        Err(err) => {
            println!("  Seeding failed: {err}");
            return Ok(());
        }
    };
    println!(
        "Team: {} staff under {} (supervisor {}) | shift {} {}-{} with {} min grace",
        team.staff.len(),
        team.manager.full_name,
        team.supervisor.full_name,
        team.shift.name,
        format_clock(team.shift.start_time),
        format_clock(team.shift.end_time),
        team.shift.grace_period_minutes
    );

    println!("\nCheck-ins");
    let arrivals = [(0, 7, 55, CheckInMethod::Fingerprint), (1, 8, 32, CheckInMethod::Nfc)];
    let mut first_record = None;
    for (index, hour, minute, method) in arrivals {
        let employee = &team.staff[index];
        let request = CheckInRequest {
            employee_id: employee.id.clone(),
            shift_id: Some(team.shift.id.clone()),
            timestamp: at(day, hour, minute),
            method,
            location: Some("Front office".to_string()),
            notes: None,
            recorded_by: None,
        };
        match workforce.attendance.check_in(request) {
            Ok(record) => {
                println!(
                    "- {} at {:02}:{:02} -> {} ({} min late)",
                    employee.full_name,
                    hour,
                    minute,
                    record.status.label(),
                    record.late_minutes
                );
                first_record.get_or_insert(record.id);
            }
            Err(err) => println!("- {} rejected: {err}", employee.full_name),
        }
    }

    let bulk = BulkCheckInRequest {
        employee_ids: vec![team.staff[1].id.clone(), team.staff[2].id.clone()],
        shift_id: Some(team.shift.id.clone()),
        timestamp: at(day, 8, 10),
        recorded_by: team.supervisor.id.clone(),
        notes: Some("Recorded at the morning huddle".to_string()),
    };
    match workforce.attendance.bulk_check_in(bulk) {
        Ok(outcome) => println!(
            "- Supervisor bulk check-in: {} recorded, {} already present",
            outcome.recorded.len(),
            outcome.skipped.len()
        ),
        Err(err) => println!("- Bulk check-in rejected: {err}"),
    }

    if let Some(record_id) = first_record {
        let request = CheckOutRequest {
            record_id,
            timestamp: at(day, 16, 5),
            notes: Some("Closed the queue".to_string()),
        };
        if let Err(err) = workforce.attendance.check_out(request) {
            println!("- Check-out rejected: {err}");
        }
    }

    match workforce.attendance.close_day(day) {
        Ok(outcome) => println!(
            "\nDay closed: {} marked absent",
            outcome.marked_absent.len()
        ),
        Err(err) => println!("\nDay close failed: {err}"),
    }

    match workforce.reporting.daily_snapshot(day, None) {
        Ok(snapshot) => println!(
            "Board: {} checked in of {} | {} on time | {} late | {} completed | {} absent",
            snapshot.checked_in,
            snapshot.headcount,
            snapshot.present,
            snapshot.late,
            snapshot.completed,
            snapshot.absent
        ),
        Err(err) => println!("Board unavailable: {err}"),
    }

    if !skip_evaluation {
        println!("\nEvaluation cycle");
        run_evaluation_demo(&workforce, &team, day);
    }

    match workforce
        .reporting
        .get_aggregates(&AggregateQuery::new(day, day))
    {
        Ok(summary) => {
            println!(
                "\nSummary: {:.1}% attendance | {:.1}% discipline | {} approved evaluations",
                summary.attendance_rate, summary.discipline_rate, summary.approved_evaluations
            );
            if let Some(label) = summary.score_band_label {
                println!("Average score {:.0} ({label})", summary.average_score);
            }
        }
        Err(err) => println!("\nSummary unavailable: {err}"),
    }

    Ok(())
}

fn run_evaluation_demo(workforce: &Workforce, team: &DemoTeam, day: NaiveDate) {
    let scores = [88, 92, 75];
    let submission = EvaluationSubmission {
        employee_id: team.staff[0].id.clone(),
        evaluator_id: team.supervisor.id.clone(),
        evaluation_date: Some(day),
        period_start: day - chrono::Duration::days(30),
        period_end: day,
        criteria_scores: team
            .criteria
            .iter()
            .zip(scores)
            .map(|(criterion, score)| CriterionScore {
                criterion_id: criterion.id.clone(),
                score,
                notes: None,
            })
            .collect(),
        comments: Some("Consistent with callers".to_string()),
        status: EvaluationStatus::Submitted,
    };

    let view = match workforce.evaluations.submit(submission, day) {
        Ok(view) => view,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return;
        }
    };
    println!(
        "  {} scored {} ({})",
        team.staff[0].full_name, view.evaluation.overall_score, view.band_label
    );

    match workforce
        .evaluations
        .approve(&view.evaluation.id, &team.manager.id)
    {
        Ok(approved) => println!(
            "  Approved by {} | status {:?}",
            team.manager.full_name, approved.evaluation.status
        ),
        Err(err) => println!("  Approval failed: {err}"),
    }
}
