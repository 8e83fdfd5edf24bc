use super::common::*;
use crate::config::WorkforceConfig;
use crate::workflows::organization::domain::{DepartmentDraft, DepartmentId};
use crate::workflows::performance::domain::EvaluationStatus;
use crate::workflows::performance::ScoreBand;
use crate::workflows::reporting::{
    AggregateQuery, ReportingError, ReportingService, MAX_TREND_MONTHS,
};

/// Monday: Amal on time, Badr late, the rest closed as absent.
/// Tuesday: Amal on time, everyone else closed as absent.
fn seeded_two_days() -> Fixture {
    let fixture = build_fixture();
    let amal = fixture.staff[0].id.clone();
    let badr = fixture.staff[1].id.clone();
    let tuesday = date(3, 5);

    fixture.check_in(&amal, at(monday(), 8, 0));
    fixture.check_in(&badr, at(monday(), 8, 30));
    fixture.attendance.close_day(monday()).expect("monday closed");

    fixture.check_in(&amal, at(tuesday, 8, 5));
    fixture.attendance.close_day(tuesday).expect("tuesday closed");

    let approved = fixture
        .evaluations
        .submit(
            fixture.submission(&amal, EvaluationStatus::Submitted),
            date(3, 29),
        )
        .expect("submitted");
    fixture
        .evaluations
        .approve(&approved.evaluation.id, &fixture.manager.id)
        .expect("approved");
    fixture
        .evaluations
        .submit(fixture.submission(&badr, EvaluationStatus::Draft), date(3, 29))
        .expect("draft");

    fixture
}

fn march() -> AggregateQuery {
    AggregateQuery::new(date(3, 1), date(3, 31))
}

#[test]
fn aggregates_cover_counts_rates_and_scores() {
    let fixture = seeded_two_days();
    let summary = fixture
        .reporting
        .get_aggregates(&march())
        .expect("aggregates");

    assert_eq!(summary.headcount, 4);
    assert_eq!(summary.counts.total, 8);
    assert_eq!(summary.counts.present, 3);
    assert_eq!(summary.counts.late, 1);
    assert_eq!(summary.counts.absent, 5);
    assert!((summary.attendance_rate - 37.5).abs() < 1e-9);

    // March 2024 has 21 days outside the Friday/Saturday weekend.
    assert_eq!(summary.working_days, 21);
    assert_eq!(summary.possible_attendance, 84);
    assert!((summary.discipline_rate - 3.0 / 84.0 * 100.0).abs() < 1e-9);

    assert_eq!(summary.approved_evaluations, 1);
    assert!((summary.average_score - 82.0).abs() < 1e-9);
    assert_eq!(summary.score_band, Some(ScoreBand::VeryGood));
    assert_eq!(summary.score_band_label, Some("Very Good"));
}

#[test]
fn aggregates_narrow_to_one_employee() {
    let fixture = seeded_two_days();
    let query = march().for_employee(fixture.staff[0].id.clone());

    let summary = fixture.reporting.get_aggregates(&query).expect("aggregates");
    assert_eq!(summary.headcount, 1);
    assert_eq!(summary.counts.total, 2);
    assert!((summary.attendance_rate - 100.0).abs() < 1e-9);
}

#[test]
fn deactivated_employees_keep_their_history() {
    let fixture = seeded_two_days();
    let amal = fixture.staff[0].id.clone();
    fixture
        .organization
        .deactivate_employee(&amal)
        .expect("deactivated");

    let summary = fixture
        .reporting
        .get_aggregates(&march())
        .expect("aggregates");
    assert_eq!(summary.headcount, 3);
    assert_eq!(summary.possible_attendance, 63);
    assert_eq!(summary.counts.total, 8);
    assert_eq!(summary.counts.present, 3);
    assert_eq!(summary.approved_evaluations, 1);
    assert!((summary.average_score - 82.0).abs() < 1e-9);

    let own = fixture
        .reporting
        .get_aggregates(&march().for_employee(amal))
        .expect("aggregates");
    assert_eq!(own.headcount, 0);
    assert_eq!(own.counts.total, 2);
    assert_eq!(own.counts.present, 2);
    assert_eq!(own.approved_evaluations, 1);
}

#[test]
fn empty_range_has_no_band() {
    let fixture = build_fixture();
    let summary = fixture
        .reporting
        .get_aggregates(&AggregateQuery::new(date(2, 1), date(2, 29)))
        .expect("aggregates");
    assert_eq!(summary.counts.total, 0);
    assert_eq!(summary.attendance_rate, 0.0);
    assert_eq!(summary.average_score, 0.0);
    assert_eq!(summary.score_band, None);
}

#[test]
fn invalid_scopes_are_reported() {
    let fixture = build_fixture();
    let inverted = AggregateQuery::new(date(3, 31), date(3, 1));
    assert!(matches!(
        fixture.reporting.get_aggregates(&inverted).unwrap_err(),
        ReportingError::InvalidRange { .. }
    ));

    let unknown = march().for_department(DepartmentId("dept-missing".into()));
    assert!(matches!(
        fixture.reporting.get_aggregates(&unknown).unwrap_err(),
        ReportingError::UnknownDepartment(_)
    ));
}

#[test]
fn daily_snapshot_infers_absence() {
    let fixture = build_fixture();
    fixture.check_in(&fixture.staff[0].id, at(monday(), 8, 0));
    fixture.check_in(&fixture.staff[1].id, at(monday(), 8, 30));

    let snapshot = fixture
        .reporting
        .daily_snapshot(monday(), Some(&fixture.sales.id))
        .expect("snapshot");
    assert_eq!(snapshot.headcount, 4);
    assert_eq!(snapshot.checked_in, 2);
    assert_eq!(snapshot.present, 1);
    assert_eq!(snapshot.late, 1);
    assert_eq!(snapshot.completed, 0);
    assert_eq!(snapshot.absent, 2);
}

#[test]
fn department_breakdown_lists_every_department() {
    let fixture = seeded_two_days();
    fixture
        .organization
        .create_department(DepartmentDraft {
            name: "Support".into(),
            description: None,
        })
        .expect("created");

    let rows = fixture
        .reporting
        .department_breakdown(&march(), date(3, 5))
        .expect("breakdown");
    assert_eq!(rows.len(), 2);

    let sales = &rows[0];
    assert_eq!(sales.name, "Sales");
    assert_eq!(sales.headcount, 4);
    assert_eq!(sales.attendance_rate, 38);
    assert_eq!(sales.average_score, 82);
    assert_eq!(sales.present_today, 1);
    assert_eq!(sales.late_today, 0);
    assert_eq!(sales.absent_today, 3);
    assert_eq!(sales.supervisor.as_deref(), Some("Omar Nasser"));

    let support = &rows[1];
    assert_eq!(support.name, "Support");
    assert_eq!(support.headcount, 0);
    assert_eq!(support.attendance_rate, 0);
    assert_eq!(support.supervisor, None);
}

#[test]
fn trend_report_compares_with_the_previous_month() {
    let fixture = seeded_two_days();
    let report = fixture
        .reporting
        .trend_report(3, date(3, 20), None)
        .expect("trends");

    let months: Vec<_> = report.months.iter().map(|month| month.month.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(report.months[2].present, 3);
    assert_eq!(report.months[2].absent, 5);
    assert_eq!(report.months[2].rate, 38);

    assert_eq!(report.comparison.present.difference, 3);
    assert_eq!(report.comparison.present.percentage_change, 0.0);
    // Nobody has five records yet.
    assert!(report.at_risk.is_empty());
}

#[test]
fn trend_windows_are_bounded() {
    let fixture = build_fixture();
    for months in [0, MAX_TREND_MONTHS + 1, u32::MAX] {
        let err = fixture
            .reporting
            .trend_report(months, date(3, 20), None)
            .unwrap_err();
        assert!(matches!(err, ReportingError::InvalidMonths(requested) if requested == months));
    }
    let widest = fixture
        .reporting
        .trend_report(MAX_TREND_MONTHS, date(3, 20), None)
        .expect("report");
    assert_eq!(widest.months.len(), MAX_TREND_MONTHS as usize);
    assert_eq!(widest.months[0].month, "2022-04");
}

#[test]
fn at_risk_threshold_follows_configuration() {
    let fixture = seeded_two_days();
    let settings = WorkforceConfig {
        at_risk_min_records: 2,
        ..WorkforceConfig::default()
    };
    let reporting = ReportingService::new(
        fixture.store.clone(),
        fixture.store.clone(),
        fixture.store.clone(),
        settings,
    );

    let flagged = reporting.at_risk_employees(&march()).expect("at risk");
    let names: Vec<_> = flagged.iter().map(|entry| entry.full_name.as_str()).collect();
    assert_eq!(names, vec!["Huda Saleh", "Omar Nasser", "Badr Khalil"]);
    assert_eq!(flagged[2].attendance_rate, 50);
    assert_eq!(flagged[2].days_absent, 1);
}

#[test]
fn compare_periods_reports_day_over_day_change() {
    let fixture = seeded_two_days();
    let comparison = fixture
        .reporting
        .compare_periods(
            &AggregateQuery::new(date(3, 5), date(3, 5)),
            &AggregateQuery::new(monday(), monday()),
        )
        .expect("comparison");

    assert_eq!(comparison.present.difference, -1);
    assert!((comparison.present.percentage_change + 50.0).abs() < 1e-9);
    assert_eq!(comparison.absent.difference, 1);
    assert!((comparison.absent.percentage_change - 50.0).abs() < 1e-9);
}

#[test]
fn lookback_query_starts_on_a_month_boundary() {
    let fixture = build_fixture();
    let query = fixture.reporting.lookback_query(date(3, 20));
    assert_eq!(
        query.start,
        chrono::NaiveDate::from_ymd_opt(2023, 12, 1).expect("valid date")
    );
    assert_eq!(query.end, date(3, 20));
}
