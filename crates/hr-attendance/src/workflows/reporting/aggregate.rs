use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::workflows::attendance::calendar::WorkCalendar;
use crate::workflows::attendance::domain::{AttendanceRecord, AttendanceStatus};
use crate::workflows::performance::domain::{Evaluation, EvaluationStatus};

/// Record counts per status. `present` includes late arrivals, so `late` is a subset of it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub present: usize,
    pub late: usize,
    pub absent: usize,
    pub half_day: usize,
    pub excused: usize,
}

impl StatusCounts {
    pub fn attendance_rate(&self) -> f64 {
        percentage(self.present, self.total)
    }

    fn tally(&mut self, status: AttendanceStatus) {
        self.total += 1;
        if status.counts_as_present() {
            self.present += 1;
        }
        match status {
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::HalfDay => self.half_day += 1,
            AttendanceStatus::Excused => self.excused += 1,
            AttendanceStatus::Present => {}
        }
    }
}

pub fn count_by_status<'a, I>(records: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    records
        .into_iter()
        .fold(StatusCounts::default(), |mut counts, record| {
            counts.tally(record.status);
            counts
        })
}

/// Share of records counting as present, in percent. Empty input yields 0.
pub fn attendance_rate<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    count_by_status(records).attendance_rate()
}

pub fn working_days_between(start: NaiveDate, end: NaiveDate, weekend: &[Weekday]) -> u32 {
    WorkCalendar::new(weekend.to_vec()).working_days_between(start, end)
}

/// Change between two period totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodDelta {
    pub current: usize,
    pub previous: usize,
    pub difference: i64,
    pub percentage_change: f64,
}

pub fn period_over_period_delta(current: usize, previous: usize) -> PeriodDelta {
    let difference = current as i64 - previous as i64;
    let percentage_change = if previous > 0 {
        difference as f64 / previous as f64 * 100.0
    } else {
        0.0
    };

    PeriodDelta {
        current,
        previous,
        difference,
        percentage_change,
    }
}

/// Mean overall score of approved evaluations; drafts and submitted forms are ignored.
pub fn average_score<'a, I>(evaluations: I) -> f64
where
    I: IntoIterator<Item = &'a Evaluation>,
{
    let (sum, count) = evaluations
        .into_iter()
        .filter(|evaluation| evaluation.status == EvaluationStatus::Approved)
        .fold((0u64, 0u64), |(sum, count), evaluation| {
            (sum + u64::from(evaluation.overall_score), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub(crate) fn rounded_percent(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}
