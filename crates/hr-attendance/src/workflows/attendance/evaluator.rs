use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::clock::minutes_since_midnight;
use super::domain::{AttendanceStatus, WorkShift};

/// Derived fields stored on a new attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInAssessment {
    pub status: AttendanceStatus,
    pub late_minutes: u32,
}

/// Minutes past `shift_start + grace` at which `now` falls, zero when on time or early.
///
/// Both times are read on the same day; a check-in after midnight for an overnight shift is
/// judged against the same calendar day's start time.
pub fn late_minutes(shift_start: NaiveTime, grace_period_minutes: u32, now: NaiveTime) -> u32 {
    let threshold = minutes_since_midnight(shift_start) + grace_period_minutes;
    minutes_since_midnight(now).saturating_sub(threshold)
}

pub fn assess_check_in(shift: &WorkShift, now: NaiveTime) -> CheckInAssessment {
    let late_minutes = late_minutes(shift.start_time, shift.grace_period_minutes, now);
    let status = if late_minutes > 0 {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    };

    CheckInAssessment {
        status,
        late_minutes,
    }
}
