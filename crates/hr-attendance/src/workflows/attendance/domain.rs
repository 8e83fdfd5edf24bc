use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::clock;
use crate::workflows::organization::domain::{DepartmentId, EmployeeId};

/// Identifier wrapper for work shifts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftId(pub String);

/// Identifier wrapper for attendance records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttendanceId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Morning,
    Evening,
}

/// Named work period with the tolerance applied before a check-in counts as late.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkShift {
    pub id: ShiftId,
    pub name: String,
    #[serde(with = "clock")]
    pub start_time: NaiveTime,
    #[serde(with = "clock")]
    pub end_time: NaiveTime,
    pub shift_type: ShiftType,
    pub grace_period_minutes: u32,
    pub department_id: Option<DepartmentId>,
    pub is_active: bool,
}

impl WorkShift {
    /// Minutes since midnight after which a check-in is late.
    pub fn check_in_threshold(&self) -> u32 {
        clock::minutes_since_midnight(self.start_time) + self.grace_period_minutes
    }

    /// Overnight shifts are stored but lateness is still judged on the check-in day.
    pub fn crosses_midnight(&self) -> bool {
        self.end_time < self.start_time
    }

    /// Whether the shift may be offered on a check-in form for the given department.
    pub fn is_selectable_for(&self, department: Option<&DepartmentId>) -> bool {
        if !self.is_active {
            return false;
        }
        match (&self.department_id, department) {
            (None, _) => true,
            (Some(scope), Some(department)) => scope == department,
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    HalfDay,
    Excused,
}

impl AttendanceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::HalfDay => "half_day",
            AttendanceStatus::Excused => "excused",
        }
    }

    /// Late arrivals still count as attendance in every rate calculation.
    pub const fn counts_as_present(self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "present" => Some(Self::Present),
            "late" => Some(Self::Late),
            "absent" => Some(Self::Absent),
            "half_day" => Some(Self::HalfDay),
            "excused" => Some(Self::Excused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    Location,
    Fingerprint,
    Nfc,
    Supervisor,
    #[default]
    Manual,
}

impl CheckInMethod {
    pub const fn label(self) -> &'static str {
        match self {
            CheckInMethod::Location => "location",
            CheckInMethod::Fingerprint => "fingerprint",
            CheckInMethod::Nfc => "nfc",
            CheckInMethod::Supervisor => "supervisor",
            CheckInMethod::Manual => "manual",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "location" => Some(Self::Location),
            "fingerprint" => Some(Self::Fingerprint),
            "nfc" => Some(Self::Nfc),
            "supervisor" => Some(Self::Supervisor),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

/// One employee's attendance for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: AttendanceId,
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub shift_id: Option<ShiftId>,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub late_minutes: u32,
    pub check_in_method: Option<CheckInMethod>,
    pub check_in_location: Option<String>,
    pub notes: Option<String>,
    pub approved_by: Option<EmployeeId>,
}

impl AttendanceRecord {
    pub fn has_checked_in(&self) -> bool {
        self.check_in_time.is_some()
    }

    /// Checked in and not yet checked out.
    pub fn is_open(&self) -> bool {
        self.check_in_time.is_some() && self.check_out_time.is_none()
    }

    pub fn falls_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.date >= start && self.date <= end
    }
}

/// Check-in form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub employee_id: EmployeeId,
    #[serde(default)]
    pub shift_id: Option<ShiftId>,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub method: CheckInMethod,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Supervisor or manager recording the check-in on the employee's behalf.
    #[serde(default)]
    pub recorded_by: Option<EmployeeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutRequest {
    pub record_id: AttendanceId,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Supervisor flow checking several employees into the same shift at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCheckInRequest {
    pub employee_ids: Vec<EmployeeId>,
    #[serde(default)]
    pub shift_id: Option<ShiftId>,
    pub timestamp: NaiveDateTime,
    pub recorded_by: EmployeeId,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkCheckInOutcome {
    pub recorded: Vec<AttendanceRecord>,
    /// Employees that already had a record for the day.
    pub skipped: Vec<EmployeeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseDayOutcome {
    pub date: NaiveDate,
    pub marked_absent: Vec<EmployeeId>,
}
