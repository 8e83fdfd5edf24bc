use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use super::calendar::WorkCalendar;
use super::domain::{
    AttendanceId, AttendanceRecord, AttendanceStatus, BulkCheckInOutcome, BulkCheckInRequest,
    CheckInMethod, CheckInRequest, CheckOutRequest, CloseDayOutcome, ShiftId, WorkShift,
};
use super::evaluator::assess_check_in;
use super::repository::AttendanceRepository;
use crate::workflows::organization::domain::{Employee, EmployeeId};
use crate::workflows::organization::OrganizationRepository;
use crate::workflows::repository::RepositoryError;

/// Service recording check-ins and check-outs against the configured shifts.
pub struct AttendanceService<R, O> {
    records: Arc<R>,
    organization: Arc<O>,
    calendar: WorkCalendar,
    sequence: AtomicU64,
}

impl<R, O> AttendanceService<R, O>
where
    R: AttendanceRepository + 'static,
    O: OrganizationRepository + 'static,
{
    pub fn new(records: Arc<R>, organization: Arc<O>, calendar: WorkCalendar) -> Self {
        Self {
            records,
            organization,
            calendar,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_record_id(&self) -> AttendanceId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        AttendanceId(format!("att-{id:06}"))
    }

    /// Record a check-in, deriving `status` and `late_minutes` from the selected shift.
    pub fn check_in(&self, request: CheckInRequest) -> Result<AttendanceRecord, AttendanceError> {
        let CheckInRequest {
            employee_id,
            shift_id,
            timestamp,
            method,
            location,
            notes,
            recorded_by,
        } = request;

        let shift_id = shift_id.ok_or(AttendanceError::ShiftNotSelected)?;
        let employee = self.active_employee(&employee_id)?;
        let (method, approved_by) = match recorded_by {
            Some(actor_id) => {
                let actor = self.authorized_recorder(&actor_id)?;
                (CheckInMethod::Supervisor, Some(actor.id))
            }
            None => (method, None),
        };
        let shift = self.selectable_shift(&shift_id)?;

        let record = self.build_check_in(
            &employee,
            &shift,
            timestamp,
            method,
            non_blank(location),
            non_blank(notes),
            approved_by,
        );
        let stored = self.insert_unique(record)?;

        info!(
            employee = %stored.employee_id.0,
            shift = %shift.name,
            status = stored.status.label(),
            late_minutes = stored.late_minutes,
            "attendance check-in recorded"
        );
        Ok(stored)
    }

    /// Close an open record. Lateness fields are left exactly as the check-in computed them.
    pub fn check_out(&self, request: CheckOutRequest) -> Result<AttendanceRecord, AttendanceError> {
        let record = self
            .records
            .fetch(&request.record_id)?
            .ok_or_else(|| AttendanceError::UnknownRecord(request.record_id.0.clone()))?;
        self.close_record(record, request.timestamp, request.notes)
    }

    /// Self-service check-out: resolve the employee's open record for the timestamp's day.
    pub fn check_out_open(
        &self,
        employee_id: &EmployeeId,
        timestamp: NaiveDateTime,
        notes: Option<String>,
    ) -> Result<AttendanceRecord, AttendanceError> {
        let record = self
            .records
            .for_employee_on(employee_id, timestamp.date())?
            .filter(AttendanceRecord::is_open)
            .ok_or(AttendanceError::NoOpenCheckIn)?;
        self.close_record(record, timestamp, notes)
    }

    pub fn bulk_check_in(
        &self,
        request: BulkCheckInRequest,
    ) -> Result<BulkCheckInOutcome, AttendanceError> {
        let BulkCheckInRequest {
            employee_ids,
            shift_id,
            timestamp,
            recorded_by,
            notes,
        } = request;

        if employee_ids.is_empty() {
            return Err(AttendanceError::NoEmployeesSelected);
        }
        let shift_id = shift_id.ok_or(AttendanceError::ShiftNotSelected)?;
        let actor = self.authorized_recorder(&recorded_by)?;
        let shift = self.selectable_shift(&shift_id)?;

        let employees = employee_ids
            .iter()
            .map(|id| self.active_employee(id))
            .collect::<Result<Vec<_>, _>>()?;

        let notes = non_blank(notes);
        let mut outcome = BulkCheckInOutcome {
            recorded: Vec::with_capacity(employees.len()),
            skipped: Vec::new(),
        };

        for employee in &employees {
            let record = self.build_check_in(
                employee,
                &shift,
                timestamp,
                CheckInMethod::Supervisor,
                None,
                notes.clone(),
                Some(actor.id.clone()),
            );
            match self.insert_unique(record) {
                Ok(stored) => outcome.recorded.push(stored),
                Err(AttendanceError::DuplicateRecord { .. }) => {
                    outcome.skipped.push(employee.id.clone())
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            supervisor = %actor.id.0,
            shift = %shift.name,
            recorded = outcome.recorded.len(),
            skipped = outcome.skipped.len(),
            "bulk check-in recorded"
        );
        Ok(outcome)
    }

    /// End-of-day batch marking every active employee without a record as absent.
    pub fn close_day(&self, date: NaiveDate) -> Result<CloseDayOutcome, AttendanceError> {
        let mut outcome = CloseDayOutcome {
            date,
            marked_absent: Vec::new(),
        };

        if !self.calendar.is_working_day(date) {
            info!(%date, "skipping day close on a weekend");
            return Ok(outcome);
        }

        for employee in self
            .organization
            .employees()?
            .into_iter()
            .filter(|employee| employee.is_active)
        {
            if self.records.for_employee_on(&employee.id, date)?.is_some() {
                continue;
            }

            let record = AttendanceRecord {
                id: self.next_record_id(),
                employee_id: employee.id.clone(),
                date,
                shift_id: None,
                check_in_time: None,
                check_out_time: None,
                status: AttendanceStatus::Absent,
                late_minutes: 0,
                check_in_method: Some(CheckInMethod::Manual),
                check_in_location: None,
                notes: None,
                approved_by: None,
            };

            match self.records.insert(record) {
                Ok(_) => outcome.marked_absent.push(employee.id),
                // A check-in landed between the lookup and the insert.
                Err(RepositoryError::Conflict) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        info!(%date, absent = outcome.marked_absent.len(), "attendance day closed");
        Ok(outcome)
    }

    pub fn get(&self, record_id: &AttendanceId) -> Result<AttendanceRecord, AttendanceError> {
        self.records
            .fetch(record_id)?
            .ok_or_else(|| AttendanceError::UnknownRecord(record_id.0.clone()))
    }

    pub fn records_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        Ok(self.records.between(start, end)?)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_check_in(
        &self,
        employee: &Employee,
        shift: &WorkShift,
        timestamp: NaiveDateTime,
        method: CheckInMethod,
        location: Option<String>,
        notes: Option<String>,
        approved_by: Option<EmployeeId>,
    ) -> AttendanceRecord {
        let assessment = assess_check_in(shift, timestamp.time());
        AttendanceRecord {
            id: self.next_record_id(),
            employee_id: employee.id.clone(),
            date: timestamp.date(),
            shift_id: Some(shift.id.clone()),
            check_in_time: Some(timestamp),
            check_out_time: None,
            status: assessment.status,
            late_minutes: assessment.late_minutes,
            check_in_method: Some(method),
            check_in_location: location,
            notes,
            approved_by,
        }
    }

    fn insert_unique(&self, record: AttendanceRecord) -> Result<AttendanceRecord, AttendanceError> {
        let employee = record.employee_id.0.clone();
        let date = record.date;
        self.records.insert(record).map_err(|err| match err {
            RepositoryError::Conflict => AttendanceError::DuplicateRecord { employee, date },
            other => other.into(),
        })
    }

    fn close_record(
        &self,
        mut record: AttendanceRecord,
        timestamp: NaiveDateTime,
        notes: Option<String>,
    ) -> Result<AttendanceRecord, AttendanceError> {
        if !record.is_open() {
            warn!(record = %record.id.0, "check-out rejected without an open check-in");
            return Err(AttendanceError::NoOpenCheckIn);
        }

        record.check_out_time = Some(timestamp);
        record.notes = append_note(record.notes.take(), notes);
        self.records.update(record.clone())?;

        info!(
            record = %record.id.0,
            employee = %record.employee_id.0,
            "attendance check-out recorded"
        );
        Ok(record)
    }

    fn active_employee(&self, id: &EmployeeId) -> Result<Employee, AttendanceError> {
        let employee = self
            .organization
            .employee(id)?
            .ok_or_else(|| AttendanceError::UnknownEmployee(id.0.clone()))?;
        if !employee.is_active {
            return Err(AttendanceError::InactiveEmployee(id.0.clone()));
        }
        Ok(employee)
    }

    fn authorized_recorder(&self, id: &EmployeeId) -> Result<Employee, AttendanceError> {
        let actor = self.active_employee(id)?;
        if !actor.role.can_record_for_others() {
            return Err(AttendanceError::NotPermitted(id.0.clone()));
        }
        Ok(actor)
    }

    fn selectable_shift(&self, id: &ShiftId) -> Result<WorkShift, AttendanceError> {
        let shift = self
            .organization
            .shift(id)?
            .ok_or_else(|| AttendanceError::UnknownShift(id.0.clone()))?;
        if !shift.is_active {
            return Err(AttendanceError::InactiveShift(id.0.clone()));
        }
        Ok(shift)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Check-out notes are appended to whatever the check-in captured.
fn append_note(existing: Option<String>, addition: Option<String>) -> Option<String> {
    match (existing, non_blank(addition)) {
        (Some(existing), Some(addition)) => Some(format!("{existing}\n{addition}")),
        (existing, None) => existing,
        (None, addition) => addition,
    }
}

/// Error raised by the attendance service.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    #[error("a shift must be selected before checking in")]
    ShiftNotSelected,
    #[error("no employees selected")]
    NoEmployeesSelected,
    #[error("employee {0} not found")]
    UnknownEmployee(String),
    #[error("employee {0} is inactive")]
    InactiveEmployee(String),
    #[error("shift {0} not found")]
    UnknownShift(String),
    #[error("shift {0} is disabled")]
    InactiveShift(String),
    #[error("attendance record {0} not found")]
    UnknownRecord(String),
    #[error("employee {0} may not record attendance for other employees")]
    NotPermitted(String),
    #[error("employee {employee} already has an attendance record for {date}")]
    DuplicateRecord { employee: String, date: NaiveDate },
    #[error("no open check-in found to check out")]
    NoOpenCheckIn,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
