use chrono::NaiveDate;

use super::domain::{AttendanceId, AttendanceRecord};
use crate::workflows::organization::domain::EmployeeId;
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for attendance records.
///
/// Implementations must reject a second record for the same `(employee, date)` pair with
/// [`RepositoryError::Conflict`]; the service relies on that constraint rather than on a read
/// before the insert.
pub trait AttendanceRepository: Send + Sync {
    fn insert(&self, record: AttendanceRecord) -> Result<AttendanceRecord, RepositoryError>;
    fn update(&self, record: AttendanceRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AttendanceId) -> Result<Option<AttendanceRecord>, RepositoryError>;
    fn for_employee_on(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepositoryError>;
    /// Records dated inside `start..=end`.
    fn between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError>;
}
