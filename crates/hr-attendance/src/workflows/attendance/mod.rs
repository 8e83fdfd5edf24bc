//! Shift lateness evaluation and the check-in/check-out workflow.

pub mod calendar;
pub mod clock;
pub mod domain;
pub mod evaluator;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

pub use calendar::WorkCalendar;
pub use domain::{
    AttendanceId, AttendanceRecord, AttendanceStatus, BulkCheckInOutcome, BulkCheckInRequest,
    CheckInMethod, CheckInRequest, CheckOutRequest, CloseDayOutcome, ShiftId, ShiftType,
    WorkShift,
};
pub use evaluator::{assess_check_in, late_minutes, CheckInAssessment};
pub use import::{AttendanceCsvImporter, AttendanceImportError};
pub use repository::AttendanceRepository;
pub use router::attendance_router;
pub use service::{AttendanceError, AttendanceService};
