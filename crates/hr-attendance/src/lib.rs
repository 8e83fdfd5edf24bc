//! Attendance tracking, shift lateness, evaluation scoring and dashboard aggregation for a small
//! HR team.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
