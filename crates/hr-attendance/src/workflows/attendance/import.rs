//! CSV import of attendance rows exported from the hosted store, used for offline reports.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use super::domain::{AttendanceId, AttendanceRecord, AttendanceStatus, CheckInMethod, ShiftId};
use crate::workflows::organization::domain::EmployeeId;

#[derive(Debug)]
pub enum AttendanceImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for AttendanceImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceImportError::Io(err) => write!(f, "failed to read attendance export: {}", err),
            AttendanceImportError::Csv(err) => write!(f, "invalid attendance CSV data: {}", err),
            AttendanceImportError::InvalidRow { line, reason } => {
                write!(f, "attendance export line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for AttendanceImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttendanceImportError::Io(err) => Some(err),
            AttendanceImportError::Csv(err) => Some(err),
            AttendanceImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for AttendanceImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for AttendanceImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct AttendanceCsvImporter;

impl AttendanceCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<AttendanceRecord>, AttendanceImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<AttendanceRecord>, AttendanceImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for (index, row) in csv_reader.deserialize::<AttendanceRow>().enumerate() {
            // Header occupies line 1.
            let line = index as u64 + 2;
            records.push(row?.into_record(line)?);
        }

        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct AttendanceRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    employee_id: String,
    date: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    shift_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    check_in: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    check_out: Option<String>,
    status: String,
    #[serde(default)]
    late_minutes: Option<u32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    method: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl AttendanceRow {
    fn into_record(self, line: u64) -> Result<AttendanceRecord, AttendanceImportError> {
        let invalid = |reason: String| AttendanceImportError::InvalidRow { line, reason };

        if self.employee_id.is_empty() {
            return Err(invalid("employee_id is empty".to_string()));
        }
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|err| invalid(format!("date '{}' is not YYYY-MM-DD ({err})", self.date)))?;
        let status = AttendanceStatus::parse(&self.status)
            .ok_or_else(|| invalid(format!("unknown status '{}'", self.status)))?;
        let check_in_method = match self.method.as_deref() {
            Some(raw) => Some(
                CheckInMethod::parse(raw)
                    .ok_or_else(|| invalid(format!("unknown check-in method '{raw}'")))?,
            ),
            None => None,
        };
        let check_in_time = self
            .check_in
            .as_deref()
            .map(|raw| parse_timestamp(raw).ok_or_else(|| invalid(format!("bad check_in '{raw}'"))))
            .transpose()?;
        let check_out_time = self
            .check_out
            .as_deref()
            .map(|raw| {
                parse_timestamp(raw).ok_or_else(|| invalid(format!("bad check_out '{raw}'")))
            })
            .transpose()?;

        Ok(AttendanceRecord {
            id: AttendanceId(self.id.unwrap_or_else(|| format!("import-{line}"))),
            employee_id: EmployeeId(self.employee_id),
            date,
            shift_id: self.shift_id.map(ShiftId),
            check_in_time,
            check_out_time,
            status,
            late_minutes: self.late_minutes.unwrap_or(0),
            check_in_method,
            check_in_location: self.location,
            notes: self.notes,
            approved_by: None,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    // Hosted store exports carry fractional seconds and short offsets such as `+00`.
    let offset = ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"]
        .iter()
        .find_map(|format| DateTime::parse_from_str(trimmed, format).ok());
    if let Some(dt) = offset {
        return Some(dt.naive_local());
    }

    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::io::Cursor;

    const HEADER: &str =
        "id,employee_id,date,shift_id,check_in,check_out,status,late_minutes,method,location,notes\n";

    #[test]
    fn imports_rows_with_optional_columns() {
        let csv = format!(
            "{HEADER}a-1,emp-1,2025-09-21,morning,2025-09-21 09:20:00,2025-09-21T17:00:00,late,5,fingerprint,,\n\
             ,emp-2,2025-09-21,,,,absent,,,,sick leave pending\n"
        );

        let records =
            AttendanceCsvImporter::from_reader(Cursor::new(csv.into_bytes())).expect("imports");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, AttendanceStatus::Late);
        assert_eq!(records[0].late_minutes, 5);
        assert_eq!(records[0].check_in_method, Some(CheckInMethod::Fingerprint));
        assert!(!records[0].is_open());
        assert_eq!(records[1].id, AttendanceId("import-3".to_string()));
        assert_eq!(records[1].check_in_time, None);
        assert_eq!(records[1].notes.as_deref(), Some("sick leave pending"));
    }

    #[test]
    fn accepts_hosted_store_timestamp_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 21)
            .and_then(|day| day.and_hms_opt(9, 20, 0))
            .expect("valid timestamp");

        for raw in [
            "2025-09-21 09:20:00.123456+00",
            "2025-09-21 09:20:00+03",
            "2025-09-21T09:20:00.5+03:00",
            "2025-09-21 09:20:00.25",
            "2025-09-21T09:20:00",
            "2025-09-21 09:20",
        ] {
            let parsed = parse_timestamp(raw).unwrap_or_else(|| panic!("{raw} rejected"));
            assert_eq!(parsed.with_nanosecond(0), Some(expected), "{raw}");
        }
        assert_eq!(parse_timestamp("21/09/2025 09:20"), None);

        let csv = format!(
            "{HEADER}a-1,emp-1,2025-09-21,,2025-09-21 09:20:00.123456+00,2025-09-21 17:00:00+00,present,0,,,\n"
        );
        let records =
            AttendanceCsvImporter::from_reader(Cursor::new(csv.into_bytes())).expect("imports");
        assert_eq!(
            records[0].check_in_time.map(|at| at.with_nanosecond(0)),
            Some(Some(expected))
        );
        assert!(!records[0].is_open());
    }

    #[test]
    fn reports_line_of_invalid_status() {
        let csv = format!("{HEADER}a-1,emp-1,2025-09-21,,,,on_leave,,,,\n");

        match AttendanceCsvImporter::from_reader(Cursor::new(csv.into_bytes())) {
            Err(AttendanceImportError::InvalidRow { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("on_leave"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let parsed = parse_timestamp("2025-09-21T09:05:00+03:00").expect("parses");
        assert_eq!(parsed.to_string(), "2025-09-21 09:05:00");
    }
}
