//! Wall-clock helpers for shift times.
//!
//! Shift boundaries travel as `HH:MM` strings; the hosted store hands them back as `HH:MM:SS`,
//! so both shapes are accepted on input and `HH:MM` is always written out.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serializer};

const CLOCK_FORMAT: &str = "%H:%M";

pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, CLOCK_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Minutes since midnight, seconds discarded.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_clock(*time))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_clock(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("failed to parse '{raw}' as HH:MM")))
}
