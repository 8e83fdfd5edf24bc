use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::WorkforceConfig;

/// Weekend convention used to decide which calendar days are working days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkCalendar {
    weekend: Vec<Weekday>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::new(vec![Weekday::Fri, Weekday::Sat])
    }
}

impl From<&WorkforceConfig> for WorkCalendar {
    fn from(config: &WorkforceConfig) -> Self {
        Self::new(config.weekend.clone())
    }
}

impl WorkCalendar {
    pub fn new(weekend: Vec<Weekday>) -> Self {
        Self { weekend }
    }

    pub fn weekend(&self) -> &[Weekday] {
        &self.weekend
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.weekend.contains(&date.weekday())
    }

    /// Inclusive count of working days in `start..=end`; zero when the range is inverted.
    pub fn working_days_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| self.is_working_day(*day))
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn week_starting_sunday_has_five_working_days() {
        let calendar = WorkCalendar::default();
        // 2025-09-21 is a Sunday.
        assert_eq!(
            calendar.working_days_between(date(2025, 9, 21), date(2025, 9, 27)),
            5
        );
    }

    #[test]
    fn single_day_ranges_respect_weekend() {
        let calendar = WorkCalendar::default();
        assert_eq!(calendar.working_days_between(date(2025, 9, 26), date(2025, 9, 26)), 0);
        assert_eq!(calendar.working_days_between(date(2025, 9, 25), date(2025, 9, 25)), 1);
    }

    #[test]
    fn inverted_range_is_empty() {
        let calendar = WorkCalendar::default();
        assert_eq!(calendar.working_days_between(date(2025, 9, 27), date(2025, 9, 21)), 0);
    }

    #[test]
    fn custom_weekend_changes_the_count() {
        let calendar = WorkCalendar::new(vec![Weekday::Sat, Weekday::Sun]);
        // September 2025: 30 days, 8 weekend days on Saturday/Sunday.
        assert_eq!(calendar.working_days_between(date(2025, 9, 1), date(2025, 9, 30)), 22);
        assert!(calendar.is_working_day(date(2025, 9, 26)));
    }
}
