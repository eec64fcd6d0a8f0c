//! Holiday calendar loaded from caller-supplied dates.
//!
//! # Example
//!
//! ```
//! use ratecurve_core::calendars::{Calendar, HolidayCalendar};
//! use ratecurve_core::types::Date;
//!
//! let holidays = vec![
//!     Date::from_ymd(2025, 1, 1).unwrap(),
//!     Date::from_ymd(2025, 12, 25).unwrap(),
//! ];
//! let cal = HolidayCalendar::from_dates("custom", holidays);
//!
//! assert!(!cal.is_business_day(Date::from_ymd(2025, 1, 1).unwrap()));
//! assert!(cal.is_business_day(Date::from_ymd(2025, 1, 2).unwrap()));
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Serialized form of a holiday calendar.
///
/// ```json
/// {
///   "name": "b3",
///   "holidays": ["2025-01-01", "2025-12-25"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarData {
    /// Calendar name.
    pub name: String,
    /// Holiday dates as ISO strings.
    #[serde(default)]
    pub holidays: Vec<String>,
}

/// A weekend calendar with an additional set of holidays.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    name: String,
    holidays: HashSet<Date>,
}

impl HolidayCalendar {
    /// Creates an empty holiday calendar.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            holidays: HashSet::new(),
        }
    }

    /// Creates a calendar from a list of holiday dates.
    pub fn from_dates(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        let mut cal = Self::new(name);
        cal.add_holidays(holidays);
        cal
    }

    /// Loads a calendar from JSON data.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let data: CalendarData = serde_json::from_str(json)
            .map_err(|e| CoreError::calendar_error(format!("Failed to parse JSON: {e}")))?;
        Self::from_calendar_data(data)
    }

    /// Builds a calendar from already-deserialized data.
    pub fn from_calendar_data(data: CalendarData) -> CoreResult<Self> {
        let mut cal = Self::new(data.name);
        for date_str in &data.holidays {
            let date = Date::parse(date_str).map_err(|e| {
                CoreError::calendar_error(format!("Invalid holiday '{date_str}': {e}"))
            })?;
            cal.add_holiday(date);
        }
        Ok(cal)
    }

    /// Serializes the calendar back to its data form, holidays sorted.
    pub fn to_calendar_data(&self) -> CalendarData {
        let mut dates: Vec<Date> = self.holidays.iter().copied().collect();
        dates.sort();
        CalendarData {
            name: self.name.clone(),
            holidays: dates.iter().map(ToString::to_string).collect(),
        }
    }

    /// Adds a holiday date.
    pub fn add_holiday(&mut self, date: Date) {
        self.holidays.insert(date);
    }

    /// Adds multiple holidays.
    pub fn add_holidays(&mut self, dates: impl IntoIterator<Item = Date>) {
        self.holidays.extend(dates);
    }

    /// Removes a holiday date.
    pub fn remove_holiday(&mut self, date: Date) {
        self.holidays.remove(&date);
    }

    /// Number of holidays in the set.
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.holidays.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_holidays_and_weekends() {
        let cal = HolidayCalendar::from_dates("test", vec![d(2025, 1, 1)]);
        assert!(!cal.is_business_day(d(2025, 1, 1)));
        assert!(!cal.is_business_day(d(2025, 1, 4)));
        assert!(cal.is_business_day(d(2025, 1, 2)));
        assert_eq!(cal.name(), "test");
    }

    #[test]
    fn test_business_days_skip_holiday() {
        let cal = HolidayCalendar::from_dates("test", vec![d(2025, 1, 1)]);
        // Dec 31 (Wed) -> Jan 3 (Fri): Jan 2 and Jan 3 only
        assert_eq!(cal.business_days_between(d(2024, 12, 31), d(2025, 1, 3)), 2);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"name": "json", "holidays": ["2025-01-01", "2025-12-25"]}"#;
        let cal = HolidayCalendar::from_json(json).unwrap();
        assert_eq!(cal.holiday_count(), 2);
        assert!(cal.is_holiday(d(2025, 12, 25)));
    }

    #[test]
    fn test_from_json_invalid_date() {
        let json = r#"{"name": "bad", "holidays": ["2025-02-30"]}"#;
        let err = HolidayCalendar::from_json(json).unwrap_err();
        assert!(matches!(err, CoreError::CalendarError { .. }));
    }

    #[test]
    fn test_data_roundtrip() {
        let mut cal = HolidayCalendar::new("rt");
        cal.add_holidays(vec![d(2025, 12, 25), d(2025, 1, 1)]);
        cal.remove_holiday(d(2025, 12, 25));
        let data = cal.to_calendar_data();
        assert_eq!(data.holidays, vec!["2025-01-01".to_string()]);
    }
}
