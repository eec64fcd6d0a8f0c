//! Business day calendars.
//!
//! This module provides:
//! - The [`Calendar`] trait used by business-day day counts and date-range terms
//! - [`ActualCalendar`] (every day is a business day) and [`WeekendCalendar`]
//! - [`HolidayCalendar`], a weekend calendar with a caller-supplied holiday set
//! - [`CalendarRegistry`], which resolves calendar names

mod holiday;
mod registry;

pub use holiday::{CalendarData, HolidayCalendar};
pub use registry::CalendarRegistry;

use crate::error::CoreResult;
use crate::types::Date;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Advances a date by a number of business days.
    fn add_business_days(&self, date: Date, days: i64) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Advances a date by a number of business days, failing when the
    /// result falls outside the representable date range.
    fn checked_add_business_days(&self, date: Date, days: i64) -> CoreResult<Date> {
        // Every business day spans at least one calendar day
        date.checked_add_days(days)?;

        let mut result = date;
        let mut remaining = days.unsigned_abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.checked_add_days(direction)?;
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        Ok(result)
    }

    /// Counts business days between two dates (exclusive of start, inclusive of end).
    ///
    /// The count is negative when `end` precedes `start`.
    fn business_days_between(&self, start: Date, end: Date) -> i64 {
        if end < start {
            return -self.business_days_between(end, start);
        }

        let mut count = 0;
        let mut current = start.add_days(1);

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }
}

/// A calendar in which every day is a business day.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActualCalendar;

impl Calendar for ActualCalendar {
    fn name(&self) -> &str {
        "actual"
    }

    fn is_business_day(&self, _date: Date) -> bool {
        true
    }

    fn add_business_days(&self, date: Date, days: i64) -> Date {
        date.add_days(days)
    }

    fn checked_add_business_days(&self, date: Date, days: i64) -> CoreResult<Date> {
        date.checked_add_days(days)
    }

    fn business_days_between(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// A simple weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "weekends"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;

        // Monday
        let monday = Date::from_ymd(2025, 1, 6).unwrap();
        assert!(cal.is_business_day(monday));

        // Saturday
        let saturday = Date::from_ymd(2025, 1, 4).unwrap();
        assert!(!cal.is_business_day(saturday));
        assert!(cal.is_holiday(saturday));
    }

    #[test]
    fn test_add_business_days() {
        let cal = WeekendCalendar;

        // Friday + 1 business day = Monday
        let friday = Date::from_ymd(2025, 1, 3).unwrap();
        assert_eq!(
            cal.add_business_days(friday, 1),
            Date::from_ymd(2025, 1, 6).unwrap()
        );

        // Monday - 1 business day = Friday
        let monday = Date::from_ymd(2025, 1, 6).unwrap();
        assert_eq!(cal.add_business_days(monday, -1), friday);
    }

    #[test]
    fn test_checked_add_business_days() {
        let friday = Date::from_ymd(2025, 1, 3).unwrap();
        assert_eq!(
            WeekendCalendar.checked_add_business_days(friday, 1).unwrap(),
            Date::from_ymd(2025, 1, 6).unwrap()
        );
        assert!(WeekendCalendar
            .checked_add_business_days(friday, 3_000_000_000)
            .is_err());
        assert!(ActualCalendar
            .checked_add_business_days(friday, i64::MIN)
            .is_err());
    }

    #[test]
    fn test_business_days_between() {
        let cal = WeekendCalendar;

        // Monday to Friday = 4 business days (Tue, Wed, Thu, Fri)
        let monday = Date::from_ymd(2025, 1, 6).unwrap();
        let friday = Date::from_ymd(2025, 1, 10).unwrap();

        assert_eq!(cal.business_days_between(monday, friday), 4);
        assert_eq!(cal.business_days_between(friday, monday), -4);
        assert_eq!(cal.business_days_between(monday, monday), 0);
    }

    #[test]
    fn test_actual_calendar() {
        let cal = ActualCalendar;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2025, 3, 1).unwrap();

        assert!(cal.is_business_day(Date::from_ymd(2025, 1, 4).unwrap()));
        assert_eq!(cal.business_days_between(start, end), 59);
        assert_eq!(cal.add_business_days(start, 59), end);
    }
}
