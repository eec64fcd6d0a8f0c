//! Day count conventions for term structure calculations.
//!
//! A day count convention turns a term into a time factor in years and
//! counts the days between two dates.
//!
//! # Supported Conventions
//!
//! | Convention | Name | Days in base | Day count |
//! |------------|------|--------------|-----------|
//! | [`DayCountConvention::Business252`] | `business/252` | 252 | calendar business days |
//! | [`DayCountConvention::Actual360`] | `actual/360` | 360 | calendar days |
//! | [`DayCountConvention::Actual365`] | `actual/365` | 365 | calendar days |
//! | [`DayCountConvention::Thirty360`] | `30/360` | 360 | 30/360 US |
//!
//! # Usage
//!
//! ```rust
//! use ratecurve_core::calendars::WeekendCalendar;
//! use ratecurve_core::daycounts::DayCountConvention;
//! use ratecurve_core::types::{Date, TermUnits};
//!
//! let dc = DayCountConvention::Business252;
//! assert_eq!(dc.time_factor(252.0, TermUnits::Day), 1.0);
//!
//! let start = Date::from_ymd(2025, 1, 6).unwrap();
//! let end = Date::from_ymd(2025, 1, 13).unwrap();
//! assert_eq!(dc.day_count(start, end, &WeekendCalendar), 5);
//! ```

mod thirty360;

pub use thirty360::thirty360_us_days;

use serde::{Deserialize, Serialize};

use crate::calendars::Calendar;
use crate::error::CoreError;
use crate::types::{Date, TermUnits};

/// Enumeration of the supported day count conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Business days over a 252-day year.
    #[default]
    #[serde(rename = "business/252")]
    Business252,

    /// Actual days over a 360-day year.
    #[serde(rename = "actual/360")]
    Actual360,

    /// Actual days over a 365-day year.
    #[serde(rename = "actual/365")]
    Actual365,

    /// 30/360 US (Bond Basis).
    #[serde(rename = "30/360")]
    Thirty360,
}

impl DayCountConvention {
    /// Returns the canonical name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Business252 => "business/252",
            DayCountConvention::Actual360 => "actual/360",
            DayCountConvention::Actual365 => "actual/365",
            DayCountConvention::Thirty360 => "30/360",
        }
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Business252,
            DayCountConvention::Actual360,
            DayCountConvention::Actual365,
            DayCountConvention::Thirty360,
        ]
    }

    /// Days in base: the number of days counted as one year.
    #[must_use]
    pub const fn dib(&self) -> u32 {
        match self {
            DayCountConvention::Business252 => 252,
            DayCountConvention::Actual360 | DayCountConvention::Thirty360 => 360,
            DayCountConvention::Actual365 => 365,
        }
    }

    /// Converts a term value into years.
    ///
    /// Days are divided by [`dib`](Self::dib), months by 12.
    #[must_use]
    pub fn time_factor(&self, value: f64, units: TermUnits) -> f64 {
        match units {
            TermUnits::Day => value / f64::from(self.dib()),
            TermUnits::Month => value / 12.0,
            TermUnits::Year => value,
        }
    }

    /// Converts a time factor in years back into a term value in `units`.
    #[must_use]
    pub fn from_time_factor(&self, years: f64, units: TermUnits) -> f64 {
        match units {
            TermUnits::Day => years * f64::from(self.dib()),
            TermUnits::Month => years * 12.0,
            TermUnits::Year => years,
        }
    }

    /// Counts days between two dates under this convention.
    ///
    /// Business252 counts business days of `calendar` (start exclusive, end
    /// inclusive); the actual conventions count calendar days; 30/360 uses
    /// the US bond basis rule. Negative when `end` precedes `start`.
    #[must_use]
    pub fn day_count(&self, start: Date, end: Date, calendar: &dyn Calendar) -> i64 {
        match self {
            DayCountConvention::Business252 => calendar.business_days_between(start, end),
            DayCountConvention::Actual360 | DayCountConvention::Actual365 => {
                start.days_between(&end)
            }
            DayCountConvention::Thirty360 => thirty360_us_days(start, end),
        }
    }

    /// Year fraction between two dates: `day_count / dib`.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date, calendar: &dyn Calendar) -> f64 {
        self.day_count(start, end, calendar) as f64 / f64::from(self.dib())
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses a day count convention from its name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();

        match normalized.as_str() {
            "business/252" | "bus/252" => Ok(DayCountConvention::Business252),
            "actual/360" | "act/360" => Ok(DayCountConvention::Actual360),
            "actual/365" | "act/365" => Ok(DayCountConvention::Actual365),
            "30/360" => Ok(DayCountConvention::Thirty360),
            _ => Err(CoreError::invalid_argument(format!(
                "unknown day count convention '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::{ActualCalendar, WeekendCalendar};
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_dib() {
        assert_eq!(DayCountConvention::Business252.dib(), 252);
        assert_eq!(DayCountConvention::Actual360.dib(), 360);
        assert_eq!(DayCountConvention::Actual365.dib(), 365);
        assert_eq!(DayCountConvention::Thirty360.dib(), 360);
    }

    #[test]
    fn test_time_factor() {
        let dc = DayCountConvention::Actual360;
        assert_relative_eq!(dc.time_factor(90.0, TermUnits::Day), 0.25);
        assert_relative_eq!(dc.time_factor(6.0, TermUnits::Month), 0.5);
        assert_relative_eq!(dc.time_factor(2.0, TermUnits::Year), 2.0);
    }

    #[test]
    fn test_time_factor_inverse() {
        for dc in DayCountConvention::all() {
            for units in [TermUnits::Day, TermUnits::Month, TermUnits::Year] {
                let years = dc.time_factor(42.0, units);
                assert_relative_eq!(dc.from_time_factor(years, units), 42.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_day_count_actual() {
        let dc = DayCountConvention::Actual365;
        assert_eq!(dc.day_count(d(2025, 1, 1), d(2026, 1, 1), &WeekendCalendar), 365);
        assert_relative_eq!(
            dc.year_fraction(d(2025, 1, 1), d(2026, 1, 1), &WeekendCalendar),
            1.0
        );
    }

    #[test]
    fn test_day_count_business() {
        let dc = DayCountConvention::Business252;
        // Mon 6 Jan -> Mon 13 Jan: Tue..Fri + Mon
        assert_eq!(dc.day_count(d(2025, 1, 6), d(2025, 1, 13), &WeekendCalendar), 5);
        assert_eq!(dc.day_count(d(2025, 1, 6), d(2025, 1, 13), &ActualCalendar), 7);
    }

    #[test]
    fn test_day_count_thirty360() {
        let dc = DayCountConvention::Thirty360;
        assert_eq!(dc.day_count(d(2025, 1, 1), d(2025, 7, 1), &ActualCalendar), 180);
        assert_relative_eq!(
            dc.year_fraction(d(2025, 1, 1), d(2025, 7, 1), &ActualCalendar),
            0.5
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "business/252".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Business252
        );
        assert_eq!(
            "ACTUAL/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Actual360
        );
        assert!("ACT/ACT ICMA".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_from_str_roundtrip() {
        for convention in DayCountConvention::all() {
            let parsed: DayCountConvention = convention.name().parse().unwrap();
            assert_eq!(*convention, parsed);
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DayCountConvention::Thirty360).unwrap();
        assert_eq!(json, "\"30/360\"");
        let parsed: DayCountConvention = serde_json::from_str("\"actual/365\"").unwrap();
        assert_eq!(parsed, DayCountConvention::Actual365);
    }
}
