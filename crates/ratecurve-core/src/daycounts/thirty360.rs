//! 30/360 US (Bond Basis) day count.

use crate::types::Date;

/// Checks if a date is the last day of February.
#[inline]
fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

/// Day count between two dates under 30/360 US.
///
/// # Rules
///
/// 1. If D1 is the last day of February, change D1 to 30
/// 2. If D1 is 31, change D1 to 30
/// 3. If D2 is the last day of February AND D1 was last day of February, change D2 to 30
/// 4. If D2 is 31 AND D1 is now >= 30, change D2 to 30
///
/// # Formula
///
/// $$\text{Days} = 360 \times (Y_2 - Y_1) + 30 \times (M_2 - M_1) + (D_2 - D_1)$$
#[must_use]
pub fn thirty360_us_days(start: Date, end: Date) -> i64 {
    let y1 = start.year() as i64;
    let y2 = end.year() as i64;
    let m1 = start.month() as i64;
    let m2 = end.month() as i64;
    let mut d1 = start.day() as i64;
    let mut d2 = end.day() as i64;

    let d1_was_feb_eom = is_last_day_of_february(start);

    if d1_was_feb_eom || d1 == 31 {
        d1 = 30;
    }

    if is_last_day_of_february(end) && d1_was_feb_eom {
        d2 = 30;
    } else if d2 == 31 && d1 >= 30 {
        d2 = 30;
    }

    360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_full_year() {
        assert_eq!(thirty360_us_days(d(2025, 1, 1), d(2026, 1, 1)), 360);
    }

    #[test]
    fn test_feb_eom() {
        // D1=30 (Feb EOM), D1>=30 so D2=30
        assert_eq!(thirty360_us_days(d(2025, 2, 28), d(2025, 3, 31)), 30);
        assert_eq!(thirty360_us_days(d(2024, 2, 29), d(2025, 2, 28)), 360);
    }

    #[test]
    fn test_day_31() {
        assert_eq!(thirty360_us_days(d(2025, 1, 31), d(2025, 3, 31)), 60);
        assert_eq!(thirty360_us_days(d(2025, 1, 15), d(2025, 3, 31)), 76);
    }

    #[test]
    fn test_accrued_days_mid_period() {
        assert_eq!(thirty360_us_days(d(2019, 12, 15), d(2020, 4, 29)), 134);
    }
}
