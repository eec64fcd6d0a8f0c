//! Property tests for compounding, day counts and calendars.

use proptest::prelude::*;
use ratecurve_core::prelude::*;

fn compounding_strategy() -> impl Strategy<Value = Compounding> {
    prop_oneof![
        Just(Compounding::Simple),
        Just(Compounding::Discrete),
        Just(Compounding::Continuous),
    ]
}

fn date_strategy() -> impl Strategy<Value = Date> {
    (2000i32..2040, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| Date::from_ymd(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn implied_rate_inverts_compound(
        compounding in compounding_strategy(),
        rate in -0.05f64..0.30,
        periods in 0.01f64..30.0,
    ) {
        let factor = compounding.compound(periods, rate);
        prop_assume!(factor > 0.0);
        let implied = compounding.implied_rate(periods, factor);
        prop_assert!((implied - rate).abs() < 1e-9);
    }

    #[test]
    fn discount_is_reciprocal(
        compounding in compounding_strategy(),
        rate in 0.0f64..0.30,
        periods in 0.0f64..30.0,
    ) {
        let product = compounding.compound(periods, rate) * compounding.discount(periods, rate);
        prop_assert!((product - 1.0).abs() < 1e-12);
    }

    #[test]
    fn business_days_are_additive(
        start in date_strategy(),
        first in 0i64..400,
        second in 0i64..400,
    ) {
        let cal = WeekendCalendar;
        let mid = start.add_days(first);
        let end = mid.add_days(second);
        prop_assert_eq!(
            cal.business_days_between(start, end),
            cal.business_days_between(start, mid) + cal.business_days_between(mid, end)
        );
    }

    #[test]
    fn add_business_days_inverts_count(start in date_strategy(), n in 0i64..300) {
        let cal = WeekendCalendar;
        let end = cal.add_business_days(start, n);
        prop_assert_eq!(cal.business_days_between(start, end), n);
    }

    #[test]
    fn actual_day_count_matches_calendar_days(start in date_strategy(), days in -800i64..800) {
        let end = start.add_days(days);
        for dc in [DayCountConvention::Actual360, DayCountConvention::Actual365] {
            prop_assert_eq!(dc.day_count(start, end, &WeekendCalendar), days);
        }
    }
}

#[test]
fn holiday_calendar_through_registry() {
    let mut registry = CalendarRegistry::new();
    registry.register(
        HolidayCalendar::from_json(r#"{"name": "b3", "holidays": ["2025-01-01"]}"#).unwrap(),
    );
    let cal = registry.get("b3").unwrap();
    let start = Date::from_ymd(2024, 12, 31).unwrap();
    let end = Date::from_ymd(2025, 1, 7).unwrap();
    // Jan 2, 3, 6, 7
    assert_eq!(
        DayCountConvention::Business252.day_count(start, end, cal),
        4
    );
}
