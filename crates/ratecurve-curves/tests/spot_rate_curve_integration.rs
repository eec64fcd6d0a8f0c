//! Integration test: a money-market spot curve on business/252.
//!
//! | Term (bd) | Rate    |
//! |-----------|---------|
//! | 1         | 10.50%  |
//! | 21        | 10.55%  |
//! | 42        | 10.58%  |
//! | 63        | 10.60%  |
//! | 126       | 10.65%  |
//! | 252       | 10.70%  |

use approx::assert_relative_eq;
use ratecurve_curves::prelude::*;

fn market_curve() -> SpotRateCurve {
    let rates = SpotRate::from_names(
        vec![0.1050, 0.1055, 0.1058, 0.1060, 0.1065, 0.1070],
        "discrete",
        "business/252",
        "actual",
    )
    .unwrap();
    SpotRateCurve::new(
        Term::days(vec![1.0, 21.0, 42.0, 63.0, 126.0, 252.0]),
        rates,
        Date::from_ymd(2025, 1, 2).unwrap(),
    )
    .unwrap()
}

fn all_interpolations() -> Vec<Interpolation> {
    InterpolationKind::NAMES
        .iter()
        .map(|name| Interpolation::from_name(name).unwrap())
        .collect()
}

#[test]
fn test_compounding_reference_values() {
    assert_relative_eq!(Compounding::Simple.compound(2.0, 0.05), 1.1, epsilon = 1e-12);
    assert_relative_eq!(Compounding::Discrete.compound(2.0, 0.05), 1.1025, epsilon = 1e-12);
    assert_relative_eq!(
        Compounding::Continuous.compound(2.0, 0.05),
        1.105170918,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        Compounding::Discrete.implied_rate(2.0, 1.1025),
        0.05,
        epsilon = 1e-12
    );
}

#[test]
fn test_cross_convention_arithmetic() {
    let discrete = SpotRate::from_names(vec![0.05], "discrete", "actual/365", "actual").unwrap();
    let simple = SpotRate::from_names(vec![0.05], "simple", "actual/365", "actual").unwrap();

    assert!(matches!(
        discrete.add(&simple),
        Err(CurveError::SlotMismatch { .. })
    ));
    assert_eq!(discrete.eq_values(&simple).unwrap(), vec![false]);
    assert_eq!(discrete.ne_values(&simple).unwrap(), vec![true]);
}

#[test]
fn test_exact_term_indexing_without_interpolation() {
    let curve = market_curve();
    assert!(!curve.is_bound());

    let subset = curve.at_terms(&[1.0, 21.0, 42.0]).unwrap();
    assert_eq!(subset.rates().values(), &[0.1050, 0.1055, 0.1058]);
}

#[test]
fn test_missing_term_until_bound() {
    let curve = market_curve();
    assert_eq!(curve.lookup(&[13.0]), vec![None]);

    for interpolation in all_interpolations() {
        let mut bound = curve.clone();
        // Parametric models with default parameters are bound as given
        bound.set_interpolation(Some(interpolation)).unwrap();
        let rate = bound.lookup(&[13.0])[0];
        assert!(
            rate.is_some_and(f64::is_finite),
            "{} gave {rate:?}",
            interpolation.name()
        );
    }
}

#[test]
fn test_flat_forward_continuity_at_knots() {
    let curve = market_curve()
        .with_interpolation(Some(Interpolation::flat_forward()))
        .unwrap();
    let bound = curve.bound().unwrap();

    // Approaching 42 from inside the segment converges on the stored rate
    let years = |d: f64| d / 252.0;
    assert_relative_eq!(bound.evaluate(years(42.0)), 0.1058, epsilon = 1e-12);
    assert_relative_eq!(bound.evaluate(years(42.0 - 1e-9)), 0.1058, epsilon = 1e-9);

    // Every day strictly inside (21, 42) carries the same forward rate
    let forwards = curve
        .at_terms(&(21..=42).map(f64::from).collect::<Vec<_>>())
        .unwrap()
        .forward_rates()
        .unwrap();
    let inner = &forwards.rates().values()[1..];
    for f in inner {
        assert_relative_eq!(*f, inner[0], epsilon = 1e-9);
    }
}

#[test]
fn test_remove_terms_depends_on_binding() {
    let curve = market_curve();
    let removed = curve.remove_terms(&[63.0]).unwrap();
    assert_eq!(removed.len(), 5);
    assert_eq!(removed.lookup(&[63.0]), vec![None]);

    let bound = curve
        .with_interpolation(Some(Interpolation::linear()))
        .unwrap();
    assert!(matches!(
        bound.remove_terms(&[63.0]),
        Err(CurveError::InvalidOperation { .. })
    ));
}

#[test]
fn test_first_and_last_bounds() {
    let curve = market_curve();
    let daycount = curve.daycount();

    let limit: Term = "50 days".parse().unwrap();
    let first = curve.first(&limit).unwrap();
    assert!(first.len() <= curve.len());
    assert!(first.terms().values().iter().all(|t| *t <= 50.0));

    let limit: Term = "6 months".parse().unwrap();
    let last = curve.last(&limit).unwrap();
    let end = *curve.years().last().unwrap();
    assert!(last.len() <= curve.len());
    assert!(last
        .terms()
        .to_years(daycount)
        .iter()
        .all(|t| end - t <= 0.5 + 1e-12));
}

#[test]
fn test_closest_row() {
    let curve = market_curve();
    for (query, expected) in [(0.0, 1.0), (11.0, 1.0), (12.0, 21.0), (100.0, 126.0), (94.5, 63.0)] {
        let row = curve.closest(&[query]).unwrap();
        assert_eq!(row.len(), 1);
        assert_eq!(row.terms().values(), &[expected], "query {query}");
    }
}

#[test]
fn test_forward_round_trip() {
    let curve = market_curve();
    let spot = curve.forward_rates().unwrap().to_spot_curve().unwrap();

    assert_eq!(spot.terms(), curve.terms());
    for (a, b) in spot.rates().values().iter().zip(curve.rates().values()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_nelson_siegel_fit_on_curve() {
    let truth = NelsonSiegelParams {
        beta1: 0.045,
        beta2: -0.015,
        beta3: 0.02,
        lambda1: 1.8,
    };
    let model = Interpolation::nelson_siegel(truth);
    let years = [0.25, 0.5, 1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 20.0, 30.0];
    let prepared = model
        .prepare(&years, &[0.04; 10], Compounding::Continuous)
        .unwrap();

    let mut curve = SpotRateCurve::new(
        Term::years(years.to_vec()),
        SpotRate::new(
            prepared.evaluate_all(&years),
            Compounding::Continuous,
            DayCountConvention::Actual365,
            "actual",
        ),
        Date::from_ymd(2025, 1, 2).unwrap(),
    )
    .unwrap();

    curve
        .fit_interpolation(
            &Interpolation::nelson_siegel(NelsonSiegelParams::default()),
            &FitConfig::default(),
        )
        .unwrap();

    let fitted = curve.interpolation().unwrap().kind().parameters().unwrap();
    for (f, t) in fitted.iter().zip(truth.to_array()) {
        assert_relative_eq!(*f, t, epsilon = 1e-6);
    }

    // The fitted model reproduces every stored rate
    let rates = curve.interpolate(&years).unwrap();
    for (a, b) in rates.values().iter().zip(curve.rates().values()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-9);
    }
}

#[test]
fn test_fit_with_invalid_settings_fails_fast() {
    let mut curve = market_curve();
    let config = FitConfig {
        damping_factor: 1.0,
        ..FitConfig::default()
    };

    let result =
        curve.fit_interpolation(&Interpolation::nelson_siegel(NelsonSiegelParams::default()), &config);
    assert!(matches!(result, Err(CurveError::InvalidArgument { .. })));
    assert!(!curve.is_bound());
}

#[test]
fn test_mutation_rebinds_interpolation() {
    let curve = market_curve()
        .with_interpolation(Some(Interpolation::natural_spline()))
        .unwrap();
    let before = curve.lookup(&[30.0])[0].unwrap();

    let shifted = curve.replace(&[1, 2], &[0.12]).unwrap();
    let after = shifted.lookup(&[30.0])[0].unwrap();

    assert!(after > before + 0.01);
    assert_relative_eq!(after, 0.12, epsilon = 5e-3);
}

#[test]
fn test_curve_from_config() {
    let config = CurveConfig::from_toml_str(
        r#"
        refdate = "2025-01-02"
        terms = [1, 21, 42, 63, 126, 252]
        rates = [0.1050, 0.1055, 0.1058, 0.1060, 0.1065, 0.1070]
        compounding = "discrete"
        daycount = "business/252"

        [interpolation]
        method = "MonotoneSpline"
        propagate = true
        "#,
    )
    .unwrap();
    let curve = config.build().unwrap();

    assert_eq!(curve.terms(), market_curve().terms());
    assert_eq!(curve.interpolation().unwrap().name(), "monotonespline");

    // Propagation holds the last rate beyond the final term
    assert_relative_eq!(curve.lookup(&[500.0])[0].unwrap(), 0.1070, epsilon = 1e-12);
}

#[test]
fn test_date_range_terms() {
    let start = Date::from_ymd(2025, 1, 2).unwrap();
    let ends = [
        Date::from_ymd(2025, 1, 3).unwrap(),
        Date::from_ymd(2025, 1, 10).unwrap(),
    ];
    let range = DateRangeTerm::new(&[start], &ends, &WeekendCalendar).unwrap();
    assert_eq!(range.term().values(), &[1.0, 6.0]);

    let curve = market_curve();
    let rates = curve.at_terms(range.term()).unwrap();
    assert_eq!(rates.rates().values()[0], 0.1050);
    assert!(rates.rates().values()[1].is_nan());
}
