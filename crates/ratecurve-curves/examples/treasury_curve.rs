//! Treasury Curve Interpolation Example
//!
//! Builds a spot curve from CMT yields and compares the interpolation
//! methods at off-pillar tenors, then fits a Nelson-Siegel-Svensson model.
//!
//! Market Data: November 28, 2025
//!
//! | Tenor | Yield   |
//! |-------|---------|
//! | 1M    | 3.936%  |
//! | 3M    | 3.806%  |
//! | 6M    | 3.774%  |
//! | 1Y    | 3.591%  |
//! | 2Y    | 3.502%  |
//! | 3Y    | 3.493%  |
//! | 5Y    | 3.603%  |
//! | 7Y    | 3.788%  |
//! | 10Y   | 4.018%  |
//! | 20Y   | 4.628%  |
//! | 30Y   | 4.667%  |
//!
//! Run with: cargo run --example treasury_curve

use ratecurve_curves::prelude::*;

fn main() {
    println!("===========================================");
    println!("  Treasury Curve Interpolation Example");
    println!("  Market Data: November 28, 2025");
    println!("===========================================\n");

    let refdate = Date::from_ymd(2025, 11, 28).unwrap();

    let months = vec![1.0, 3.0, 6.0, 12.0, 24.0, 36.0, 60.0, 84.0, 120.0, 240.0, 360.0];
    let yields = vec![
        0.03936, 0.03806, 0.03774, 0.03591, 0.03502, 0.03493, 0.03603, 0.03788, 0.04018,
        0.04628, 0.04667,
    ];

    let curve = SpotRateCurve::new(
        Term::months(months),
        SpotRate::new(yields, Compounding::Discrete, DayCountConvention::Actual365, "actual"),
        refdate,
    )
    .expect("curve should build");

    println!("{}\n", curve.rates().convention());

    // Off-pillar tenors in months
    let queries = [2.0, 9.0, 18.0, 48.0, 96.0, 180.0, 300.0];

    print!("{:<16}", "Method");
    for q in &queries {
        print!("{:>9}", format!("{q}M"));
    }
    println!();
    println!("{}", "-".repeat(16 + 9 * queries.len()));

    for name in InterpolationKind::NAMES {
        let bound = curve
            .clone()
            .with_interpolation(Some(Interpolation::from_name(name).unwrap()))
            .expect("interpolation should bind");
        let rates = bound.interpolate(&queries).unwrap();

        print!("{name:<16}");
        for r in rates.values() {
            print!("{:>9.4}", r * 100.0);
        }
        println!();
    }

    // =========================================================================
    // Parametric fit
    // =========================================================================
    println!("\n=========================================");
    println!("  Nelson-Siegel-Svensson Fit");
    println!("=========================================");

    let mut fitted = curve.clone();
    fitted
        .fit_interpolation(
            &Interpolation::nelson_siegel_svensson(SvenssonParams::default()),
            &FitConfig::default(),
        )
        .expect("fit should converge");

    let params = fitted.interpolation().unwrap().kind().parameters().unwrap();
    for (label, value) in ["beta1", "beta2", "beta3", "beta4", "lambda1", "lambda2"]
        .iter()
        .zip(&params)
    {
        println!("{label:<8} {value:>10.6}");
    }

    println!("\n{:<8} {:>10} {:>10} {:>10}", "Tenor", "Market", "Fitted", "Error(bp)");
    let model = fitted.interpolate(curve.terms()).unwrap();
    for ((t, m), f) in curve
        .terms()
        .values()
        .iter()
        .zip(curve.rates().values())
        .zip(model.values())
    {
        println!(
            "{:<8} {:>10.4} {:>10.4} {:>10.2}",
            format!("{t}M"),
            m * 100.0,
            f * 100.0,
            (f - m) * 10_000.0
        );
    }

    // =========================================================================
    // Forward rates
    // =========================================================================
    println!("\nForward rates between pillars:");
    let forwards = curve.forward_rates().unwrap();
    for ((s, e), f) in forwards
        .start_terms()
        .values()
        .iter()
        .zip(forwards.end_terms().values())
        .zip(forwards.rates().values())
    {
        println!("  {s:>5}M -> {e:>5}M  {:>8.4}%", f * 100.0);
    }
}
