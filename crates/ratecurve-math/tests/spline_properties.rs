//! Property tests for the pointwise interpolators.

use proptest::prelude::*;
use ratecurve_math::interpolation::{
    CubicSpline, HermiteSpline, Interpolator, LinearInterpolator, MonotoneSpline,
};

/// Strictly increasing knots with strictly increasing values.
fn increasing_knots() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.05f64..2.0, 0.0001f64..0.01), 3..10).prop_map(|steps| {
        let mut x = 0.0;
        let mut y = 0.01;
        let mut xs = Vec::with_capacity(steps.len());
        let mut ys = Vec::with_capacity(steps.len());
        for (dx, dy) in steps {
            x += dx;
            y += dy;
            xs.push(x);
            ys.push(y);
        }
        (xs, ys)
    })
}

proptest! {
    #[test]
    fn monotone_spline_preserves_monotone_data((xs, ys) in increasing_knots()) {
        let spline = MonotoneSpline::new(xs.clone(), ys.clone()).unwrap();
        let lo = xs[0];
        let hi = xs[xs.len() - 1];

        let mut prev = spline.interpolate(lo).unwrap();
        for k in 1..=200 {
            let x = lo + (hi - lo) * f64::from(k) / 200.0;
            let y = spline.interpolate(x.min(hi)).unwrap();
            prop_assert!(y >= prev - 1e-12, "decrease at x={}: {} < {}", x, y, prev);
            prev = y;
        }
    }

    #[test]
    fn monotone_spline_stays_within_knot_values((xs, ys) in increasing_knots()) {
        let spline = MonotoneSpline::new(xs.clone(), ys.clone()).unwrap();

        for w in xs.windows(2).zip(ys.windows(2)) {
            let ((x0, x1), (y0, y1)) = ((w.0[0], w.0[1]), (w.1[0], w.1[1]));
            let mid = spline.interpolate(0.5 * (x0 + x1)).unwrap();
            prop_assert!(mid >= y0 - 1e-12 && mid <= y1 + 1e-12);
        }
    }

    #[test]
    fn interpolators_reproduce_knots((xs, ys) in increasing_knots()) {
        let interps: Vec<Box<dyn Interpolator>> = vec![
            Box::new(LinearInterpolator::new(xs.clone(), ys.clone()).unwrap()),
            Box::new(CubicSpline::new(xs.clone(), ys.clone()).unwrap()),
            Box::new(HermiteSpline::new(xs.clone(), ys.clone()).unwrap()),
            Box::new(MonotoneSpline::new(xs.clone(), ys.clone()).unwrap()),
        ];

        for interp in &interps {
            for (x, y) in xs.iter().zip(&ys) {
                let v = interp.interpolate(*x).unwrap();
                prop_assert!((v - y).abs() < 1e-10);
            }
        }
    }
}
