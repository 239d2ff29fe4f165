use graphforce::linesearch::{min_search, ScalarFn, SearchStatus};

/// Wrap a closure returning (value, derivative) as a 1-D search target, counting
/// evaluations.
struct Func<F: Fn(f64) -> (f64, f64)> {
    f: F,
    evals: usize,
}

impl<F: Fn(f64) -> (f64, f64)> Func<F> {
    fn new(f: F) -> Self {
        Func { f, evals: 0 }
    }
}

impl<F: Fn(f64) -> (f64, f64)> ScalarFn for Func<F> {
    fn eval(&mut self, x: f64) -> (f64, f64) {
        self.evals += 1;
        (self.f)(x)
    }
}

const RHO: f64 = 0.01;
const SIGMA: f64 = 1e-4;

/// Check the strong Wolfe conditions for an accepted step.
fn assert_strong_wolfe<F: Fn(f64) -> (f64, f64)>(f: &F, alpha: f64) {
    let (f0, df0) = f(0.0);
    let (fa, dfa) = f(alpha);
    assert!(
        fa <= f0 + alpha * RHO * df0 + 1e-12,
        "sufficient decrease violated: f({alpha}) = {fa}, bound = {}",
        f0 + alpha * RHO * df0
    );
    assert!(
        dfa.abs() <= -SIGMA * df0 + 1e-12,
        "curvature violated: |f'({alpha})| = {} > {}",
        dfa.abs(),
        -SIGMA * df0
    );
}

#[test]
fn test_parabola_accepts_wolfe_step() {
    let parabola = |x: f64| ((x - 1.5) * (x - 1.5), 2.0 * (x - 1.5));
    let mut func = Func::new(parabola);

    let mut alpha = 1.0;
    let status = min_search(&mut func, &mut alpha);

    assert_eq!(status, SearchStatus::Success);
    assert!(alpha > 0.0);
    assert_strong_wolfe(&parabola, alpha);
    // The curvature constant is tight, so the accepted step sits close to the
    // exact minimum.
    assert!((alpha - 1.5).abs() < 1e-3, "alpha = {alpha}");
}

#[test]
fn test_bracketing_extends_small_initial_step() {
    let parabola = |x: f64| ((x - 4.0) * (x - 4.0), 2.0 * (x - 4.0));
    let mut func = Func::new(parabola);

    // Far below the minimizer: the bracketing phase has to walk outward first.
    let mut alpha = 0.01;
    let status = min_search(&mut func, &mut alpha);

    assert_eq!(status, SearchStatus::Success);
    assert_strong_wolfe(&parabola, alpha);
}

#[test]
fn test_overshoot_is_sectioned_back() {
    let parabola = |x: f64| ((x - 0.2) * (x - 0.2), 2.0 * (x - 0.2));
    let mut func = Func::new(parabola);

    // Way past the minimizer: the first trial fails Armijo and sectioning takes
    // over.
    let mut alpha = 5.0;
    let status = min_search(&mut func, &mut alpha);

    assert_eq!(status, SearchStatus::Success);
    assert_strong_wolfe(&parabola, alpha);
}

#[test]
fn test_strictly_convex_quartic() {
    let quartic = |x: f64| {
        let d = x - 0.7;
        (d.powi(4) + d * d, 4.0 * d.powi(3) + 2.0 * d)
    };
    let mut func = Func::new(quartic);

    let mut alpha = 1.0;
    let status = min_search(&mut func, &mut alpha);

    assert_eq!(status, SearchStatus::Success);
    assert_strong_wolfe(&quartic, alpha);
    assert!((alpha - 0.7).abs() < 1e-3, "alpha = {alpha}");
}

#[test]
fn test_unbounded_ramp_exhausts_bracketing_budget() {
    // f(x) = -x: Armijo never fails, the slope never flattens or turns positive,
    // so the bracketing phase walks outward until its iteration budget runs out
    // and reports the last evaluated trial as a best-effort success.
    let ramp = |x: f64| (-x, -1.0);
    let mut func = Func::new(ramp);

    let mut alpha = 1.0;
    let status = min_search(&mut func, &mut alpha);

    assert_eq!(status, SearchStatus::Success);
    assert!(alpha > 1.0 && alpha.is_finite(), "alpha = {alpha}");
    // One evaluation at the origin plus one per bracketing iteration.
    assert_eq!(func.evals, 101);
    // The best-effort step still satisfies sufficient decrease.
    let (f0, df0) = ramp(0.0);
    let (fa, _) = ramp(alpha);
    assert!(fa <= f0 + alpha * RHO * df0);
}

#[test]
fn test_round_off_limited_bracket_reports_no_progress() {
    // The minimum sits at 1e-18, so the decrease reachable from the origin is far
    // below machine epsilon; sectioning must detect that round-off blocks any
    // further progress instead of looping.
    let m = 1e-18;
    let tiny = move |x: f64| ((x - m) * (x - m), 2.0 * (x - m));
    let mut func = Func::new(tiny);

    let mut alpha = 1.0;
    let status = min_search(&mut func, &mut alpha);

    assert_eq!(status, SearchStatus::NoProgress);
    // alpha is only written on success.
    assert_eq!(alpha, 1.0);
}

#[test]
fn test_non_descent_direction_reports_no_progress() {
    // Derivative at the origin is zero: nothing to search.
    let flat_bottom = |x: f64| (x * x, 2.0 * x);
    let mut func = Func::new(flat_bottom);

    let mut alpha = 0.5;
    let status = min_search(&mut func, &mut alpha);

    assert_eq!(status, SearchStatus::NoProgress);
    // alpha is only written on success.
    assert_eq!(alpha, 0.5);
}

#[test]
fn test_uphill_direction_reports_no_progress() {
    let uphill = |x: f64| (x, 1.0);
    let mut func = Func::new(uphill);

    let mut alpha = 1.0;
    assert_eq!(min_search(&mut func, &mut alpha), SearchStatus::NoProgress);
    assert_eq!(alpha, 1.0);
}

#[test]
fn test_non_polynomial_function_converges() {
    // f(x) = -sin(x): descending from the origin, minimum at pi/2.
    let wave = |x: f64| (-x.sin(), -x.cos());
    let mut func = Func::new(wave);

    let mut alpha = 0.3;
    let status = min_search(&mut func, &mut alpha);

    assert_eq!(status, SearchStatus::Success);
    assert_strong_wolfe(&wave, alpha);
    assert!((alpha - std::f64::consts::FRAC_PI_2).abs() < 1e-2, "alpha = {alpha}");
}
