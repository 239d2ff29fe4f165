// src/linesearch.rs

//! Strong-Wolfe line search: bracketing followed by sectioning, with polynomial
//! interpolation proposing each trial step. This is a Fletcher-style scheme; it does
//! not try to minimize exactly along the line, only to find a step that decreases the
//! function enough (Armijo) while flattening the directional derivative (curvature).

use crate::poly::{Cubic, Quadratic};

/// Sufficient-decrease constant (Armijo).
const RHO: f64 = 0.01;
/// Curvature constant. Small, so accepted steps sit close to the 1-D minimum.
const SIGMA: f64 = 1e-4;
/// Bracket-extension factor.
const TAU1: f64 = 9.0;
/// Sectioning trust-interval fractions: trials are proposed inside
/// [a + TAU2*(b-a), b - TAU3*(b-a)].
const TAU2: f64 = 0.05;
const TAU3: f64 = 0.5;
/// Iteration budget per phase.
const MAX_PHASE_ITERS: usize = 100;

/// Outcome of a line search or a minimizer iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Success,
    /// Round-off or a degenerate gradient/direction prevents any further decrease.
    NoProgress,
}

/// A one-dimensional slice of the objective: step length -> (value, derivative).
pub trait ScalarFn {
    fn eval(&mut self, x: f64) -> (f64, f64);
}

/// Minimize `f` along the positive axis, starting from the trial step `*alpha`.
///
/// On `Success` the accepted step is written back to `*alpha`; it satisfies the
/// sufficient-decrease condition f(a) <= f(0) + a*RHO*f'(0) and, except when the
/// sectioning budget runs out first, the curvature condition |f'(a)| <= -SIGMA*f'(0).
/// Budget exhaustion is deliberately reported as `Success`: the bracket has shrunk
/// around a decreasing region and the last trial is a usable best-effort step.
///
/// On `NoProgress` the value of `*alpha` is left untouched.
pub fn min_search<F: ScalarFn>(f: &mut F, alpha: &mut f64) -> SearchStatus {
    let (f0, df0) = f.eval(0.0);
    if df0 >= 0.0 {
        // Not a descent direction; nothing to search.
        return SearchStatus::NoProgress;
    }

    // Lower bracket endpoint: known value and derivative. Starts at the origin.
    let mut a = 0.0;
    let mut fa = f0;
    let mut dfa = df0;

    // Upper bracket endpoint, filled in by the bracketing phase. The derivative is
    // None when the endpoint was produced by an Armijo failure (never evaluated as
    // an acceptable point, so its slope is not trusted).
    let mut b;
    let mut fb;
    let mut dfb: Option<f64>;

    let mut t = *alpha;

    // Phase 1: walk outward until an interval containing an acceptable step is
    // bracketed, or a trial already satisfies both Wolfe conditions.
    let mut iter = 0;
    loop {
        if iter >= MAX_PHASE_ITERS {
            // Best effort: the last evaluated trial passed Armijo each time we got
            // here, so it is at least a decrease.
            *alpha = a;
            return SearchStatus::Success;
        }
        iter += 1;

        let (ft, dft) = f.eval(t);

        if ft > f0 + t * RHO * df0 || ft >= fa {
            // Overshot: [a, t] brackets an acceptable step.
            b = t;
            fb = ft;
            dfb = None;
            break;
        }
        if dft.abs() <= -SIGMA * df0 {
            *alpha = t;
            return SearchStatus::Success;
        }
        if dft >= 0.0 {
            // Slope turned positive: the minimum is behind us, bracket [t, a].
            b = a;
            fb = fa;
            dfb = Some(dfa);
            a = t;
            fa = ft;
            dfa = dft;
            break;
        }

        // Still descending; extend. Propose the next trial by interpolating over an
        // extended window ahead of the current step.
        let delta = t - a;
        let next = interpolate(
            a,
            fa,
            dfa,
            t,
            ft,
            Some(dft),
            t + delta,
            t + TAU1 * delta,
        );
        a = t;
        fa = ft;
        dfa = dft;
        t = next;
    }

    // Phase 2: shrink the bracket [a, b] (which may be reversed, b < a) until a
    // trial satisfies both conditions.
    for _ in 0..MAX_PHASE_ITERS {
        t = interpolate(
            a,
            fa,
            dfa,
            b,
            fb,
            dfb,
            a + TAU2 * (b - a),
            b - TAU3 * (b - a),
        );

        // The best decrease still available from a is ~ (a - t)*f'(a); once that
        // falls under machine epsilon, round-off has won.
        if (a - t) * dfa <= f64::EPSILON {
            return SearchStatus::NoProgress;
        }

        let (ft, dft) = f.eval(t);

        if ft > f0 + t * RHO * df0 || ft >= fa {
            // Trial too high: it becomes the new upper end.
            b = t;
            fb = ft;
            dfb = None;
            continue;
        }
        if dft.abs() <= -SIGMA * df0 {
            *alpha = t;
            return SearchStatus::Success;
        }
        // Trial is acceptable as a new lower end. If its slope points toward the old
        // lower end, the minimum lies between them, so the old a becomes the new b.
        if (b - a).signum() == dft.signum() {
            b = a;
            fb = fa;
            dfb = Some(dfa);
        }
        a = t;
        fa = ft;
        dfa = dft;
    }

    // Sectioning budget exhausted: accept the last trial as best effort.
    *alpha = t;
    SearchStatus::Success
}

/// Propose a trial point inside [lo, hi] by fitting a polynomial to the bracket
/// endpoints and taking its interval minimum.
///
/// The bracket [a, b] is rescaled to [0, 1] first (derivatives scale by b-a), a Cubic
/// is fitted when both endpoint derivatives are known and a Quadratic otherwise, and
/// the minimizing abscissa over the rescaled trust interval is mapped back.
fn interpolate(
    a: f64,
    fa: f64,
    dfa: f64,
    b: f64,
    fb: f64,
    dfb: Option<f64>,
    lo: f64,
    hi: f64,
) -> f64 {
    let w = b - a;
    if w == 0.0 {
        return a;
    }
    let u_lo = (lo - a) / w;
    let u_hi = (hi - a) / w;

    let u = match dfb {
        Some(dfb) => Cubic::from_hermite(fa, dfa * w, fb, dfb * w).local_min(u_lo, u_hi),
        None => Quadratic::from_samples(fa, dfa * w, fb).local_min(u_lo, u_hi),
    };

    a + u * w
}
