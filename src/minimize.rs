// src/minimize.rs

//! Multidimensional minimizer built on the strong-Wolfe line search. Each iteration
//! searches along the current direction, publishes the accepted point to a shared
//! vector under its mutex, then picks the next direction with a memoryless
//! quasi-Newton update (a generalized Polak-Ribiere step using both the gradient and
//! position differences of the last accepted move).

use std::sync::Mutex;

use crate::linesearch::{min_search, ScalarFn, SearchStatus};

/// The function being minimized: a smooth map from a flat coordinate vector to a
/// scalar, with an analytic gradient. `evaluate` writes the gradient into `grad`
/// (same length as `x`) and returns the value.
pub trait Objective {
    fn dim(&self) -> usize;
    fn evaluate(&self, x: &[f64], grad: &mut [f64]) -> f64;
}

/// One cached evaluation of the directional slice, keyed on the step length. An
/// absent cache means "nothing valid"; the step length itself is never used as a
/// sentinel, so a legitimate query at 0.0 caches like any other.
struct CachedEval {
    alpha: f64,
    value: f64,
    deriv: f64,
}

/// Adapter presenting the objective restricted to a ray x0 + alpha*dir as a
/// one-dimensional function. Lives for exactly one search direction; a new direction
/// gets a fresh adapter (and therefore an empty cache).
struct Directional<'a, O: Objective + ?Sized> {
    objective: &'a O,
    x0: &'a [f64],
    dir: &'a [f64],
    // Scratch buffers reused across evaluations.
    x: Vec<f64>,
    grad: Vec<f64>,
    cache: Option<CachedEval>,
}

impl<'a, O: Objective + ?Sized> Directional<'a, O> {
    fn new(objective: &'a O, x0: &'a [f64], dir: &'a [f64]) -> Self {
        let n = x0.len();
        Directional {
            objective,
            x0,
            dir,
            x: vec![0.0; n],
            grad: vec![0.0; n],
            cache: None,
        }
    }
}

impl<'a, O: Objective + ?Sized> ScalarFn for Directional<'a, O> {
    fn eval(&mut self, alpha: f64) -> (f64, f64) {
        if let Some(ref c) = self.cache {
            if c.alpha == alpha {
                return (c.value, c.deriv);
            }
        }

        for i in 0..self.x0.len() {
            self.x[i] = self.x0[i] + alpha * self.dir[i];
        }
        let value = self.objective.evaluate(&self.x, &mut self.grad);
        let deriv = dot(&self.grad, self.dir);

        self.cache = Some(CachedEval { alpha, value, deriv });
        (value, deriv)
    }
}

/// Iterative minimizer state. Owns the current iterate exclusively; the only shared
/// mutable state is the result vector behind `shared`, written as a complete vector
/// under lock once per successful iteration.
pub struct Minimizer<'a, O: Objective + ?Sized> {
    objective: &'a O,
    shared: &'a Mutex<Vec<f64>>,
    x: Vec<f64>,
    fx: f64,
    grad: Vec<f64>,
    grad_norm: f64,
    dir: Vec<f64>,
    dir_norm: f64,
    /// Directional derivative of the objective along `dir` at `x`.
    fp0: f64,
    prev_alpha: f64,
    /// Decrease achieved by the previous iteration (f_new - f_old, negative when
    /// progress was made). Seeds the Newton-like trial-step estimate.
    delta_f: f64,
}

impl<'a, O: Objective + ?Sized> Minimizer<'a, O> {
    /// Reads the starting point from the shared vector under lock, evaluates the
    /// objective once, and points the first search down the negative gradient.
    pub fn new(objective: &'a O, shared: &'a Mutex<Vec<f64>>) -> Self {
        let x = shared.lock().unwrap().clone();
        let n = x.len();

        let mut grad = vec![0.0; n];
        let fx = objective.evaluate(&x, &mut grad);
        let grad_norm = norm(&grad);

        let mut dir = vec![0.0; n];
        if grad_norm > 0.0 {
            for i in 0..n {
                dir[i] = -grad[i] / grad_norm;
            }
        }
        let dir_norm = if grad_norm > 0.0 { 1.0 } else { 0.0 };

        Minimizer {
            objective,
            shared,
            x,
            fx,
            grad,
            grad_norm,
            dir,
            dir_norm,
            fp0: -grad_norm,
            prev_alpha: 1.0,
            // Seeded on the order of |f| so the first iteration takes the
            // Newton-like estimate instead of an arbitrary fixed step.
            delta_f: -fx.abs(),
        }
    }

    pub fn value(&self) -> f64 {
        self.fx
    }

    pub fn grad_norm_squared(&self) -> f64 {
        self.grad_norm * self.grad_norm
    }

    pub fn position(&self) -> &[f64] {
        &self.x
    }

    /// One line-search step plus direction update.
    ///
    /// Returns `Success` after a normal iteration; propagates the line search's
    /// `NoProgress` unchanged, in which case the iterate, the direction, and the
    /// shared vector are all left exactly as they were (a zero step).
    pub fn iterate(&mut self) -> SearchStatus {
        if self.dir_norm == 0.0 || self.grad_norm == 0.0 || self.fp0 == 0.0 {
            return SearchStatus::NoProgress;
        }

        let mut alpha = if self.delta_f < 0.0 {
            let target = (-self.delta_f).max(10.0 * f64::EPSILON * self.fx.abs());
            (2.0 * target / -self.fp0).min(1.0)
        } else {
            self.prev_alpha.abs()
        };

        let status = {
            let mut slice = Directional::new(self.objective, &self.x, &self.dir);
            min_search(&mut slice, &mut alpha)
        };
        if status != SearchStatus::Success {
            return status;
        }

        let n = self.x.len();
        let mut x_new = vec![0.0; n];
        for i in 0..n {
            x_new[i] = self.x[i] + alpha * self.dir[i];
        }
        let mut grad_new = vec![0.0; n];
        let f_new = self.objective.evaluate(&x_new, &mut grad_new);

        // The one externally visible write: a complete position vector, never a
        // partial update.
        {
            let mut shared = self.shared.lock().unwrap();
            shared.copy_from_slice(&x_new);
        }

        // Direction update from the position and gradient differences of this step.
        let mut dx = vec![0.0; n];
        let mut dg = vec![0.0; n];
        for i in 0..n {
            dx[i] = x_new[i] - self.x[i];
            dg[i] = grad_new[i] - self.grad[i];
        }
        let dx_g = dot(&dx, &grad_new);
        let dg_g = dot(&dg, &grad_new);
        let dx_dg = dot(&dx, &dg);

        let (coef_a, coef_b) = if dx_dg == 0.0 {
            (0.0, 0.0)
        } else {
            (dg_g / dx_dg, dx_g / dx_dg)
        };

        for i in 0..n {
            self.dir[i] = grad_new[i] - coef_a * dx[i] - coef_b * dg[i];
        }
        self.dir_norm = norm(&self.dir);
        if self.dir_norm > 0.0 {
            for d in self.dir.iter_mut() {
                *d /= self.dir_norm;
            }
            self.dir_norm = 1.0;
        }
        // Must descend: flip if the new direction climbs the gradient.
        let mut fp0 = dot(&self.dir, &grad_new);
        if fp0 > 0.0 {
            for d in self.dir.iter_mut() {
                *d = -*d;
            }
            fp0 = -fp0;
        }
        self.fp0 = fp0;

        self.delta_f = f_new - self.fx;
        self.prev_alpha = alpha;
        self.x = x_new;
        self.fx = f_new;
        self.grad = grad_new;
        self.grad_norm = norm(&self.grad);

        SearchStatus::Success
    }
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

pub(crate) fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}
