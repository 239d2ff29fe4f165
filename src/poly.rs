// src/poly.rs

//! Quadratic and cubic polynomials with closed-form root finding and
//! local-minimum-on-interval queries. These are the interpolation workhorses of the
//! line search: each sectioning step builds one of these from sampled function values
//! and derivatives, asks for its minimum over a trust interval, and throws it away.

/// Real roots of a quadratic, ordered when there are two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roots {
    /// No real roots (complex conjugate pair, or a constant polynomial).
    None,
    /// Single root (degenerate linear case).
    One(f64),
    /// Two real roots with r1 <= r2. A repeated root is reported twice.
    Two(f64, f64),
}

/// c0 + c1*x + c2*x^2
#[derive(Debug, Clone, Copy)]
pub struct Quadratic {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
}

impl Quadratic {
    pub fn new(c0: f64, c1: f64, c2: f64) -> Self {
        Quadratic { c0, c1, c2 }
    }

    /// Build the quadratic matching value `f0` and derivative `df0` at x=0 and
    /// value `f1` at x=1.
    pub fn from_samples(f0: f64, df0: f64, f1: f64) -> Self {
        Quadratic {
            c0: f0,
            c1: df0,
            c2: f1 - f0 - df0,
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.c0 + x * (self.c1 + x * self.c2)
    }

    /// Real roots, computed with the cancellation-free formula: the root nearer to
    /// the vertex comes from Vieta's product rather than the subtractive branch of
    /// the quadratic formula.
    pub fn roots(&self) -> Roots {
        if self.c2 == 0.0 {
            // Linear case.
            if self.c1 == 0.0 {
                return Roots::None;
            }
            return Roots::One(-self.c0 / self.c1);
        }

        let disc = self.c1 * self.c1 - 4.0 * self.c2 * self.c0;
        if disc < 0.0 {
            return Roots::None;
        }
        if disc == 0.0 {
            let r = -self.c1 / (2.0 * self.c2);
            return Roots::Two(r, r);
        }

        let (r1, r2) = if self.c1 == 0.0 {
            let r = (-self.c0 / self.c2).sqrt();
            (-r, r)
        } else {
            let q = -0.5 * (self.c1 + self.c1.signum() * disc.sqrt());
            (q / self.c2, self.c0 / q)
        };

        if r1 <= r2 {
            Roots::Two(r1, r2)
        } else {
            Roots::Two(r2, r1)
        }
    }

    /// Location of the lowest value over the closed interval between `a` and `b`
    /// (endpoints may come in either order).
    ///
    /// With positive curvature the unconstrained extremum -c1/(2*c2) dominates both
    /// endpoints whenever it falls strictly inside the interval; otherwise the
    /// minimum sits on an endpoint.
    pub fn local_min(&self, a: f64, b: f64) -> f64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        if self.c2 > 0.0 {
            let x = -self.c1 / (2.0 * self.c2);
            if lo < x && x < hi {
                return x;
            }
        }
        if self.eval(lo) <= self.eval(hi) {
            lo
        } else {
            hi
        }
    }
}

/// c0 + c1*x + c2*x^2 + c3*x^3
#[derive(Debug, Clone, Copy)]
pub struct Cubic {
    pub c0: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl Cubic {
    pub fn new(c0: f64, c1: f64, c2: f64, c3: f64) -> Self {
        Cubic { c0, c1, c2, c3 }
    }

    /// Hermite form: match value and derivative at both x=0 and x=1.
    pub fn from_hermite(f0: f64, df0: f64, f1: f64, df1: f64) -> Self {
        Cubic {
            c0: f0,
            c1: df0,
            c2: 3.0 * (f1 - f0) - 2.0 * df0 - df1,
            c3: 2.0 * (f0 - f1) + df0 + df1,
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.c0 + x * (self.c1 + x * (self.c2 + x * self.c3))
    }

    pub fn derivative(&self) -> Quadratic {
        Quadratic::new(self.c1, 2.0 * self.c2, 3.0 * self.c3)
    }

    /// Location of the lowest value over the closed interval between `a` and `b`
    /// (endpoints may come in either order). Checks both endpoints and every
    /// stationary point strictly inside the interval; a cubic has at most two, so
    /// the scan is exhaustive.
    pub fn local_min(&self, a: f64, b: f64) -> f64 {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let mut best_x = lo;
        let mut best_f = self.eval(lo);
        let f_hi = self.eval(hi);
        if f_hi < best_f {
            best_x = hi;
            best_f = f_hi;
        }

        let stationary = match self.derivative().roots() {
            Roots::None => Vec::new(),
            Roots::One(r) => vec![r],
            Roots::Two(r1, r2) => vec![r1, r2],
        };
        for r in stationary {
            if lo < r && r < hi {
                let f_r = self.eval(r);
                if f_r < best_f {
                    best_x = r;
                    best_f = f_r;
                }
            }
        }

        best_x
    }
}
