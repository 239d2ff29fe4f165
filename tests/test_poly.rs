use approx::assert_relative_eq;
use graphforce::poly::{Cubic, Quadratic, Roots};

#[test]
fn test_quadratic_roots_satisfy_vieta() {
    // A handful of quadratics with two distinct real roots, including ones where
    // the naive formula would cancel badly.
    let cases = [
        (6.0, -5.0, 1.0),       // roots 2, 3
        (-4.0, 0.0, 1.0),       // roots -2, 2 (b = 0 special case)
        (1.0, -1e8, 1.0),       // tiny root + huge root, cancellation territory
        (2.0, 7.0, -3.0),       // negative curvature
        (-0.25, 0.5, 4.0),
    ];

    for &(c0, c1, c2) in &cases {
        let q = Quadratic::new(c0, c1, c2);
        match q.roots() {
            Roots::Two(r1, r2) => {
                assert!(r1 <= r2, "roots out of order for ({c0}, {c1}, {c2})");
                for r in [r1, r2] {
                    let scale = c0.abs().max(c1.abs()).max(c2.abs()) * r.abs().max(1.0);
                    assert!(
                        q.eval(r).abs() < 1e-9 * scale.max(1.0),
                        "residual {} too large at root {} of ({c0}, {c1}, {c2})",
                        q.eval(r),
                        r
                    );
                }
                assert_relative_eq!(r1 * r2, c0 / c2, max_relative = 1e-9);
                assert_relative_eq!(r1 + r2, -c1 / c2, max_relative = 1e-9);
            }
            other => panic!("expected two roots for ({c0}, {c1}, {c2}), got {:?}", other),
        }
    }
}

#[test]
fn test_quadratic_roots_degenerate_cases() {
    // Constant: no roots.
    assert_eq!(Quadratic::new(5.0, 0.0, 0.0).roots(), Roots::None);
    // Linear: -4 + 2x has the single root 2.
    assert_eq!(Quadratic::new(-4.0, 2.0, 0.0).roots(), Roots::One(2.0));
    // Negative discriminant: complex pair, nothing returned.
    assert_eq!(Quadratic::new(1.0, 0.0, 1.0).roots(), Roots::None);
}

#[test]
fn test_quadratic_repeated_root_reported_twice() {
    // (x - 3)^2 = 9 - 6x + x^2
    match Quadratic::new(9.0, -6.0, 1.0).roots() {
        Roots::Two(r1, r2) => {
            assert_relative_eq!(r1, 3.0, max_relative = 1e-12);
            assert_relative_eq!(r2, 3.0, max_relative = 1e-12);
        }
        other => panic!("expected repeated root, got {:?}", other),
    }
}

#[test]
fn test_quadratic_local_min_interior_extremum() {
    // 1 - 4x + 2x^2 has positive curvature, vertex at x = 1.
    let q = Quadratic::new(1.0, -4.0, 2.0);
    assert_relative_eq!(q.local_min(0.0, 3.0), 1.0, max_relative = 1e-12);
    // Works with reversed endpoints too.
    assert_relative_eq!(q.local_min(3.0, 0.0), 1.0, max_relative = 1e-12);
}

#[test]
fn test_quadratic_local_min_endpoint_cases() {
    // Vertex outside the interval: the closer endpoint wins.
    let q = Quadratic::new(1.0, -4.0, 2.0);
    assert_eq!(q.local_min(2.0, 3.0), 2.0);

    // Concave quadratic on [0, 1]: minimum is whichever endpoint evaluates lower.
    let concave = Quadratic::new(0.0, 1.0, -2.0);
    let expected = if concave.eval(0.0) <= concave.eval(1.0) {
        0.0
    } else {
        1.0
    };
    assert_eq!(concave.local_min(0.0, 1.0), expected);
}

#[test]
fn test_cubic_from_hermite_reproduces_samples() {
    // Target cubic: 2 - 3x + x^3.
    let target = Cubic::new(2.0, -3.0, 0.0, 1.0);
    let fitted = Cubic::from_hermite(
        target.eval(0.0),
        -3.0, // C'(0)
        target.eval(1.0),
        0.0, // C'(1) = 3 - 3
    );
    for x in [0.0, 0.25, 0.5, 0.75, 1.0, 2.0, -1.0] {
        assert_relative_eq!(fitted.eval(x), target.eval(x), epsilon = 1e-12);
    }
}

#[test]
fn test_cubic_derivative_is_quadratic() {
    let c = Cubic::new(1.0, 2.0, 3.0, 4.0);
    let d = c.derivative();
    assert_relative_eq!(d.c0, 2.0);
    assert_relative_eq!(d.c1, 6.0);
    assert_relative_eq!(d.c2, 12.0);
}

#[test]
fn test_cubic_local_min_interior_stationary_point() {
    // 2 - 3x + x^3 has stationary points at x = +/-1; the interior minimum on
    // (-1.5, 2) is at x = 1.
    let c = Cubic::new(2.0, -3.0, 0.0, 1.0);
    assert_relative_eq!(c.local_min(-1.5, 2.0), 1.0, max_relative = 1e-9);
}

#[test]
fn test_cubic_local_min_endpoint_when_monotone() {
    // x^3 is monotone on (0.5, 2): the lower endpoint is the minimum.
    let c = Cubic::new(0.0, 0.0, 0.0, 1.0);
    assert_eq!(c.local_min(0.5, 2.0), 0.5);
}
