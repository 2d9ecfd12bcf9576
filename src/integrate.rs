//! Adaptive quadrature backing the analytic reference integrator used by
//! [`crate::estimators::Estimator::ParamSquaredMean`].
//!
//! No external integration crate: neither the teacher nor the rest of the
//! retrieved pack reaches for one, and adaptive Simpson's rule is a single
//! well-scoped routine in the style of the teacher's own hand-rolled
//! iterative numerics.

use crate::error::{Error, Result};

const MAX_DEPTH: u32 = 50;

fn simpson(a: f64, b: f64, fa: f64, fb: f64, fm: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

#[allow(clippy::too_many_arguments)]
fn adaptive_simpson(
    f: &impl Fn(f64) -> f64,
    a: f64,
    b: f64,
    fa: f64,
    fb: f64,
    fm: f64,
    whole: f64,
    tol: f64,
    depth: u32,
) -> Result<f64> {
    if depth == 0 {
        return Err(Error::NumericalFailure(
            "adaptive quadrature exceeded maximum recursion depth".into(),
        ));
    }
    let m = 0.5 * (a + b);
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);
    let left = simpson(a, m, fa, fm, flm);
    let right = simpson(m, b, fm, fb, frm);

    if (left + right - whole).abs() <= 15.0 * tol {
        return Ok(left + right + (left + right - whole) / 15.0);
    }
    let left_val = adaptive_simpson(f, a, m, fa, fm, flm, left, tol / 2.0, depth - 1)?;
    let right_val = adaptive_simpson(f, m, b, fm, fb, frm, right, tol / 2.0, depth - 1)?;
    Ok(left_val + right_val)
}

/// Integrate `f` over `[a, b]` via adaptive Simpson's rule with a
/// Richardson error estimate, to within `tol`. Fails with
/// `Error::NumericalFailure` if the recursion depth cap is hit before
/// convergence, and with `Error::InvalidSettings` if `b <= a`.
pub fn adaptive_quad(f: impl Fn(f64) -> f64, a: f64, b: f64, tol: f64) -> Result<f64> {
    if !(b > a) {
        return Err(Error::InvalidSettings(format!(
            "adaptive_quad requires b > a, got a = {}, b = {}",
            a, b
        )));
    }
    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = simpson(a, b, fa, fb, fm);
    adaptive_simpson(&f, a, b, fa, fb, fm, whole, tol, MAX_DEPTH)
}
