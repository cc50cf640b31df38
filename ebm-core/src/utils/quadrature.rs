//! Adaptive Simpson quadrature.

use crate::errors::{EBMError, EBMResult};
use crate::FloatValue;

/// Default absolute error target.
pub const DEFAULT_TOLERANCE: FloatValue = 1e-10;

/// Recursion depth after which an interval is accepted as is.
pub const DEFAULT_MAX_DEPTH: usize = 40;

/// $\int_a^b f(x)\,dx$ by adaptive Simpson's rule.
///
/// Each interval is halved until the Richardson estimate of its error falls
/// under its share of `tolerance` or `max_depth` is reached.
///
/// # Errors
///
/// [`EBMError::Domain`] if the bounds or the integral are not finite.
pub fn adaptive_simpson<F>(
    f: F,
    a: FloatValue,
    b: FloatValue,
    tolerance: FloatValue,
    max_depth: usize,
) -> EBMResult<FloatValue>
where
    F: Fn(FloatValue) -> FloatValue,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(EBMError::Domain(format!(
            "integration bounds must be finite, got [{}, {}]",
            a, b
        )));
    }
    if a == b {
        return Ok(0.0);
    }

    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = simpson(a, b, fa, fm, fb);
    let integral = refine(&f, a, b, fa, fm, fb, whole, tolerance, max_depth);

    if integral.is_finite() {
        Ok(integral)
    } else {
        Err(EBMError::Domain(format!(
            "integral over [{}, {}] is not finite",
            a, b
        )))
    }
}

/// [`adaptive_simpson`] with the default tolerance and depth.
pub fn integrate<F>(f: F, a: FloatValue, b: FloatValue) -> EBMResult<FloatValue>
where
    F: Fn(FloatValue) -> FloatValue,
{
    adaptive_simpson(f, a, b, DEFAULT_TOLERANCE, DEFAULT_MAX_DEPTH)
}

fn simpson(a: FloatValue, b: FloatValue, fa: FloatValue, fm: FloatValue, fb: FloatValue) -> FloatValue {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

#[allow(clippy::too_many_arguments)]
fn refine<F>(
    f: &F,
    a: FloatValue,
    b: FloatValue,
    fa: FloatValue,
    fm: FloatValue,
    fb: FloatValue,
    whole: FloatValue,
    tolerance: FloatValue,
    depth: usize,
) -> FloatValue
where
    F: Fn(FloatValue) -> FloatValue,
{
    let m = 0.5 * (a + b);
    let lm = 0.5 * (a + m);
    let rm = 0.5 * (m + b);
    let flm = f(lm);
    let frm = f(rm);
    let left = simpson(a, m, fa, flm, fm);
    let right = simpson(m, b, fm, frm, fb);
    let delta = left + right - whole;

    if depth == 0 || delta.abs() <= 15.0 * tolerance {
        return left + right + delta / 15.0;
    }
    refine(f, a, m, fa, flm, fm, left, 0.5 * tolerance, depth - 1)
        + refine(f, m, b, fm, frm, fb, right, 0.5 * tolerance, depth - 1)
}
