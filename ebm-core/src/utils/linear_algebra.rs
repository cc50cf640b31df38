//! Linear algebra utilities.

use crate::errors::{EBMError, EBMResult};
use crate::FloatValue;

/// Pivots smaller than this in magnitude are treated as zero.
const PIVOT_EPSILON: FloatValue = 1e-15;

/// Solve the tridiagonal system $Ax = d$ with the Thomas algorithm.
///
/// The matrix has the form:
/// ```text
/// | b[0]  c[0]   0     0    ...   0   |
/// | a[1]  b[1]  c[1]   0    ...   0   |
/// |  0    a[2]  b[2]  c[2]  ...   0   |
/// | ...   ...   ...   ...   ...  ... |
/// |  0     0     0   a[n-1] b[n-1]   |
/// ```
///
/// `a[0]` and `c[n-1]` are ignored. The algorithm does no pivoting, so it is
/// only safe for diagonally dominant systems such as implicit diffusion steps.
///
/// # Errors
///
/// [`EBMError::Domain`] if the slices differ in length, are empty, or a zero
/// pivot is met during elimination.
///
/// # Example
/// ```
/// use ebm_core::utils::linear_algebra::thomas_solve;
///
/// let a = vec![0.0, -1.0, -1.0];
/// let b = vec![2.0, 2.0, 2.0];
/// let c = vec![-1.0, -1.0, 0.0];
/// let d = vec![1.0, 0.0, 1.0];
///
/// let x = thomas_solve(&a, &b, &c, &d).unwrap();
/// assert!(x.iter().all(|v| (v - 1.0).abs() < 1e-10));
/// ```
pub fn thomas_solve(
    a: &[FloatValue],
    b: &[FloatValue],
    c: &[FloatValue],
    d: &[FloatValue],
) -> EBMResult<Vec<FloatValue>> {
    let n = b.len();
    if n == 0 {
        return Err(EBMError::Domain(
            "tridiagonal system has no equations".to_string(),
        ));
    }
    if a.len() != n || c.len() != n || d.len() != n {
        return Err(EBMError::Domain(format!(
            "tridiagonal bands must share length {} (got a={}, c={}, d={})",
            n,
            a.len(),
            c.len(),
            d.len()
        )));
    }

    let mut c_prime = vec![0.0; n];
    let mut x = vec![0.0; n];

    // Forward sweep, storing the modified right-hand side in x
    let mut pivot = b[0];
    for i in 0..n {
        if i > 0 {
            pivot = b[i] - a[i] * c_prime[i - 1];
        }
        if !(pivot.abs() > PIVOT_EPSILON) {
            return Err(EBMError::Domain(format!(
                "zero pivot in tridiagonal solve at row {}",
                i
            )));
        }
        if i < n - 1 {
            c_prime[i] = c[i] / pivot;
        }
        let carried = if i > 0 { a[i] * x[i - 1] } else { 0.0 };
        x[i] = (d[i] - carried) / pivot;
    }

    // Back substitution
    for i in (0..n - 1).rev() {
        x[i] -= c_prime[i] * x[i + 1];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thomas_identity() {
        let a = vec![0.0; 3];
        let b = vec![1.0; 3];
        let c = vec![0.0; 3];
        let d = vec![1.0, 2.0, 3.0];

        assert_eq!(thomas_solve(&a, &b, &c, &d).unwrap(), d);
    }

    #[test]
    fn test_thomas_two_equations() {
        // | 4  1 | x = | 1 |  =>  x = (1/11, 7/11)
        // | 1  3 |     | 2 |
        let x = thomas_solve(&[0.0, 1.0], &[4.0, 3.0], &[1.0, 0.0], &[1.0, 2.0]).unwrap();

        assert!((x[0] - 1.0 / 11.0).abs() < 1e-12, "x[0] = {}", x[0]);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-12, "x[1] = {}", x[1]);
    }

    #[test]
    fn test_thomas_implicit_diffusion_residual() {
        // Backward Euler step of u_t = u_xx with insulated ends
        let n = 40;
        let r = 25.0;
        let a: Vec<FloatValue> = (0..n).map(|i| if i == 0 { 0.0 } else { -r }).collect();
        let c: Vec<FloatValue> = (0..n).map(|i| if i == n - 1 { 0.0 } else { -r }).collect();
        let b: Vec<FloatValue> = (0..n)
            .map(|i| if i == 0 || i == n - 1 { 1.0 + r } else { 1.0 + 2.0 * r })
            .collect();
        let d: Vec<FloatValue> = (0..n).map(|i| (i as FloatValue * 0.3).sin()).collect();

        let x = thomas_solve(&a, &b, &c, &d).unwrap();

        for i in 0..n {
            let mut lhs = b[i] * x[i];
            if i > 0 {
                lhs += a[i] * x[i - 1];
            }
            if i < n - 1 {
                lhs += c[i] * x[i + 1];
            }
            assert!((lhs - d[i]).abs() < 1e-10, "residual at {}", i);
        }

        // Insulated ends conserve the total
        let before: FloatValue = d.iter().sum();
        let after: FloatValue = x.iter().sum();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_thomas_single_equation() {
        let x = thomas_solve(&[0.0], &[3.0], &[0.0], &[6.0]).unwrap();
        assert_eq!(x.len(), 1);
        assert!((x[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_thomas_zero_pivot() {
        // After elimination: b[1] - a[1]*c[0]/b[0] = 1 - 1 = 0
        let result = thomas_solve(&[0.0, 1.0], &[1.0, 1.0], &[1.0, 0.0], &[1.0, 1.0]);
        assert!(matches!(result, Err(EBMError::Domain(_))));
    }

    #[test]
    fn test_thomas_length_mismatch() {
        let result = thomas_solve(&[0.0, 1.0], &[1.0, 2.0, 3.0], &[1.0; 3], &[1.0; 3]);
        assert!(matches!(result, Err(EBMError::Domain(_))));

        let result = thomas_solve(&[], &[], &[], &[]);
        assert!(matches!(result, Err(EBMError::Domain(_))));
    }
}
