//! Power-basis polynomials and Legendre polynomials.
//!
//! The spectral solution needs exact integrals and derivatives of products
//! of low-degree Legendre polynomials. Holding them as plain coefficient
//! vectors keeps those operations exact up to floating point.

use crate::FloatValue;
use std::ops::{Add, Mul};

/// Polynomial $\sum_k c_k x^k$ stored as `[c_0, c_1, ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<FloatValue>,
}

impl Polynomial {
    pub fn new(coefficients: Vec<FloatValue>) -> Self {
        if coefficients.is_empty() {
            return Self::zero();
        }
        Self { coefficients }
    }

    pub fn zero() -> Self {
        Self {
            coefficients: vec![0.0],
        }
    }

    pub fn constant(value: FloatValue) -> Self {
        Self {
            coefficients: vec![value],
        }
    }

    /// The monomial $x$.
    pub fn identity() -> Self {
        Self {
            coefficients: vec![0.0, 1.0],
        }
    }

    pub fn coefficients(&self) -> &[FloatValue] {
        &self.coefficients
    }

    /// Number of stored coefficients less one; trailing zeros are counted.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluate with Horner's rule.
    pub fn evaluate(&self, x: FloatValue) -> FloatValue {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn scale(&self, factor: FloatValue) -> Self {
        Self {
            coefficients: self.coefficients.iter().map(|c| c * factor).collect(),
        }
    }

    pub fn derivative(&self) -> Self {
        if self.coefficients.len() == 1 {
            return Self::zero();
        }
        Self {
            coefficients: self
                .coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, c)| k as FloatValue * c)
                .collect(),
        }
    }

    /// Derivative of order `order`; order zero is the polynomial itself.
    pub fn nth_derivative(&self, order: usize) -> Self {
        (0..order).fold(self.clone(), |p, _| p.derivative())
    }

    /// Antiderivative vanishing at zero.
    pub fn antiderivative(&self) -> Self {
        let mut coefficients = Vec::with_capacity(self.coefficients.len() + 1);
        coefficients.push(0.0);
        coefficients.extend(
            self.coefficients
                .iter()
                .enumerate()
                .map(|(k, c)| c / (k + 1) as FloatValue),
        );
        Self { coefficients }
    }

    /// $\int_{lower}^{upper} p(x)\,dx$.
    pub fn integrate(&self, lower: FloatValue, upper: FloatValue) -> FloatValue {
        let primitive = self.antiderivative();
        primitive.evaluate(upper) - primitive.evaluate(lower)
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, other: &Polynomial) -> Polynomial {
        let n = self.coefficients.len().max(other.coefficients.len());
        let coefficients = (0..n)
            .map(|k| {
                self.coefficients.get(k).copied().unwrap_or(0.0)
                    + other.coefficients.get(k).copied().unwrap_or(0.0)
            })
            .collect();
        Polynomial { coefficients }
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, other: &Polynomial) -> Polynomial {
        let mut coefficients = vec![0.0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        Polynomial { coefficients }
    }
}

/// Legendre polynomial $P_n$ in the power basis.
///
/// Built with Bonnet's recurrence
/// $(k+1) P_{k+1} = (2k+1)\,x P_k - k P_{k-1}$.
pub fn legendre(n: usize) -> Polynomial {
    let mut previous = Polynomial::constant(1.0);
    if n == 0 {
        return previous;
    }
    let mut current = Polynomial::identity();
    let x = Polynomial::identity();
    for k in 1..n {
        let k_f = k as FloatValue;
        let next = &(&x * &current).scale((2.0 * k_f + 1.0) / (k_f + 1.0))
            + &previous.scale(-k_f / (k_f + 1.0));
        previous = current;
        current = next;
    }
    current
}

/// $P_n(x)$ evaluated directly by the recurrence, without building coefficients.
pub fn legendre_value(n: usize, x: FloatValue) -> FloatValue {
    let mut p0 = 1.0;
    if n == 0 {
        return p0;
    }
    let mut p1 = x;
    for k in 1..n {
        let k_f = k as FloatValue;
        let p2 = ((2.0 * k_f + 1.0) * x * p1 - k_f * p0) / (k_f + 1.0);
        p0 = p1;
        p1 = p2;
    }
    p1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_low_degree_legendre() {
        assert_eq!(legendre(0).coefficients(), &[1.0]);
        assert_eq!(legendre(1).coefficients(), &[0.0, 1.0]);

        let p2 = legendre(2);
        assert_abs_diff_eq!(p2.coefficients()[0], -0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(p2.coefficients()[1], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p2.coefficients()[2], 1.5, epsilon = 1e-15);

        // P4 = (35x^4 - 30x^2 + 3) / 8
        let p4 = legendre(4);
        assert_abs_diff_eq!(p4.evaluate(0.5), (35.0 / 16.0 - 7.5 + 3.0) / 8.0, epsilon = 1e-14);
    }

    #[test]
    fn test_legendre_value_matches_coefficients() {
        for n in 0..=12 {
            let p = legendre(n);
            for k in 0..=10 {
                let x = k as FloatValue / 10.0;
                assert_abs_diff_eq!(p.evaluate(x), legendre_value(n, x), epsilon = 1e-11);
            }
            // P_n(1) = 1 for every degree
            assert_abs_diff_eq!(legendre_value(n, 1.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_even_legendre_orthogonal_on_half_range() {
        // Even P_n are orthogonal on [0, 1] with norm 1/(2n+1)
        for m in (0..=8).step_by(2) {
            for n in (0..=8).step_by(2) {
                let integral = (&legendre(m) * &legendre(n)).integrate(0.0, 1.0);
                let expected = if m == n { 1.0 / (2 * n + 1) as FloatValue } else { 0.0 };
                assert_abs_diff_eq!(integral, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_derivatives() {
        // p = 1 + 2x + 3x^2
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.derivative().coefficients(), &[2.0, 6.0]);
        assert_eq!(p.nth_derivative(2).coefficients(), &[6.0]);
        assert_eq!(p.nth_derivative(3).coefficients(), &[0.0]);
        assert_eq!(p.nth_derivative(0), p);
    }

    #[test]
    fn test_integrate() {
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        // x + x^2 + x^3 from 0 to 2
        assert_abs_diff_eq!(p.integrate(0.0, 2.0), 14.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.integrate(2.0, 0.0), -14.0, epsilon = 1e-12);
    }

    #[test]
    fn test_add_and_mul() {
        let p = Polynomial::new(vec![1.0, 1.0]);
        let q = Polynomial::new(vec![-1.0, 0.0, 2.0]);

        assert_eq!((&p + &q).coefficients(), &[0.0, 1.0, 2.0]);
        assert_eq!((&p * &q).coefficients(), &[-1.0, -1.0, 2.0, 2.0]);
        assert_eq!(Polynomial::new(vec![]), Polynomial::zero());
    }
}
