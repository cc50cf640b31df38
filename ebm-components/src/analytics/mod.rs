//! Spectral (Legendre-series) solution of the steady-state EBM
//!
//! Follows North et al. (1981). With $x = \sin\phi$, a steady state satisfies
//!
//! $$-\frac{d}{dx}\left[D(1-x^2)\frac{dT}{dx}\right] + A + BT = Q\,S(x)\,a(x, x_i)$$
//!
//! where $S(x) = 1 + S_2 P_2(x)$. Expanding $T = \sum_n T_n P_n(x)$ over even
//! degrees gives
//!
//! $$T_n = \frac{Q H_n(x_i)}{L_n} - \delta_{n0}\frac{A}{B},\qquad
//!   L_n = n(n+1)D + B,$$
//!
//! $$H_n(x_i) = (2n+1)\int_0^1 S(x)\,a(x, x_i)\,P_n(x)\,dx.$$
//!
//! Requiring $T(x_i) = T_{ice}$ then fixes the forcing that sustains the edge:
//!
//! $$Q(x_i) = \frac{A + B\,T_{ice}}{B \sum_n H_n(x_i) P_n(x_i) / L_n}.$$
//!
//! Odd degrees vanish by hemispheric symmetry and are never evaluated.

mod diagnostics;

pub use diagnostics::{
    diffusivity_stability_curves, fit_between, ice_edge_heat_flux_convergence, linear_fit,
    stability_branches, stability_curve, to_petawatts, LinearFit, WATTS_PER_PETAWATT,
};

use ebm_core::coalbedo::CoalbedoModel;
use ebm_core::errors::{EBMError, EBMResult};
use ebm_core::grid::AnalyticGrid;
use ebm_core::parameters::ModelParameters;
use ebm_core::utils::polynomial::{legendre, legendre_value, Polynomial};
use ebm_core::utils::quadrature;
use ebm_core::FloatValue;
use log::trace;
use ndarray::Array1;
use std::f64::consts::PI;

/// Insolation weighting $1 + S_2 P_2(x)$ as a polynomial.
fn insolation_weight(params: &ModelParameters) -> Polynomial {
    &Polynomial::constant(1.0) + &legendre(2).scale(params.insolation_asymmetry)
}

fn check_ice_edge(xi: FloatValue) -> EBMResult<()> {
    if (0.0..=1.0).contains(&xi) {
        Ok(())
    } else {
        Err(EBMError::Domain(format!(
            "ice edge must lie in [0, 1], got {}",
            xi
        )))
    }
}

/// $H_n(x_i)$ for the step coalbedo, integrated exactly.
///
/// The integrand is a polynomial on either side of the edge, so the integral
/// splits at $x_i$ into two exact antiderivative evaluations.
pub fn hn_step(degree: usize, xi: FloatValue, params: &ModelParameters) -> EBMResult<FloatValue> {
    check_ice_edge(xi)?;
    let integrand = &legendre(degree) * &insolation_weight(params);
    let primitive = integrand.antiderivative();

    let ice_free = params.coalbedo_free * (primitive.evaluate(xi) - primitive.evaluate(0.0));
    let ice_covered = params.coalbedo_ice * (primitive.evaluate(1.0) - primitive.evaluate(xi));
    let hn = (2 * degree + 1) as FloatValue * (ice_free + ice_covered);

    if hn.is_finite() {
        Ok(hn)
    } else {
        Err(EBMError::Domain(format!(
            "H_{} is not finite at xi = {}",
            degree, xi
        )))
    }
}

/// $H_n(x_i)$ for the smoothed coalbedo, by adaptive quadrature.
///
/// The range is split at $x_i$ so the erf transition always sits on an
/// interval boundary.
pub fn hn_smooth(degree: usize, xi: FloatValue, params: &ModelParameters) -> EBMResult<FloatValue> {
    check_ice_edge(xi)?;
    let norm = (2 * degree + 1) as FloatValue;
    let s2 = params.insolation_asymmetry;
    let integrand = |x: FloatValue| {
        norm * legendre_value(degree, x)
            * (1.0 + s2 * legendre_value(2, x))
            * CoalbedoModel::Smooth.evaluate(x, xi, params)
    };
    Ok(quadrature::integrate(integrand, 0.0, xi)? + quadrature::integrate(integrand, xi, 1.0)?)
}

/// $H_n(x_i)$ for the chosen coalbedo model.
pub fn hn(
    degree: usize,
    xi: FloatValue,
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<FloatValue> {
    match coalbedo {
        CoalbedoModel::Step => hn_step(degree, xi, params),
        CoalbedoModel::Smooth => hn_smooth(degree, xi, params),
    }
}

/// Eigenvalue term $L_n = n(n+1)D + B$.
pub fn ln(degree: usize, diffusivity: FloatValue, params: &ModelParameters) -> FloatValue {
    let n = degree as FloatValue;
    n * (n + 1.0) * diffusivity + params.olr_slope
}

/// Temperature coefficient $T_n$ ($^\circ\text{C}$).
pub fn tn(
    degree: usize,
    xi: FloatValue,
    forcing: FloatValue,
    diffusivity: FloatValue,
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<FloatValue> {
    let h = hn(degree, xi, coalbedo, params)?;
    Ok(temperature_coefficient(degree, h, forcing, diffusivity, params))
}

fn temperature_coefficient(
    degree: usize,
    h: FloatValue,
    forcing: FloatValue,
    diffusivity: FloatValue,
    params: &ModelParameters,
) -> FloatValue {
    let offset = if degree == 0 {
        params.olr_intercept / params.olr_slope
    } else {
        0.0
    };
    forcing * h / ln(degree, diffusivity, params) - offset
}

/// Forcing $Q$ ($\text{W/m}^2$) for which `xi` is an exact steady-state ice edge.
///
/// # Errors
///
/// [`EBMError::Domain`] when the series $\sum_n H_n P_n(x_i)/L_n$ vanishes
/// (no finite forcing holds the edge there) or is not finite.
pub fn forcing_at_ice_edge(
    xi: FloatValue,
    diffusivity: FloatValue,
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<FloatValue> {
    params.validate()?;
    let mut sum = 0.0;
    for degree in params.even_degrees() {
        let h = hn(degree, xi, coalbedo, params)?;
        sum += h * legendre_value(degree, xi) / ln(degree, diffusivity, params);
    }

    if !sum.is_finite() || sum.abs() < FloatValue::EPSILON {
        return Err(EBMError::Domain(format!(
            "no finite forcing sustains an ice edge at xi = {} (D = {})",
            xi, diffusivity
        )));
    }
    Ok((params.olr_intercept + params.olr_slope * params.ice_edge_temperature)
        / (params.olr_slope * sum))
}

/// Steady-state heat transport (W) across latitude circle `x`.
pub fn heat_transport(
    x: FloatValue,
    xi: FloatValue,
    forcing: FloatValue,
    diffusivity: FloatValue,
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<FloatValue> {
    Ok(SpectralSolution::new(xi, forcing, diffusivity, coalbedo, params)?.heat_transport(x))
}

/// Steady-state heat flux convergence ($\text{W/m}^2$) at `x`.
pub fn heat_flux_convergence(
    x: FloatValue,
    xi: FloatValue,
    forcing: FloatValue,
    diffusivity: FloatValue,
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<FloatValue> {
    Ok(SpectralSolution::new(xi, forcing, diffusivity, coalbedo, params)?.heat_flux_convergence(x))
}

/// One even-degree term of the expansion.
#[derive(Debug, Clone)]
pub struct SpectralTerm {
    pub degree: usize,
    pub hn: FloatValue,
    pub ln: FloatValue,
    pub tn: FloatValue,
    basis: Polynomial,
}

impl SpectralTerm {
    /// $P_n$ for this term.
    pub fn basis(&self) -> &Polynomial {
        &self.basis
    }
}

/// Legendre expansion of a steady temperature field.
///
/// Holds the coefficients for one `(xi, forcing, diffusivity, coalbedo)` so
/// that profiles and diagnostics can be evaluated at many points without
/// recomputing $H_n$.
#[derive(Debug, Clone)]
pub struct SpectralSolution {
    pub ice_edge: FloatValue,
    pub forcing: FloatValue,
    pub diffusivity: FloatValue,
    pub coalbedo: CoalbedoModel,
    terms: Vec<SpectralTerm>,
    planetary_radius: FloatValue,
}

impl SpectralSolution {
    pub fn new(
        xi: FloatValue,
        forcing: FloatValue,
        diffusivity: FloatValue,
        coalbedo: CoalbedoModel,
        params: &ModelParameters,
    ) -> EBMResult<Self> {
        params.validate()?;
        trace!(
            "Spectral solution for xi = {:.4}, Q = {:.3}, D = {:.3} ({} coalbedo)",
            xi,
            forcing,
            diffusivity,
            coalbedo.name()
        );
        let terms = params
            .even_degrees()
            .map(|degree| {
                let h = hn(degree, xi, coalbedo, params)?;
                Ok(SpectralTerm {
                    degree,
                    hn: h,
                    ln: ln(degree, diffusivity, params),
                    tn: temperature_coefficient(degree, h, forcing, diffusivity, params),
                    basis: legendre(degree),
                })
            })
            .collect::<EBMResult<Vec<_>>>()?;

        Ok(Self {
            ice_edge: xi,
            forcing,
            diffusivity,
            coalbedo,
            terms,
            planetary_radius: params.planetary_radius,
        })
    }

    /// The solution whose ice edge is exactly `xi`, with forcing from
    /// [`forcing_at_ice_edge`].
    pub fn at_ice_edge(
        xi: FloatValue,
        diffusivity: FloatValue,
        coalbedo: CoalbedoModel,
        params: &ModelParameters,
    ) -> EBMResult<Self> {
        let forcing = forcing_at_ice_edge(xi, diffusivity, coalbedo, params)?;
        Self::new(xi, forcing, diffusivity, coalbedo, params)
    }

    pub fn terms(&self) -> &[SpectralTerm] {
        &self.terms
    }

    /// $\sum_n T_n P_n^{(order)}(x)$.
    fn series(&self, x: FloatValue, order: usize) -> FloatValue {
        self.terms
            .iter()
            .map(|term| term.tn * term.basis.nth_derivative(order).evaluate(x))
            .sum()
    }

    /// Temperature ($^\circ\text{C}$) at `x`.
    pub fn temperature(&self, x: FloatValue) -> FloatValue {
        self.series(x, 0)
    }

    /// Zonally integrated poleward heat transport (W):
    /// $-2\pi R^2 D (1-x^2) \, dT/dx$.
    pub fn heat_transport(&self, x: FloatValue) -> FloatValue {
        -2.0 * PI * self.diffusivity * self.planetary_radius.powi(2)
            * (1.0 - x * x)
            * self.series(x, 1)
    }

    /// Heat flux convergence ($\text{W/m}^2$):
    /// $D\left[(1-x^2)\,T'' - 2x\,T'\right]$.
    pub fn heat_flux_convergence(&self, x: FloatValue) -> FloatValue {
        self.diffusivity * ((1.0 - x * x) * self.series(x, 2) - 2.0 * x * self.series(x, 1))
    }

    pub fn temperature_profile(&self, grid: &AnalyticGrid) -> Array1<FloatValue> {
        grid.points().mapv(|x| self.temperature(x))
    }

    pub fn heat_transport_profile(&self, grid: &AnalyticGrid) -> Array1<FloatValue> {
        grid.points().mapv(|x| self.heat_transport(x))
    }

    pub fn heat_flux_convergence_profile(&self, grid: &AnalyticGrid) -> Array1<FloatValue> {
        grid.points().mapv(|x| self.heat_flux_convergence(x))
    }
}
