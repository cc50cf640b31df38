//! Curves built from many spectral solutions.
//!
//! These produce the arrays handed to plotting: the stability curve
//! $Q(x_i)$, its dependence on diffusivity, and the heat flux convergence at
//! the ice edge.

use super::{forcing_at_ice_edge, SpectralSolution};
use ebm_core::coalbedo::CoalbedoModel;
use ebm_core::errors::{EBMError, EBMResult};
use ebm_core::parameters::ModelParameters;
use ebm_core::utils::curve::{split_into_branches, Branch};
use ebm_core::FloatValue;
use log::debug;
use serde::{Deserialize, Serialize};

pub const WATTS_PER_PETAWATT: FloatValue = 1e15;

/// Convert a heat transport from W to PW.
pub fn to_petawatts(watts: FloatValue) -> FloatValue {
    watts / WATTS_PER_PETAWATT
}

/// $Q(x_i)$ for each ice edge in `ice_edges`.
pub fn stability_curve(
    ice_edges: &[FloatValue],
    diffusivity: FloatValue,
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<Vec<FloatValue>> {
    debug!(
        "Stability curve over {} ice edges using {} coalbedo",
        ice_edges.len(),
        coalbedo.name()
    );
    ice_edges
        .iter()
        .map(|&xi| forcing_at_ice_edge(xi, diffusivity, coalbedo, params))
        .collect()
}

/// Stability curves for diffusivities `relative_diffusivity * D`.
///
/// One curve per entry, in the order given.
pub fn diffusivity_stability_curves(
    ice_edges: &[FloatValue],
    relative_diffusivity: &[FloatValue],
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<Vec<Vec<FloatValue>>> {
    relative_diffusivity
        .iter()
        .map(|factor| {
            debug!("Calculating with D/D0 = {:.2}", factor);
            let scaled = params.with_diffusivity(factor * params.diffusivity);
            stability_curve(ice_edges, scaled.diffusivity, coalbedo, &scaled)
        })
        .collect()
}

/// Stability curve split into its stable and unstable branches.
///
/// Each branch is a run over which $Q$ is monotonic in $x_i$; `x` holds the
/// ice edges and `y` the forcing.
pub fn stability_branches(
    ice_edges: &[FloatValue],
    diffusivity: FloatValue,
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<Vec<Branch>> {
    let forcing = stability_curve(ice_edges, diffusivity, coalbedo, params)?;
    split_into_branches(ice_edges, &forcing)
}

/// Heat flux convergence at the ice edge, $\mathrm{HFC}(x = x_i)$, for the
/// steady state of each ice edge in `ice_edges`.
pub fn ice_edge_heat_flux_convergence(
    ice_edges: &[FloatValue],
    diffusivity: FloatValue,
    coalbedo: CoalbedoModel,
    params: &ModelParameters,
) -> EBMResult<Vec<FloatValue>> {
    ice_edges
        .iter()
        .map(|&xi| {
            let solution = SpectralSolution::at_ice_edge(xi, diffusivity, coalbedo, params)?;
            Ok(solution.heat_flux_convergence(xi))
        })
        .collect()
}

/// Least-squares straight line $y = \text{slope}\,x + \text{intercept}$.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: FloatValue,
    pub intercept: FloatValue,
}

impl LinearFit {
    pub fn evaluate(&self, x: FloatValue) -> FloatValue {
        self.intercept + self.slope * x
    }
}

/// Ordinary least-squares line through `(x, y)`.
pub fn linear_fit(x: &[FloatValue], y: &[FloatValue]) -> EBMResult<LinearFit> {
    if x.len() != y.len() {
        return Err(EBMError::Domain(format!(
            "cannot fit samples of unequal length ({} and {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(EBMError::Domain(
            "a linear fit needs at least two points".to_string(),
        ));
    }

    let n = x.len() as FloatValue;
    let x_mean = x.iter().sum::<FloatValue>() / n;
    let y_mean = y.iter().sum::<FloatValue>() / n;
    let (sxy, sxx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (xk, yk)| {
            (sxy + (xk - x_mean) * (yk - y_mean), sxx + (xk - x_mean).powi(2))
        });
    if sxx == 0.0 {
        return Err(EBMError::Domain(
            "a linear fit needs at least two distinct x values".to_string(),
        ));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// [`linear_fit`] restricted to samples with `lower <= x <= upper`.
///
/// Typical limits for the ice-edge heat flux convergence are 0.20 and 0.85,
/// the range over which it is close to linear in $x_i$.
pub fn fit_between(
    x: &[FloatValue],
    y: &[FloatValue],
    lower: FloatValue,
    upper: FloatValue,
) -> EBMResult<LinearFit> {
    let (xs, ys): (Vec<FloatValue>, Vec<FloatValue>) = x
        .iter()
        .zip(y)
        .filter(|(&xk, _)| xk >= lower && xk <= upper)
        .map(|(&xk, &yk)| (xk, yk))
        .unzip();
    linear_fit(&xs, &ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ebm_core::grid::AnalyticGrid;
    use ebm_core::utils::curve::BranchDirection;

    fn ice_edges(step: FloatValue) -> Vec<FloatValue> {
        AnalyticGrid::with_spacing(step).unwrap().points().to_vec()
    }

    #[test]
    fn test_petawatts() {
        assert_eq!(to_petawatts(5.5e15), 5.5);
    }

    #[test]
    fn test_stability_curve_shape() {
        let params = ModelParameters::default();
        let xi = ice_edges(0.05);
        let q = stability_curve(&xi, params.diffusivity, CoalbedoModel::Step, &params).unwrap();

        assert_eq!(q.len(), xi.len());
        // Escaping a snowball takes more sunlight than anything else on the curve
        let snowball = q[0];
        assert!(q[1..].iter().all(|&v| v < snowball));
    }

    #[test]
    fn test_stability_branches() {
        let params = ModelParameters::default();
        let xi = ice_edges(0.01);
        let branches =
            stability_branches(&xi, params.diffusivity, CoalbedoModel::Step, &params).unwrap();

        // Large ice cap (unstable), finite ice cap (stable), small ice cap (unstable)
        assert_eq!(branches.len(), 3, "{:?}", branches.iter().map(|b| b.x.len()).collect::<Vec<_>>());
        assert_eq!(branches[0].direction, BranchDirection::Falling);
        assert_eq!(branches[1].direction, BranchDirection::Rising);
        assert_eq!(branches[2].direction, BranchDirection::Falling);

        let total: usize = branches.iter().map(|b| b.x.len()).sum();
        assert_eq!(total, xi.len());
    }

    #[test]
    fn test_more_diffusion_needs_more_forcing_at_high_edge() {
        let params = ModelParameters::default();
        let xi = vec![0.9];
        let curves =
            diffusivity_stability_curves(&xi, &[1.0, 1.5], CoalbedoModel::Step, &params).unwrap();

        assert_eq!(curves.len(), 2);
        // Stronger transport warms the pole, so holding the edge takes less sunlight
        assert!(curves[1][0] < curves[0][0]);
    }

    #[test]
    fn test_linear_fit_exact_line() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y: Vec<FloatValue> = x.iter().map(|v| 2.5 * v - 1.0).collect();
        let fit = linear_fit(&x, &y).unwrap();

        assert_abs_diff_eq!(fit.slope, 2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.evaluate(10.0), 24.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_fit_degenerate() {
        assert!(linear_fit(&[1.0], &[2.0]).is_err());
        assert!(linear_fit(&[1.0, 1.0], &[2.0, 3.0]).is_err());
        assert!(linear_fit(&[1.0, 2.0], &[2.0]).is_err());
    }

    #[test]
    fn test_fit_between_ignores_outside_points() {
        let x = vec![0.0, 0.2, 0.5, 0.85, 1.0];
        let y = vec![100.0, 0.2, 0.5, 0.85, -100.0];
        let fit = fit_between(&x, &y, 0.2, 0.85).unwrap();

        assert_abs_diff_eq!(fit.slope, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.intercept, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ice_edge_heat_flux_convergence() {
        let params = ModelParameters::default();
        let xi = ice_edges(0.1);
        let hfc = ice_edge_heat_flux_convergence(&xi, params.diffusivity, CoalbedoModel::Step, &params)
            .unwrap();
        assert_eq!(hfc.len(), xi.len());
        assert!(hfc.iter().all(|v| v.is_finite()));

        let fit = fit_between(&xi, &hfc, 0.20, 0.85).unwrap();
        assert!(fit.slope.is_finite());
    }
}
