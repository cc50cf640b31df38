//! Model Parameters
//!
//! Physical constants and numerical-scheme settings for the classic
//! ice-albedo energy balance model of North et al. (1981).
//!
//! Parameters are loaded once and passed by reference through every solver
//! call; nothing in the crate reads a shared default behind the caller's back.

use crate::coalbedo::CoalbedoModel;
use crate::errors::{EBMError, EBMResult};
use crate::FloatValue;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Physical constants of the energy balance model.
///
/// Temperatures are in $^\circ\text{C}$ and fluxes in $\text{W/m}^2$. Time is
/// measured in years, so the heat capacity carries units of
/// $\text{W yr m}^{-2}\,^\circ\text{C}^{-1}$.
///
/// # Default Values
///
/// Defaults are the standard case of North et al. (1981).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// OLR expansion constant term $A$ ($\text{W/m}^2$).
    /// Default: 203.3
    pub olr_intercept: FloatValue,

    /// OLR expansion linear term $B$ ($\text{W m}^{-2}\,^\circ\text{C}^{-1}$).
    /// Default: 2.09
    pub olr_slope: FloatValue,

    /// Solar constant divided by four, $Q_0$ ($\text{W/m}^2$).
    /// Default: 335.0
    pub solar_forcing: FloatValue,

    /// Large-scale diffusivity $D$ ($\text{W m}^{-2}\,^\circ\text{C}^{-1}$).
    /// Accounts for geometric factors.
    /// Default: 0.649
    pub diffusivity: FloatValue,

    /// Effective heat capacity $C$ ($\text{W yr m}^{-2}\,^\circ\text{C}^{-1}$).
    /// Default: 0.16 * 2.09
    pub heat_capacity: FloatValue,

    /// Coefficient $S_2$ of $P_2(x)$ in the insolation distribution.
    /// Negative: insolation falls off toward the pole.
    /// Default: -0.482
    pub insolation_asymmetry: FloatValue,

    /// Coalbedo of ice-covered regions.
    /// Default: 0.38
    pub coalbedo_ice: FloatValue,

    /// Coalbedo of ice-free regions.
    /// Default: 0.70
    pub coalbedo_free: FloatValue,

    /// Width of the erf transition of the smoothed coalbedo (in $x$).
    /// Default: 0.05
    pub smoothing_width: FloatValue,

    /// Temperature contour defining the ice edge ($^\circ\text{C}$).
    /// Default: -10.0
    pub ice_edge_temperature: FloatValue,

    /// Highest Legendre degree kept in the spectral expansion. Must be even.
    /// Default: 6
    pub truncation_degree: usize,

    /// Planetary radius (m).
    /// Default: 6371000.0
    pub planetary_radius: FloatValue,

    /// Settings of the time-stepping solver.
    pub numerics: NumericalParameters,
}

/// Settings of the numerical (time-stepping) steady-state solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericalParameters {
    /// Number of equal-width cells covering $x \in [0, 1]$.
    /// Default: 100
    pub n_cells: usize,

    /// Time step (yr).
    /// Default: 0.01
    pub time_step: FloatValue,

    /// Implicit/explicit blend factor: 0 explicit, 1 fully implicit.
    /// Default: 1.0
    pub theta: FloatValue,

    /// Largest per-step temperature change accepted as steady ($^\circ\text{C}$).
    /// Default: 1e-6
    pub tolerance: FloatValue,

    /// Iterations allowed before the solve is declared non-convergent.
    /// Default: 100000
    pub max_iterations: usize,

    /// Equatorial temperature of the initial profile ($^\circ\text{C}$).
    /// Default: 30.0
    pub initial_equator_temperature: FloatValue,

    /// Ice-edge position of the initial profile.
    /// Default: 0.95
    pub initial_ice_edge: FloatValue,

    /// Coalbedo model used while time stepping.
    /// Default: smooth
    pub coalbedo: CoalbedoModel,
}

impl Default for ModelParameters {
    fn default() -> Self {
        let olr_slope = 2.09;
        Self {
            olr_intercept: 203.3,
            olr_slope,
            solar_forcing: 335.0,
            diffusivity: 0.649,
            heat_capacity: 0.16 * olr_slope,
            insolation_asymmetry: -0.482,
            coalbedo_ice: 0.38,
            coalbedo_free: 0.70,
            smoothing_width: 0.05,
            ice_edge_temperature: -10.0,
            truncation_degree: 6,
            planetary_radius: 6371000.0,
            numerics: NumericalParameters::default(),
        }
    }
}

impl Default for NumericalParameters {
    fn default() -> Self {
        Self {
            n_cells: 100,
            time_step: 0.01,
            theta: 1.0,
            tolerance: 1e-6,
            max_iterations: 100_000,
            initial_equator_temperature: 30.0,
            initial_ice_edge: 0.95,
            coalbedo: CoalbedoModel::Smooth,
        }
    }
}

impl ModelParameters {
    /// Parse parameters from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> EBMResult<Self> {
        let parameters: Self = toml::from_str(source)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Read and parse a TOML parameter file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EBMResult<Self> {
        debug!("Reading parameters from {}", path.as_ref().display());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Check the invariants the solvers rely on.
    pub fn validate(&self) -> EBMResult<()> {
        if self.truncation_degree % 2 != 0 {
            return Err(EBMError::Configuration(format!(
                "truncation degree must be a non-negative even integer, got {}",
                self.truncation_degree
            )));
        }
        require_positive("olr_intercept", self.olr_intercept)?;
        require_positive("olr_slope", self.olr_slope)?;
        require_positive("solar_forcing", self.solar_forcing)?;
        require_positive("coalbedo_ice", self.coalbedo_ice)?;
        require_positive("coalbedo_free", self.coalbedo_free)?;
        require_positive("heat_capacity", self.heat_capacity)?;
        require_positive("smoothing_width", self.smoothing_width)?;
        require_positive("planetary_radius", self.planetary_radius)?;
        if !(self.diffusivity >= 0.0) {
            return Err(EBMError::Configuration(format!(
                "diffusivity must be non-negative, got {}",
                self.diffusivity
            )));
        }
        self.numerics.validate()
    }

    /// Even Legendre degrees kept in the expansion: $0, 2, \ldots, n_{max}$.
    pub fn even_degrees(&self) -> impl Iterator<Item = usize> {
        (0..=self.truncation_degree).step_by(2)
    }

    /// Copy of these parameters with a different diffusivity.
    pub fn with_diffusivity(&self, diffusivity: FloatValue) -> Self {
        Self {
            diffusivity,
            ..self.clone()
        }
    }

    /// Copy of these parameters with a different truncation degree.
    pub fn with_truncation_degree(&self, truncation_degree: usize) -> Self {
        Self {
            truncation_degree,
            ..self.clone()
        }
    }

    /// Relaxation time $C/B$ of a single column (yr).
    pub fn radiative_timescale(&self) -> FloatValue {
        self.heat_capacity / self.olr_slope
    }
}

impl NumericalParameters {
    pub fn validate(&self) -> EBMResult<()> {
        if self.n_cells < 1 {
            return Err(EBMError::Configuration(
                "grid resolution must be at least one cell".to_string(),
            ));
        }
        require_positive("tolerance", self.tolerance)?;
        require_positive("time_step", self.time_step)?;
        if !(0.0..=1.0).contains(&self.theta) {
            return Err(EBMError::Configuration(format!(
                "blend factor theta must lie in [0, 1], got {}",
                self.theta
            )));
        }
        if self.max_iterations < 1 {
            return Err(EBMError::Configuration(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.initial_ice_edge > 0.0 && self.initial_ice_edge <= 1.0) {
            return Err(EBMError::Configuration(format!(
                "initial ice edge must lie in (0, 1], got {}",
                self.initial_ice_edge
            )));
        }
        Ok(())
    }
}

fn require_positive(name: &str, value: FloatValue) -> EBMResult<()> {
    // Written so that NaN is rejected too
    if value > 0.0 {
        Ok(())
    } else {
        Err(EBMError::Configuration(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}
