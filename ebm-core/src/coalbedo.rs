//! Coalbedo models
//!
//! The coalbedo $a(x, x_i)$ is the fraction of incident sunlight absorbed at
//! $x$ when the ice edge sits at $x_i$. Ice lies poleward of the edge, so
//! $x_i = 1$ is an ice-free planet and $x_i = 0$ a snowball.
//!
//! - [`CoalbedoModel::Step`]: $a = a_{ice}$ for $x \ge x_i$, else $a_{free}$.
//!   A point exactly on the edge counts as ice covered.
//! - [`CoalbedoModel::Smooth`]:
//!   $a = \tfrac{1}{2}(a_{ice} + a_{free}) + \tfrac{1}{2}(a_{ice} - a_{free})\,
//!   \mathrm{erf}\left((x - x_i)/\delta x\right)$, which tends to the step as
//!   $\delta x \to 0$.

use crate::parameters::ModelParameters;
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use statrs::function::erf::erf;

/// Shape of the coalbedo across the ice edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoalbedoModel {
    /// Discontinuous jump at the ice edge.
    Step,
    /// Error-function blend of width `smoothing_width`.
    Smooth,
}

impl CoalbedoModel {
    /// Coalbedo at `x` for an ice edge at `xi`.
    pub fn evaluate(&self, x: FloatValue, xi: FloatValue, params: &ModelParameters) -> FloatValue {
        match self {
            CoalbedoModel::Step => step_coalbedo(x, xi, params),
            CoalbedoModel::Smooth => smoothed_coalbedo(x, xi, params),
        }
    }

    /// Coalbedo at each of `xs`.
    pub fn evaluate_all(
        &self,
        xs: &[FloatValue],
        xi: FloatValue,
        params: &ModelParameters,
    ) -> Vec<FloatValue> {
        xs.iter().map(|&x| self.evaluate(x, xi, params)).collect()
    }

    /// Label used in log messages.
    pub fn name(&self) -> &'static str {
        match self {
            CoalbedoModel::Step => "step-function",
            CoalbedoModel::Smooth => "smoothed",
        }
    }
}

/// $a_{ice}$ poleward of (and on) the edge, $a_{free}$ equatorward.
pub fn step_coalbedo(x: FloatValue, xi: FloatValue, params: &ModelParameters) -> FloatValue {
    if x >= xi {
        params.coalbedo_ice
    } else {
        params.coalbedo_free
    }
}

/// Error-function blend between $a_{free}$ and $a_{ice}$ centred on the edge.
pub fn smoothed_coalbedo(x: FloatValue, xi: FloatValue, params: &ModelParameters) -> FloatValue {
    let midpoint = 0.5 * (params.coalbedo_ice + params.coalbedo_free);
    let half_span = 0.5 * (params.coalbedo_ice - params.coalbedo_free);
    midpoint + half_span * erf((x - xi) / params.smoothing_width)
}
