//! Steady states of the classic latitudinal ice-albedo energy balance model.
//!
//! Re-exports [`ebm_core`] (parameters, grids, coalbedo models, errors) and
//! [`ebm_components`] (spectral and numerical solvers, continuation).

pub use ebm_components;
pub use ebm_core;

/// The types most programs need.
pub mod prelude {
    pub use ebm_components::analytics::{forcing_at_ice_edge, stability_curve};
    pub use ebm_components::{
        ContinuationDriver, SpectralSolution, SteadyState, SteadyStateSolver, Sweep,
    };
    pub use ebm_core::{
        AnalyticGrid, CellGrid, CoalbedoModel, EBMError, EBMResult, FloatValue, ModelParameters,
        NumericalParameters,
    };
}
