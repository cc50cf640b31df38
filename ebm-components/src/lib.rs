//! Solvers for the classic latitudinal ice-albedo energy balance model
//!
//! Two independent routes to a steady state:
//!
//! - `analytics`: the Legendre-series solution of North et al. (1981), which
//!   also inverts an ice-edge position into the forcing that sustains it.
//! - `numerics`: time stepping of the diffusion equation until the field
//!   stops changing, driven by a `diffusion` stepper.
//!
//! `continuation` repeats the numerical solve over a sweep of forcings to
//! trace the hysteresis loop.

pub mod analytics;
pub mod continuation;
pub mod diffusion;
pub mod numerics;

pub use analytics::{SpectralSolution, SpectralTerm};
pub use continuation::{ContinuationDriver, Sweep};
pub use diffusion::{DiffusionStepper, ThetaScheme};
pub use numerics::{calculate_ice_edge, SolverPhase, SteadyState, SteadyStateRun, SteadyStateSolver};
