//! Continuation over the solar forcing.
//!
//! Sweeping $Q$ up and back down with warm starts traces the hysteresis loop
//! of the model: the same forcing can settle on a snowball, a finite ice cap
//! or an ice-free state depending on where the sweep came from.

use crate::diffusion::DiffusionStepper;
use crate::numerics::{SteadyState, SteadyStateSolver};
use ebm_core::errors::{EBMError, EBMResult};
use ebm_core::utils::curve::{split_into_branches, Branch};
use ebm_core::FloatValue;
use log::{info, warn};

/// Result of a sweep.
///
/// `forcing`, `ice_edge` and `states` are parallel and follow the order in
/// which the forcings were requested. If a solve failed the sweep stops
/// there; everything before it is kept and the failure is in `error`.
#[derive(Debug)]
pub struct Sweep {
    pub forcing: Vec<FloatValue>,
    pub ice_edge: Vec<FloatValue>,
    pub states: Vec<SteadyState>,
    pub error: Option<EBMError>,
}

impl Sweep {
    /// Whether every requested forcing was solved.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    pub fn len(&self) -> usize {
        self.forcing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forcing.is_empty()
    }

    /// Split the $(x_i, Q)$ curve into monotonic branches.
    pub fn branches(&self) -> EBMResult<Vec<Branch>> {
        split_into_branches(&self.ice_edge, &self.forcing)
    }

    /// The sweep, or the error that cut it short.
    pub fn into_result(self) -> EBMResult<Self> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

/// Runs a [`SteadyStateSolver`] over an ordered list of forcings.
#[derive(Debug, Clone)]
pub struct ContinuationDriver<'s, 'a, S> {
    solver: &'s SteadyStateSolver<'a, S>,
    warm_start: bool,
}

impl<'s, 'a, S: DiffusionStepper> ContinuationDriver<'s, 'a, S> {
    /// A driver that warm starts each solve from the previous steady state.
    pub fn new(solver: &'s SteadyStateSolver<'a, S>) -> Self {
        Self {
            solver,
            warm_start: true,
        }
    }

    /// Start every solve from the configured initial profile instead.
    pub fn cold_start(mut self) -> Self {
        self.warm_start = false;
        self
    }

    pub fn is_warm_start(&self) -> bool {
        self.warm_start
    }

    /// Solve for each forcing in turn, in the order given.
    pub fn sweep(&self, forcings: &[FloatValue]) -> Sweep {
        let mut sweep = Sweep {
            forcing: Vec::with_capacity(forcings.len()),
            ice_edge: Vec::with_capacity(forcings.len()),
            states: Vec::with_capacity(forcings.len()),
            error: None,
        };
        let mut field = self.solver.initial_field();

        for (j, &forcing) in forcings.iter().enumerate() {
            info!(
                "Calculating Q = {:.3} W/m^2 ({} of {})",
                forcing,
                j + 1,
                forcings.len()
            );
            if !forcing.is_finite() {
                sweep.error = Some(EBMError::Domain(format!(
                    "forcing must be finite, got {}",
                    forcing
                )));
            } else {
                let start = if self.warm_start {
                    field.clone()
                } else {
                    self.solver.initial_field()
                };
                match self.solver.solve_from(forcing, start) {
                    Ok(state) => {
                        field.clone_from(&state.temperature);
                        sweep.forcing.push(forcing);
                        sweep.ice_edge.push(state.ice_edge);
                        sweep.states.push(state);
                        continue;
                    }
                    Err(error) => sweep.error = Some(error),
                }
            }
            if let Some(error) = &sweep.error {
                warn!(
                    "Sweep stopped at Q = {} after {} of {} points: {}",
                    forcing,
                    j,
                    forcings.len(),
                    error
                );
            }
            break;
        }
        sweep
    }
}
