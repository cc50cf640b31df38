//! Numerical Steady-State Solver
//!
//! Time-steps the EBM on a [`CellGrid`] until the temperature field stops
//! changing, tracking the ice edge after every step.
//!
//! Each step:
//!
//! 1. evaluates the net radiative imbalance
//!    $Q\,(1 + S_2 P_2(x))\,a(x, x_i) - A - B\,T$ with the ice edge $x_i$ of
//!    the current field,
//! 2. hands it (divided by $C$) to a [`DiffusionStepper`] together with the
//!    pseudo-diffusivity $(1-x^2)D/C$; the same tendency is used for the
//!    explicit and implicit halves, so the ice edge is frozen within a step,
//! 3. recomputes the ice edge from the new field,
//! 4. declares a steady state once $\max_j |T^{n+1}_j - T^n_j|$ is within the
//!    configured tolerance.
//!
//! A run that needs more than `max_iterations` steps fails with
//! [`EBMError::Convergence`].

use crate::diffusion::{DiffusionStepper, ThetaScheme};
use ebm_core::errors::{EBMError, EBMResult};
use ebm_core::grid::CellGrid;
use ebm_core::parameters::ModelParameters;
use ebm_core::utils::interpolate::lin_int;
use ebm_core::utils::polynomial::legendre_value;
use ebm_core::FloatValue;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Iterations between progress messages.
const TRACE_INTERVAL: usize = 1000;

/// Ice edge implied by a temperature profile.
///
/// - every sample warmer than `threshold`: `1.0` (ice free),
/// - no sample warmer than `threshold`: `0.0` (ice covered),
/// - otherwise the threshold crossing, linearly interpolated between the
///   first adjacent pair (scanning poleward from the equator) that straddles
///   it. Later crossings of a non-monotonic profile are ignored.
pub fn calculate_ice_edge(x: &[FloatValue], temperature: &[FloatValue], threshold: FloatValue) -> FloatValue {
    let above: Vec<bool> = temperature.iter().map(|&t| t > threshold).collect();
    if above.iter().all(|&a| a) {
        return 1.0;
    }
    if !above.iter().any(|&a| a) {
        return 0.0;
    }
    let j = above
        .windows(2)
        .position(|w| w[0] != w[1])
        .unwrap_or_default();
    lin_int(threshold, temperature[j], x[j], temperature[j + 1], x[j + 1])
}

/// Starting profile $T_{eq}\,(1 - u^2) + T_{ice}\,u$ with $u = x / x_{i,0}$.
///
/// Equal to the configured equatorial temperature at $x = 0$ and to the
/// ice-edge temperature at the configured initial edge.
pub fn initial_conditions(x: &[FloatValue], params: &ModelParameters) -> Vec<FloatValue> {
    let t_equator = params.numerics.initial_equator_temperature;
    let xi_0 = params.numerics.initial_ice_edge;
    x.iter()
        .map(|&xj| {
            let u = xj / xi_0;
            t_equator * (1.0 - u * u) + params.ice_edge_temperature * u
        })
        .collect()
}

/// Absorbed minus emitted radiation ($\text{W/m}^2$) at each point.
pub fn net_radiative_imbalance(
    x: &[FloatValue],
    temperature: &[FloatValue],
    xi: FloatValue,
    forcing: FloatValue,
    params: &ModelParameters,
) -> Vec<FloatValue> {
    let coalbedo = params.numerics.coalbedo;
    x.iter()
        .zip(temperature)
        .map(|(&xj, &t)| {
            forcing
                * (1.0 + params.insolation_asymmetry * legendre_value(2, xj))
                * coalbedo.evaluate(xj, xi, params)
                - params.olr_intercept
                - params.olr_slope * t
        })
        .collect()
}

/// $(1 - x^2) D / C$.
pub fn pseudo_diffusivity(x: FloatValue, diffusivity: FloatValue, heat_capacity: FloatValue) -> FloatValue {
    (1.0 - x * x) * diffusivity / heat_capacity
}

/// Where a [`SteadyStateRun`] is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverPhase {
    Initializing,
    Iterating,
    Converged,
}

/// A converged temperature field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteadyState {
    /// Forcing $Q$ ($\text{W/m}^2$).
    pub forcing: FloatValue,
    pub ice_edge: FloatValue,
    /// Cell centres.
    pub x: Vec<FloatValue>,
    /// Temperature in each cell ($^\circ\text{C}$).
    pub temperature: Vec<FloatValue>,
    /// Steps taken to converge.
    pub iterations: usize,
}

/// Time-stepping steady-state solver for one parameter set.
#[derive(Debug, Clone)]
pub struct SteadyStateSolver<'a, S = ThetaScheme> {
    params: &'a ModelParameters,
    grid: CellGrid,
    stepper: S,
    diffusivity: FloatValue,
}

impl<'a> SteadyStateSolver<'a, ThetaScheme> {
    /// Solver using the [`ThetaScheme`] on a grid of `params.numerics.n_cells`.
    pub fn new(params: &'a ModelParameters) -> EBMResult<Self> {
        params.validate()?;
        let grid = CellGrid::new(params.numerics.n_cells)?;
        let stepper = ThetaScheme::new(grid.clone());
        Ok(Self::with_stepper(params, grid, stepper))
    }
}

impl<'a, S: DiffusionStepper> SteadyStateSolver<'a, S> {
    /// Solver using a custom stepper; `stepper` must work on `grid`.
    pub fn with_stepper(params: &'a ModelParameters, grid: CellGrid, stepper: S) -> Self {
        Self {
            params,
            grid,
            stepper,
            diffusivity: params.diffusivity,
        }
    }

    /// Use `diffusivity` instead of the parameter value.
    pub fn diffusivity(mut self, diffusivity: FloatValue) -> Self {
        self.diffusivity = diffusivity;
        self
    }

    pub fn params(&self) -> &ModelParameters {
        self.params
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// The configured starting profile on this grid.
    pub fn initial_field(&self) -> Vec<FloatValue> {
        initial_conditions(self.grid.centres(), self.params)
    }

    /// Ice edge of a field on this grid.
    pub fn ice_edge(&self, field: &[FloatValue]) -> FloatValue {
        calculate_ice_edge(self.grid.centres(), field, self.params.ice_edge_temperature)
    }

    /// Steady state for `forcing`, starting from the configured initial profile.
    pub fn solve(&self, forcing: FloatValue) -> EBMResult<SteadyState> {
        self.solve_from(forcing, self.initial_field())
    }

    /// Steady state for `forcing`, starting from `initial_field`.
    pub fn solve_from(&self, forcing: FloatValue, initial_field: Vec<FloatValue>) -> EBMResult<SteadyState> {
        let mut run = self.start(forcing, initial_field)?;
        while run.advance()? != SolverPhase::Converged {}
        run.into_steady_state()
    }

    /// A run positioned before its first step, for callers that want to
    /// drive the iteration themselves.
    pub fn start(&self, forcing: FloatValue, initial_field: Vec<FloatValue>) -> EBMResult<SteadyStateRun<'_, 'a, S>> {
        self.params.validate()?;
        if initial_field.len() != self.grid.n_cells() {
            return Err(EBMError::Configuration(format!(
                "initial field has {} values but the grid has {} cells",
                initial_field.len(),
                self.grid.n_cells()
            )));
        }
        debug!(
            "Solving for Q = {:.3} W/m^2 ({:.3} Q0) on {} cells, relaxation time {:.3} yr",
            forcing,
            forcing / self.params.solar_forcing,
            self.grid.n_cells(),
            self.params.radiative_timescale()
        );
        Ok(SteadyStateRun {
            solver: self,
            forcing,
            ice_edge: 0.0,
            field: initial_field,
            iterations: 0,
            last_change: FloatValue::INFINITY,
            phase: SolverPhase::Initializing,
        })
    }
}

/// Iteration state of a single steady-state solve.
#[derive(Debug)]
pub struct SteadyStateRun<'s, 'a, S> {
    solver: &'s SteadyStateSolver<'a, S>,
    forcing: FloatValue,
    ice_edge: FloatValue,
    field: Vec<FloatValue>,
    iterations: usize,
    last_change: FloatValue,
    phase: SolverPhase,
}

impl<'s, 'a, S: DiffusionStepper> SteadyStateRun<'s, 'a, S> {
    pub fn phase(&self) -> SolverPhase {
        self.phase
    }

    pub fn ice_edge(&self) -> FloatValue {
        self.ice_edge
    }

    pub fn field(&self) -> &[FloatValue] {
        &self.field
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Largest absolute temperature change of the latest step.
    pub fn last_change(&self) -> FloatValue {
        self.last_change
    }

    /// Move one transition forward and return the new phase.
    ///
    /// From `Initializing` this only computes the ice edge of the starting
    /// field. From `Iterating` it takes one time step. `Converged` is
    /// terminal and left unchanged.
    pub fn advance(&mut self) -> EBMResult<SolverPhase> {
        match self.phase {
            SolverPhase::Initializing => {
                self.ice_edge = self.solver.ice_edge(&self.field);
                self.phase = SolverPhase::Iterating;
            }
            SolverPhase::Iterating => self.iterate()?,
            SolverPhase::Converged => {}
        }
        Ok(self.phase)
    }

    fn iterate(&mut self) -> EBMResult<()> {
        let solver = self.solver;
        let params = solver.params;
        let numerics = &params.numerics;
        if self.iterations >= numerics.max_iterations {
            return Err(EBMError::Convergence {
                iterations: self.iterations,
                max_change: self.last_change,
                last_field: self.field.clone(),
            });
        }

        let x = solver.grid.centres();
        let tendency: Vec<FloatValue> =
            net_radiative_imbalance(x, &self.field, self.ice_edge, self.forcing, params)
                .into_iter()
                .map(|imbalance| imbalance / params.heat_capacity)
                .collect();
        let diffusivity = solver.diffusivity;
        let heat_capacity = params.heat_capacity;
        let pseudo = move |xj: FloatValue| pseudo_diffusivity(xj, diffusivity, heat_capacity);

        let next = solver.stepper.step(
            &self.field,
            &tendency,
            &tendency,
            &pseudo,
            numerics.time_step,
            numerics.theta,
        )?;
        self.iterations += 1;

        let max_change = next
            .iter()
            .zip(&self.field)
            .map(|(new, old)| (new - old).abs())
            .fold(0.0, FloatValue::max);
        if next.iter().any(|t| !t.is_finite()) || !max_change.is_finite() {
            return Err(EBMError::Domain(format!(
                "temperature field diverged after {} iterations (Q = {})",
                self.iterations, self.forcing
            )));
        }

        self.ice_edge = solver.ice_edge(&next);
        self.field = next;
        self.last_change = max_change;

        if self.iterations % TRACE_INTERVAL == 0 {
            trace!(
                "Iteration {}: max |dT| = {:e}, ice edge = {:.4}",
                self.iterations,
                max_change,
                self.ice_edge
            );
        }
        if max_change <= numerics.tolerance {
            debug!(
                "Converged after {} iterations, ice edge = {:.4}",
                self.iterations, self.ice_edge
            );
            self.phase = SolverPhase::Converged;
        }
        Ok(())
    }

    /// The converged state; fails unless the run has converged.
    pub fn into_steady_state(self) -> EBMResult<SteadyState> {
        if self.phase != SolverPhase::Converged {
            return Err(EBMError::Convergence {
                iterations: self.iterations,
                max_change: self.last_change,
                last_field: self.field,
            });
        }
        Ok(SteadyState {
            forcing: self.forcing,
            ice_edge: self.ice_edge,
            x: self.solver.grid.centres().to_vec(),
            temperature: self.field,
            iterations: self.iterations,
        })
    }
}
