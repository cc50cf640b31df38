//! Agreement between the spectral and time-stepping solutions.
//!
//! The spectral solution gives the forcing that holds the ice edge at a
//! chosen position. Time stepping at that forcing must settle with its ice
//! edge close to the chosen one, and feeding that edge back through the
//! spectral inversion must recover the forcing.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use ebm_components::analytics::{forcing_at_ice_edge, SpectralSolution};
use ebm_components::numerics::SteadyStateSolver;
use ebm_core::{CoalbedoModel, ModelParameters};

fn parameters(truncation_degree: usize, initial_ice_edge: f64) -> ModelParameters {
    let mut params = ModelParameters::default().with_truncation_degree(truncation_degree);
    params.numerics.initial_ice_edge = initial_ice_edge;
    params.numerics.coalbedo = CoalbedoModel::Smooth;
    params
}

mod analytic_to_numeric {
    use super::*;

    /// Converge at the forcing that sustains xi = 0.8 and recover it.
    #[test]
    fn test_ice_edge_recovered() {
        let params = parameters(20, 0.8);
        let xi = 0.8;
        let forcing =
            forcing_at_ice_edge(xi, params.diffusivity, CoalbedoModel::Smooth, &params).unwrap();

        let solver = SteadyStateSolver::new(&params).unwrap();
        let state = solver.solve(forcing).unwrap();

        assert_abs_diff_eq!(state.ice_edge, xi, epsilon = 0.01);

        let recovered =
            forcing_at_ice_edge(state.ice_edge, params.diffusivity, CoalbedoModel::Smooth, &params)
                .unwrap();
        assert_relative_eq!(recovered, forcing, max_relative = 1e-3);
    }

    /// The default truncation is already close enough for the round trip.
    #[test]
    fn test_low_truncation() {
        let params = parameters(6, 0.8);
        let forcing =
            forcing_at_ice_edge(0.8, params.diffusivity, CoalbedoModel::Smooth, &params).unwrap();

        let state = SteadyStateSolver::new(&params).unwrap().solve(forcing).unwrap();
        let recovered =
            forcing_at_ice_edge(state.ice_edge, params.diffusivity, CoalbedoModel::Smooth, &params)
                .unwrap();

        assert_abs_diff_eq!(state.ice_edge, 0.8, epsilon = 0.01);
        assert_relative_eq!(recovered, forcing, max_relative = 1e-3);
    }
}

mod other_diffusivity {
    use super::*;

    /// Weaker transport, same round trip.
    #[test]
    fn test_reduced_diffusivity() {
        let params = parameters(20, 0.8);
        let diffusivity = 0.7 * params.diffusivity;
        let forcing =
            forcing_at_ice_edge(0.8, diffusivity, CoalbedoModel::Smooth, &params).unwrap();

        let solver = SteadyStateSolver::new(&params).unwrap().diffusivity(diffusivity);
        let state = solver.solve(forcing).unwrap();

        assert_abs_diff_eq!(state.ice_edge, 0.8, epsilon = 0.01);
        let recovered =
            forcing_at_ice_edge(state.ice_edge, diffusivity, CoalbedoModel::Smooth, &params).unwrap();
        assert_relative_eq!(recovered, forcing, max_relative = 1e-3);
    }

    /// Scaling the parameters and overriding the solver agree exactly.
    #[test]
    fn test_builder_matches_scaled_parameters() {
        let params = parameters(6, 0.8);
        let scaled = params.with_diffusivity(0.7 * params.diffusivity);
        let forcing = 0.95 * params.solar_forcing;

        let overridden = SteadyStateSolver::new(&params)
            .unwrap()
            .diffusivity(scaled.diffusivity)
            .solve(forcing)
            .unwrap();
        let direct = SteadyStateSolver::new(&scaled).unwrap().solve(forcing).unwrap();

        assert_eq!(overridden, direct);
    }
}

mod step_coalbedo {
    use super::*;

    /// Stable branch with the discontinuous coalbedo on a fine grid.
    #[test]
    fn test_stable_branch_recovered() {
        let mut params = parameters(6, 0.85);
        params.numerics.coalbedo = CoalbedoModel::Step;
        params.numerics.n_cells = 400;
        let xi = 0.85;
        let forcing =
            forcing_at_ice_edge(xi, params.diffusivity, CoalbedoModel::Step, &params).unwrap();

        let state = SteadyStateSolver::new(&params).unwrap().solve(forcing).unwrap();

        assert_abs_diff_eq!(state.ice_edge, xi, epsilon = 0.01);
        let recovered =
            forcing_at_ice_edge(state.ice_edge, params.diffusivity, CoalbedoModel::Step, &params)
                .unwrap();
        assert_relative_eq!(recovered, forcing, max_relative = 2e-3);
    }
}

mod profiles {
    use super::*;

    /// The converged field follows the spectral temperature profile.
    #[test]
    fn test_temperature_profile_matches() {
        let params = parameters(20, 0.8);
        let forcing =
            forcing_at_ice_edge(0.8, params.diffusivity, CoalbedoModel::Smooth, &params).unwrap();
        let state = SteadyStateSolver::new(&params).unwrap().solve(forcing).unwrap();

        let spectral = SpectralSolution::new(
            state.ice_edge,
            forcing,
            params.diffusivity,
            CoalbedoModel::Smooth,
            &params,
        )
        .unwrap();

        for (&x, &t) in state.x.iter().zip(&state.temperature) {
            assert_abs_diff_eq!(t, spectral.temperature(x), epsilon = 0.05);
        }
    }

    /// No heat crosses the equator in a steady state.
    #[test]
    fn test_no_transport_across_equator() {
        let params = ModelParameters::default();
        for xi in [0.3, 0.6, 0.9] {
            let solution =
                SpectralSolution::at_ice_edge(xi, params.diffusivity, CoalbedoModel::Step, &params)
                    .unwrap();
            assert_eq!(solution.heat_transport(0.0), 0.0);
        }
    }
}
