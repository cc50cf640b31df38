//! Hysteresis of the numerical model under a forcing round trip.
//!
//! Sweeping up from a cold climate stays frozen until the snowball becomes
//! unstable; sweeping back down stays ice free well below that forcing.

use ebm_components::continuation::ContinuationDriver;
use ebm_components::numerics::SteadyStateSolver;
use ebm_core::utils::curve::split_by_gradient;
use ebm_core::ModelParameters;

const ROUND_TRIP: [f64; 7] = [0.9, 1.0, 1.1, 1.4, 1.1, 1.0, 0.9];

fn round_trip(params: &ModelParameters) -> Vec<f64> {
    ROUND_TRIP.iter().map(|f| f * params.solar_forcing).collect()
}

#[test]
fn test_round_trip_is_bistable() {
    let params = ModelParameters::default();
    let solver = SteadyStateSolver::new(&params).unwrap();
    let forcings = round_trip(&params);

    let sweep = ContinuationDriver::new(&solver)
        .sweep(&forcings)
        .into_result()
        .unwrap();

    assert_eq!(sweep.forcing, forcings);
    // Snowball on the way up
    assert_eq!(sweep.ice_edge[0], 0.0);
    assert_eq!(sweep.ice_edge[1], 0.0);
    // Ice free at the top and on the way back down
    assert_eq!(sweep.ice_edge[3], 1.0);
    assert_eq!(sweep.ice_edge[5], 1.0);
    // The same forcing, two climates
    assert_ne!(sweep.ice_edge[1], sweep.ice_edge[5]);
}

#[test]
fn test_round_trip_is_reproducible() {
    let params = ModelParameters::default();
    let solver = SteadyStateSolver::new(&params).unwrap();
    let forcings = round_trip(&params);
    let driver = ContinuationDriver::new(&solver);

    let first = driver.sweep(&forcings);
    let second = driver.sweep(&forcings);

    assert!(first.is_complete());
    assert_eq!(first.ice_edge, second.ice_edge);
    assert_eq!(first.states, second.states);
}

#[test]
fn test_round_trip_branches() {
    let params = ModelParameters::default();
    let solver = SteadyStateSolver::new(&params).unwrap();
    let forcings = round_trip(&params);

    let sweep = ContinuationDriver::new(&solver).sweep(&forcings);
    let branches = sweep.branches().unwrap();

    // Up then down
    assert_eq!(branches.len(), 2);
    let (xs, ys) = split_by_gradient(&sweep.ice_edge, &sweep.forcing).unwrap();
    assert_eq!(ys[0], forcings[..4].to_vec());
    assert_eq!(ys[1], forcings[4..].to_vec());
    assert_eq!(xs[0], sweep.ice_edge[..4].to_vec());
}

#[test]
fn test_cold_start_forgets_history() {
    let params = ModelParameters::default();
    let solver = SteadyStateSolver::new(&params).unwrap();
    let forcings = round_trip(&params);

    let sweep = ContinuationDriver::new(&solver).cold_start().sweep(&forcings);

    assert!(sweep.is_complete());
    // Each occurrence of a forcing starts from the same profile
    assert_eq!(sweep.states[1], sweep.states[5]);
    assert_eq!(sweep.states[2], sweep.states[4]);
    assert_eq!(sweep.states[0], sweep.states[6]);
}
