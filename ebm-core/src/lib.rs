//! Core types for the classic latitudinal ice-albedo energy balance model (EBM).
//!
//! This crate holds everything the solvers share but which carries no solver
//! logic of its own: the error type, the [`ModelParameters`] bundle, the spatial
//! grids, the coalbedo models and a handful of numeric utilities.

pub mod coalbedo;
pub mod errors;
pub mod grid;
pub mod parameters;
pub mod utils;

/// Floating point type used throughout the model.
pub type FloatValue = f64;

pub use coalbedo::CoalbedoModel;
pub use errors::{EBMError, EBMResult};
pub use grid::{AnalyticGrid, CellGrid};
pub use parameters::{ModelParameters, NumericalParameters};
