//! Numeric utilities with no knowledge of the energy balance model.

pub mod curve;
pub mod interpolate;
pub mod linear_algebra;
pub mod polynomial;
pub mod quadrature;
