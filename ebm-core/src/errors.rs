use crate::FloatValue;
use thiserror::Error;

/// Errors raised while configuring or solving the energy balance model.
#[derive(Error, Debug)]
pub enum EBMError {
    /// A quantity is mathematically undefined for the requested inputs.
    #[error("Domain error: {0}")]
    Domain(String),
    /// The steady-state iteration hit its cap before meeting the tolerance.
    #[error("No steady state after {iterations} iterations (last max |dT| = {max_change:e}, tolerance not met)")]
    Convergence {
        iterations: usize,
        max_change: FloatValue,
        /// Temperature field after the final iteration.
        last_field: Vec<FloatValue>,
    },
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Could not read parameter file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse parameter file: {0}")]
    ParameterFile(#[from] toml::de::Error),
}

/// Convenience type for `Result<T, EBMError>`.
pub type EBMResult<T> = Result<T, EBMError>;
