//! Error types for solver operations.

use mf_mixture::MixtureError;
use thiserror::Error;

/// Errors that can occur during supply decomposition.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("No sources provided")]
    NoSources,

    #[error("Mixture error: {0}")]
    Mixture(#[from] MixtureError),

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;
