//! mf-app: resolution runs against a loaded configuration.
//!
//! Glues the solver, the mixture model and the calibration layer together:
//! a target composition plus a total flow rate become per-line flow rates and,
//! for lines bound to a controller, device setpoints.

pub mod resolve;

pub use resolve::{Component, MixtureResult, resolve};

use mf_control::ControlError;
use mf_core::ParseError;
use mf_mixture::MixtureError;
use mf_project::ProjectError;
use mf_solver::SolverError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Mixture error: {0}")]
    Mixture(#[from] MixtureError),

    #[error("Calibration error: {0}")]
    Control(#[from] ControlError),

    #[error("Configuration error: {0}")]
    Project(#[from] ProjectError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}
