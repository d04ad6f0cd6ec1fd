//! mf-solver: supply decomposition for target gas mixtures.
//!
//! Given the compositions of the available supply gases and a desired target
//! mixture, computes the non-negative fraction of total flow each supply must
//! contribute. The solve is a two-phase non-negative least squares (NNLS)
//! decomposition: phase 1 fits the explicitly requested species, phase 2
//! re-fits against the self-consistently balanced intermediate mixture over the
//! full species union (the balance species' true fraction is unknown until the
//! other proportions are fixed).
//!
//! Inconsistent results (weights not summing to 1) are warnings, not errors:
//! the caller decides whether an unachievable target is acceptable.

pub mod error;
pub mod nnls;
pub mod supply;

pub use error::{SolverError, SolverResult};
pub use nnls::{NnlsConfig, nnls};
pub use supply::{PROPORTION_SUM_TOLERANCE, supply_proportions_for_mixture};
