//! Mixture construction and lookup errors.

use mf_core::parse::ParseError;
use thiserror::Error;

/// Result type for mixture operations.
pub type MixtureResult<T> = Result<T, MixtureError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MixtureError {
    /// More than one species marked as balance species.
    #[error("Only one species may be marked as balance species, found {found}")]
    MultipleBalance { found: usize },

    /// Same species listed twice in one composition.
    #[error("Duplicate species in composition: {species}")]
    DuplicateSpecies { species: String },

    /// Composition with no entries.
    #[error("Empty composition")]
    EmptyComposition,

    /// Strict construction: explicit fractions do not sum to 1.
    #[error("Unbalanced composition: fractions sum to {total}, expected 1")]
    Unbalanced { total: f64 },

    /// Amount text was not a fraction (or the balance marker).
    #[error(transparent)]
    BadAmount(#[from] ParseError),

    /// Malformed `species=amount` pair in the text encoding.
    #[error("Malformed mixture entry '{entry}', expected 'species=amount'")]
    BadEntry { entry: String },

    /// Species missing from the conversion-factor table.
    #[error("No conversion factor tabulated for species '{symbol}'")]
    UnknownSpecies { symbol: String },

    /// Sources/weights length mismatch when composing.
    #[error("Number of sources ({sources}) and weights ({weights}) must match")]
    ComposeLengthMismatch { sources: usize, weights: usize },

    /// Non-finite fraction value.
    #[error("Non-finite fraction for species '{species}'")]
    NonFinite { species: String },
}
