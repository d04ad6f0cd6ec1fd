//! mf-mixture: balanced gas compositions and conversion factors.
//!
//! Provides:
//! - `AmountSpec`: tagged amount of one species (explicit fraction or balance wildcard)
//! - `Mixture`: immutable, ordered species -> amount mapping with balancing
//! - Conversion-factor reference table and mixture CF calculation
//! - Text encoding (`"CH4=3200ppm, O2=10%, N2=*"`) and serde encoding
//!
//! A mixture may mark at most one species as the *balance* species (written `"*"`),
//! whose fraction is derived as `1 - sum(others)` on demand. The type is a value:
//! construction validates, transformations return new instances.

pub mod amount;
pub mod cf;
pub mod error;
pub mod mixture;
mod serialize;

pub use amount::{AmountSpec, BALANCE_INDICATOR, Fraction};
pub use cf::{CfEntry, calculate_cf, cf_table};
pub use error::{MixtureError, MixtureResult};
pub use mixture::Mixture;
