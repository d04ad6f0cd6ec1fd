//! Thermal mass-flow conversion factors.
//!
//! MFCs calibrated on a reference gas (N2) read differently for other gases;
//! the conversion factor (CF) is the scalar relating the two at the reference
//! point of 273 K and 1 bar. For mixtures the factors combine like a
//! mole-fraction-weighted harmonic mean, which is what `calculate_cf` computes.

use crate::error::{MixtureError, MixtureResult};
use crate::mixture::Mixture;

/// One row of the conversion-factor reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfEntry {
    pub name: &'static str,
    pub symbol: &'static str,
    /// Reference gas density at 273 K / 1 bar [g/L].
    pub density: f64,
    /// Conversion factor at 273 K / 1 bar, relative to N2.
    pub cf: f64,
}

// Reference values relative to nitrogen at 273 K / 1 bar.
const CF_TABLE: [CfEntry; 20] = [
    CfEntry { name: "Air", symbol: "Air", density: 1.293, cf: 1.000 },
    CfEntry { name: "Argon", symbol: "Ar", density: 1.782, cf: 1.395 },
    CfEntry { name: "Ammonia", symbol: "NH3", density: 0.769, cf: 0.730 },
    CfEntry { name: "Carbon dioxide", symbol: "CO2", density: 1.964, cf: 0.740 },
    CfEntry { name: "Carbon monoxide", symbol: "CO", density: 1.250, cf: 1.000 },
    CfEntry { name: "Ethane", symbol: "C2H6", density: 1.342, cf: 0.500 },
    CfEntry { name: "Ethylene", symbol: "C2H4", density: 1.251, cf: 0.600 },
    CfEntry { name: "Helium", symbol: "He", density: 0.179, cf: 1.454 },
    CfEntry { name: "Hydrogen", symbol: "H2", density: 0.090, cf: 1.010 },
    CfEntry { name: "Krypton", symbol: "Kr", density: 3.739, cf: 1.453 },
    CfEntry { name: "Methane", symbol: "CH4", density: 0.716, cf: 0.719 },
    CfEntry { name: "Neon", symbol: "Ne", density: 0.900, cf: 1.460 },
    CfEntry { name: "Nitric oxide", symbol: "NO", density: 1.339, cf: 0.990 },
    CfEntry { name: "Nitrogen", symbol: "N2", density: 1.250, cf: 1.000 },
    CfEntry { name: "Nitrogen dioxide", symbol: "NO2", density: 2.052, cf: 0.737 },
    CfEntry { name: "Nitrous oxide", symbol: "N2O", density: 1.964, cf: 0.710 },
    CfEntry { name: "Oxygen", symbol: "O2", density: 1.428, cf: 0.988 },
    CfEntry { name: "Propane", symbol: "C3H8", density: 1.967, cf: 0.360 },
    CfEntry { name: "Sulfur dioxide", symbol: "SO2", density: 2.926, cf: 0.690 },
    CfEntry { name: "Xenon", symbol: "Xe", density: 5.858, cf: 1.440 },
];

/// The built-in reference table (read-only, process lifetime).
pub fn cf_table() -> &'static [CfEntry] {
    &CF_TABLE
}

/// Look up one species in a table by symbol (case-sensitive).
pub fn find_cf(table: &[CfEntry], symbol: &str) -> MixtureResult<f64> {
    table
        .iter()
        .find(|entry| entry.symbol == symbol)
        .map(|entry| entry.cf)
        .ok_or_else(|| MixtureError::UnknownSpecies {
            symbol: symbol.to_string(),
        })
}

/// Conversion factor of a mixture against a reference table.
///
/// With balanced mole fractions `x_i` and tabulated factors `CF_i`:
/// `CF = sum(x_i) / sum(x_i / CF_i)`. A species missing from the table is an
/// error; defaulting silently would misrepresent the physical response.
pub fn calculate_cf(mixture: &Mixture, table: &[CfEntry]) -> MixtureResult<f64> {
    let fractions = mixture.mole_fractions();
    if fractions.is_empty() {
        return Err(MixtureError::EmptyComposition);
    }

    let mut total = 0.0;
    let mut denom = 0.0;
    for (species, fraction) in &fractions {
        total += fraction;
        denom += fraction / find_cf(table, species)?;
    }

    Ok(total / denom)
}
