//! Tagged amount of one species in a composition.

use crate::error::{MixtureError, MixtureResult};
use mf_core::parse::{FractionUnit, parse_fraction};
use std::fmt;

/// Text marker for the balance species in compositions ("the rest").
pub const BALANCE_INDICATOR: &str = "*";

/// A dimensionless fraction that remembers the unit it was written in.
///
/// `21%` and `0.21` are the same value but round-trip differently through the
/// text and serde encodings, so magnitude and display unit are kept apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fraction {
    magnitude: f64,
    unit: FractionUnit,
}

impl Fraction {
    pub fn new(magnitude: f64, unit: FractionUnit) -> Self {
        Self { magnitude, unit }
    }

    /// Base (ratio) value, e.g. 0.21 for `21%`.
    pub fn value(&self) -> f64 {
        self.magnitude * self.unit.scale()
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> FractionUnit {
        self.unit
    }

    pub fn parse(text: &str) -> MixtureResult<Self> {
        let (magnitude, unit) = parse_fraction(text)?;
        Ok(Self { magnitude, unit })
    }
}

impl From<f64> for Fraction {
    fn from(value: f64) -> Self {
        Self {
            magnitude: value,
            unit: FractionUnit::Ratio,
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            FractionUnit::Ratio => write!(f, "{}", self.magnitude),
            unit => write!(f, "{}{}", self.magnitude, unit.suffix()),
        }
    }
}

/// Amount of one species: an explicit fraction or the balance wildcard.
///
/// The tagged form makes "at most one balance species" checkable at mixture
/// construction instead of hiding a magic string inside a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountSpec {
    /// Fraction derived as `1 - sum(others)` when the mixture is balanced.
    Balance,
    /// Explicitly given fraction.
    Value(Fraction),
}

impl AmountSpec {
    /// Parse an amount from its text form: the balance marker or a fraction.
    pub fn parse(text: &str) -> MixtureResult<Self> {
        if text.trim() == BALANCE_INDICATOR {
            Ok(AmountSpec::Balance)
        } else {
            Ok(AmountSpec::Value(Fraction::parse(text)?))
        }
    }

    pub fn is_balance(&self) -> bool {
        matches!(self, AmountSpec::Balance)
    }

    /// Explicit base value, if this is not the balance wildcard.
    pub fn value(&self) -> Option<f64> {
        match self {
            AmountSpec::Balance => None,
            AmountSpec::Value(fraction) => Some(fraction.value()),
        }
    }
}

impl From<f64> for AmountSpec {
    fn from(value: f64) -> Self {
        AmountSpec::Value(Fraction::from(value))
    }
}

impl From<Fraction> for AmountSpec {
    fn from(fraction: Fraction) -> Self {
        AmountSpec::Value(fraction)
    }
}

impl fmt::Display for AmountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountSpec::Balance => write!(f, "{}", BALANCE_INDICATOR),
            AmountSpec::Value(fraction) => write!(f, "{}", fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_balance_marker() {
        assert_eq!(AmountSpec::parse("*").unwrap(), AmountSpec::Balance);
        assert_eq!(AmountSpec::parse(" * ").unwrap(), AmountSpec::Balance);
    }

    #[test]
    fn parse_fraction_forms() {
        let amount = AmountSpec::parse("0.21").unwrap();
        assert_eq!(amount.value(), Some(0.21));

        let amount = AmountSpec::parse("21%").unwrap();
        assert!((amount.value().unwrap() - 0.21).abs() < 1e-15);

        let amount = AmountSpec::parse("400ppm").unwrap();
        assert!((amount.value().unwrap() - 4e-4).abs() < 1e-18);
    }

    #[test]
    fn parse_rejects_dimensioned_amount() {
        assert!(AmountSpec::parse("3 K").is_err());
        assert!(AmountSpec::parse("garbage").is_err());
    }

    #[test]
    fn display_round_trip() {
        for text in ["*", "0.21", "21%", "400ppm"] {
            let amount = AmountSpec::parse(text).unwrap();
            assert_eq!(amount.to_string(), text);
        }
    }
}
