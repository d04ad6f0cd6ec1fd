//! Balanced gas compositions.

use crate::amount::AmountSpec;
use crate::cf::{CfEntry, calculate_cf, cf_table};
use crate::error::{MixtureError, MixtureResult};
use mf_core::units::FlowRate;
use std::fmt;
use std::str::FromStr;

/// Tolerance for the strict constructor's sum-to-one check.
const STRICT_SUM_TOL: f64 = 1e-6;

/// An immutable gas composition: ordered species -> amount mapping, at most one
/// entry marked as balance species.
///
/// Construction validates (unique species, at most one balance marker, finite
/// fractions); all transformations return new values. Whether a composition
/// without a balance species must sum to 1 is a caller choice: [`Mixture::new`]
/// accepts it (the solver's consistency check catches the fallout downstream),
/// [`Mixture::new_strict`] rejects it at construction.
#[derive(Debug, Clone)]
pub struct Mixture {
    name: Option<String>,
    composition: Vec<(String, AmountSpec)>,
}

impl Mixture {
    /// Create a mixture, accepting unbalanced compositions.
    pub fn new<I, S, A>(pairs: I) -> MixtureResult<Self>
    where
        I: IntoIterator<Item = (S, A)>,
        S: Into<String>,
        A: Into<AmountSpec>,
    {
        Self::build(None, collect_pairs(pairs), false)
    }

    /// Create a mixture and reject compositions with no balance species whose
    /// fractions do not sum to 1.
    pub fn new_strict<I, S, A>(pairs: I) -> MixtureResult<Self>
    where
        I: IntoIterator<Item = (S, A)>,
        S: Into<String>,
        A: Into<AmountSpec>,
    {
        Self::build(None, collect_pairs(pairs), true)
    }

    /// Parse the text encoding: `species=amount` pairs separated by `,`, `;` or `/`.
    ///
    /// Amounts are fractions (`0.21`, `10%`, `400ppm`) or the balance marker `*`.
    pub fn parse(text: &str) -> MixtureResult<Self> {
        let mut pairs = Vec::new();
        for entry in text.split([',', ';', '/']) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (species, amount) = entry.split_once('=').ok_or_else(|| MixtureError::BadEntry {
                entry: entry.to_string(),
            })?;
            let species = species.trim();
            if species.is_empty() {
                return Err(MixtureError::BadEntry {
                    entry: entry.to_string(),
                });
            }
            pairs.push((species.to_string(), AmountSpec::parse(amount)?));
        }
        Self::build(None, pairs, false)
    }

    /// Weighted combination of source mixtures (species union, first-occurrence
    /// order). With `balance_with`, that species is re-inserted as the balance
    /// wildcard so its fraction is re-derived when the result is balanced.
    pub fn compose(
        sources: &[Mixture],
        weights: &[f64],
        balance_with: Option<&str>,
    ) -> MixtureResult<Self> {
        if sources.len() != weights.len() {
            return Err(MixtureError::ComposeLengthMismatch {
                sources: sources.len(),
                weights: weights.len(),
            });
        }

        let mut pairs: Vec<(String, f64)> = Vec::new();
        for (source, &weight) in sources.iter().zip(weights) {
            for (species, fraction) in source.mole_fractions() {
                match pairs.iter_mut().find(|(s, _)| *s == species) {
                    Some((_, total)) => *total += weight * fraction,
                    None => pairs.push((species, weight * fraction)),
                }
            }
        }

        let mut pairs: Vec<(String, AmountSpec)> = pairs
            .into_iter()
            .map(|(species, value)| (species, AmountSpec::from(value)))
            .collect();

        if let Some(balance) = balance_with {
            match pairs.iter_mut().find(|(s, _)| s == balance) {
                Some((_, amount)) => *amount = AmountSpec::Balance,
                None => pairs.push((balance.to_string(), AmountSpec::Balance)),
            }
        }

        Self::build(None, pairs, false)
    }

    /// Construction entry point for the serde decoder.
    pub(crate) fn from_parts(
        name: Option<String>,
        pairs: Vec<(String, AmountSpec)>,
    ) -> MixtureResult<Self> {
        Self::build(name, pairs, false)
    }

    fn build(
        name: Option<String>,
        pairs: Vec<(String, AmountSpec)>,
        strict: bool,
    ) -> MixtureResult<Self> {
        if pairs.is_empty() {
            return Err(MixtureError::EmptyComposition);
        }

        let mut balance_count = 0;
        for (i, (species, amount)) in pairs.iter().enumerate() {
            if pairs[..i].iter().any(|(s, _)| s == species) {
                return Err(MixtureError::DuplicateSpecies {
                    species: species.clone(),
                });
            }
            match amount {
                AmountSpec::Balance => balance_count += 1,
                AmountSpec::Value(fraction) => {
                    if !fraction.value().is_finite() {
                        return Err(MixtureError::NonFinite {
                            species: species.clone(),
                        });
                    }
                }
            }
        }
        if balance_count > 1 {
            return Err(MixtureError::MultipleBalance {
                found: balance_count,
            });
        }

        let mixture = Self { name, composition: pairs };

        if strict && mixture.balance_species().is_none() {
            let total = mixture.explicit_total();
            if (total - 1.0).abs() > STRICT_SUM_TOL {
                return Err(MixtureError::Unbalanced { total });
            }
        }

        Ok(mixture)
    }

    /// Same composition with an explicit display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display label: the explicit name, or species joined with `/`.
    ///
    /// Purely cosmetic; never part of equality or lookups.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self
                .composition
                .iter()
                .map(|(species, _)| species.as_str())
                .collect::<Vec<_>>()
                .join("/"),
        }
    }

    pub fn len(&self) -> usize {
        self.composition.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composition.is_empty()
    }

    /// Species in composition order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.composition.iter().map(|(species, _)| species.as_str())
    }

    pub fn contains(&self, species: &str) -> bool {
        self.composition.iter().any(|(s, _)| s == species)
    }

    /// Raw composition entries (amounts as written, balance marker included).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AmountSpec)> {
        self.composition
            .iter()
            .map(|(species, amount)| (species.as_str(), amount))
    }

    /// The species marked as balance, if any.
    pub fn balance_species(&self) -> Option<&str> {
        self.composition
            .iter()
            .find(|(_, amount)| amount.is_balance())
            .map(|(species, _)| species.as_str())
    }

    /// Sum of the explicitly given fractions (balance entry excluded).
    pub fn explicit_total(&self) -> f64 {
        self.composition
            .iter()
            .filter_map(|(_, amount)| amount.value())
            .sum()
    }

    /// Composition with the balance entry replaced by `1 - sum(others)`.
    ///
    /// Without a balance species this is a plain copy: no renormalization.
    pub fn balanced(&self) -> Self {
        let Some(balance) = self.balance_species() else {
            return self.clone();
        };
        let derived = 1.0 - self.explicit_total();
        let composition = self
            .composition
            .iter()
            .map(|(species, amount)| {
                if species == balance {
                    (species.clone(), AmountSpec::from(derived))
                } else {
                    (species.clone(), *amount)
                }
            })
            .collect();
        Self {
            name: self.name.clone(),
            composition,
        }
    }

    /// Mole fraction of one species from the balanced view.
    ///
    /// Missing species yields `None`; callers building dense matrices over a
    /// species union use `.unwrap_or(0.0)`.
    pub fn get(&self, species: &str) -> Option<f64> {
        self.composition.iter().find_map(|(s, amount)| {
            if s != species {
                return None;
            }
            Some(match amount {
                AmountSpec::Balance => 1.0 - self.explicit_total(),
                AmountSpec::Value(fraction) => fraction.value(),
            })
        })
    }

    /// Balanced composition as dimensionless floats, in composition order.
    pub fn mole_fractions(&self) -> Vec<(String, f64)> {
        self.composition
            .iter()
            .map(|(species, amount)| {
                let value = match amount {
                    AmountSpec::Balance => 1.0 - self.explicit_total(),
                    AmountSpec::Value(fraction) => fraction.value(),
                };
                (species.clone(), value)
            })
            .collect()
    }

    /// Conversion factor against the built-in reference table.
    pub fn conversion_factor(&self) -> MixtureResult<f64> {
        calculate_cf(self, cf_table())
    }

    /// Conversion factor against a caller-supplied table.
    pub fn conversion_factor_with(&self, table: &[CfEntry]) -> MixtureResult<f64> {
        calculate_cf(self, table)
    }

    /// Reference-gas (N2) equivalent of a flow of this mixture.
    ///
    /// An N2-calibrated device must indicate `flow / cf` to deliver `flow` of
    /// this gas.
    pub fn equivalent_flow_rate(&self, flow: FlowRate) -> MixtureResult<FlowRate> {
        let cf = self.conversion_factor()?;
        Ok(flow / cf)
    }
}

// Equality is over composition only (species order and balanced amounts); the
// display name never participates.
impl PartialEq for Mixture {
    fn eq(&self, other: &Self) -> bool {
        if self.composition.len() != other.composition.len() {
            return false;
        }
        self.composition
            .iter()
            .zip(&other.composition)
            .all(|((sa, aa), (sb, ab))| {
                sa == sb
                    && match (aa, ab) {
                        (AmountSpec::Balance, AmountSpec::Balance) => true,
                        (AmountSpec::Value(fa), AmountSpec::Value(fb)) => {
                            fa.value() == fb.value()
                        }
                        _ => false,
                    }
            })
    }
}

impl FromStr for Mixture {
    type Err = MixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Mixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self
            .composition
            .iter()
            .map(|(species, amount)| format!("{}={}", species, amount))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}[{}]", self.label(), entries)
    }
}

fn collect_pairs<I, S, A>(pairs: I) -> Vec<(String, AmountSpec)>
where
    I: IntoIterator<Item = (S, A)>,
    S: Into<String>,
    A: Into<AmountSpec>,
{
    pairs
        .into_iter()
        .map(|(species, amount)| (species.into(), amount.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_core::numeric::{Tolerances, nearly_equal};

    #[test]
    fn construct_from_fractions() {
        let air = Mixture::new([("N2", 0.79), ("O2", 0.21)]).unwrap();
        assert_eq!(air.species().collect::<Vec<_>>(), vec!["N2", "O2"]);
        assert_eq!(air.get("N2"), Some(0.79));
        assert_eq!(air.get("Ar"), None);
    }

    #[test]
    fn balance_species_is_derived() {
        let mix = Mixture::parse("NO=0.003, Ar=*, CO=0.005").unwrap();
        assert_eq!(mix.balance_species(), Some("Ar"));

        let balanced = mix.balanced();
        assert_eq!(balanced.balance_species(), None);
        assert!((balanced.get("Ar").unwrap() - 0.992).abs() < 1e-12);
    }

    #[test]
    fn balanced_composition_sums_to_one() {
        let mix = Mixture::parse("CH4=3200ppm, O2=10%, N2=*").unwrap();
        let total: f64 = mix.mole_fractions().iter().map(|(_, v)| v).sum();
        assert!(nearly_equal(total, 1.0, Tolerances::default()));
    }

    #[test]
    fn single_balance_species_is_whole_mixture() {
        let mix = Mixture::parse("N2=*").unwrap();
        assert_eq!(mix.get("N2"), Some(1.0));
    }

    #[test]
    fn two_balance_markers_fail() {
        let err = Mixture::parse("NO=3000ppm, Ar=*, He=*").unwrap_err();
        assert!(matches!(err, MixtureError::MultipleBalance { found: 2 }));
    }

    #[test]
    fn duplicate_species_fail() {
        let err = Mixture::parse("N2=0.5, N2=0.5").unwrap_err();
        assert!(matches!(err, MixtureError::DuplicateSpecies { .. }));
    }

    #[test]
    fn empty_composition_fails() {
        assert!(matches!(
            Mixture::parse(""),
            Err(MixtureError::EmptyComposition)
        ));
    }

    #[test]
    fn synthesized_label_keeps_composition_order() {
        let mix = Mixture::parse("NO=0.003, Ar=*").unwrap();
        assert_eq!(mix.label(), "NO/Ar");

        let mix = Mixture::parse("Ar=*, NO=0.003").unwrap();
        assert_eq!(mix.label(), "Ar/NO");

        let named = mix.with_name("carrier");
        assert_eq!(named.label(), "carrier");
    }

    #[test]
    fn name_does_not_affect_equality() {
        let a = Mixture::parse("N2=0.79, O2=0.21").unwrap().with_name("air");
        let b = Mixture::parse("N2=0.79, O2=0.21").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn percent_amount_has_ratio_value() {
        let mix = Mixture::parse("N2=0.79, O2=21%").unwrap();
        assert!((mix.get("O2").unwrap() - 0.21).abs() < 1e-12);
    }

    #[test]
    fn unbalanced_is_accepted_leniently() {
        let mix = Mixture::new([("N2", 0.5), ("O2", 0.2)]).unwrap();
        assert!((mix.explicit_total() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn strict_rejects_unbalanced() {
        let err = Mixture::new_strict([("N2", 0.5), ("O2", 0.2)]).unwrap_err();
        assert!(matches!(err, MixtureError::Unbalanced { .. }));

        // with a balance species the strict check does not apply
        assert!(Mixture::new_strict([("N2", AmountSpec::Balance)]).is_ok());
        assert!(
            Mixture::new_strict([("N2", AmountSpec::from(0.8)), ("O2", AmountSpec::from(0.2))])
                .is_ok()
        );
    }

    #[test]
    fn compose_weighted_union() {
        let sources = [
            Mixture::parse("Ar=1.0").unwrap(),
            Mixture::parse("CO=0.1, Ar=*").unwrap(),
        ];
        let mixed = Mixture::compose(&sources, &[0.5, 0.5], None).unwrap();
        assert!((mixed.get("CO").unwrap() - 0.05).abs() < 1e-12);
        assert!((mixed.get("Ar").unwrap() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn compose_reinserts_balance_marker() {
        let sources = [Mixture::parse("Ar=1.0").unwrap()];
        let mixed = Mixture::compose(&sources, &[0.9], Some("Ar")).unwrap();
        assert_eq!(mixed.balance_species(), Some("Ar"));
        assert_eq!(mixed.get("Ar"), Some(1.0));
    }

    #[test]
    fn compose_length_mismatch() {
        let sources = [Mixture::parse("Ar=1.0").unwrap()];
        let err = Mixture::compose(&sources, &[0.5, 0.5], None).unwrap_err();
        assert!(matches!(err, MixtureError::ComposeLengthMismatch { .. }));
    }

    #[test]
    fn equivalent_flow_rate_divides_by_cf() {
        use mf_core::units::{in_mlpm, mlpm};
        let co2 = Mixture::parse("CO2=1.0").unwrap();
        let equivalent = co2.equivalent_flow_rate(mlpm(74.0)).unwrap();
        assert!((in_mlpm(equivalent) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn display_round_trip_text() {
        let mix = Mixture::parse("CH4=3200ppm, O2=10%, N2=*").unwrap();
        assert_eq!(mix.to_string(), "CH4/O2/N2[CH4=3200ppm, O2=10%, N2=*]");
    }
}
