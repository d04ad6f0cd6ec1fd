//! Two-phase supply decomposition.

use crate::error::{SolverError, SolverResult};
use crate::nnls::{NnlsConfig, nnls};
use mf_core::numeric::snap_to_zero;
use mf_mixture::Mixture;
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeSet;
use tracing::warn;

/// Tolerance on `sum(weights) - 1` before the result counts as inconsistent.
pub const PROPORTION_SUM_TOLERANCE: f64 = 1e-4;

/// NNLS noise floor: solution entries below this are snapped to exact zero.
const WEIGHT_ATOL: f64 = 1e-8;

/// Relative flow contribution of each supply needed to obtain `target`.
///
/// The returned weights align 1:1 with `sources` and sum to 1 for an achievable
/// target. Two diagnostics are non-fatal and only logged: target species absent
/// from every source, and weights not summing to 1 within
/// [`PROPORTION_SUM_TOLERANCE`] (the fit did not converge or the target cannot
/// be blended from these supplies).
pub fn supply_proportions_for_mixture(
    sources: &[Mixture],
    target: &Mixture,
) -> SolverResult<Vec<f64>> {
    if sources.is_empty() {
        return Err(SolverError::NoSources);
    }

    // Union of all species the supplies can deliver, in stable order
    let union: Vec<String> = sources
        .iter()
        .flat_map(|source| source.species().map(str::to_string))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let missing: Vec<&str> = target
        .species()
        .filter(|s| !union.iter().any(|u| u == s))
        .collect();
    if !missing.is_empty() {
        warn!(
            target_mixture = %target.label(),
            species = ?missing,
            "Missing species in supply: requested species not delivered by any source"
        );
    }

    let balance_with = target.balance_species().map(str::to_string);

    let solve_target = match &balance_with {
        Some(balance) => {
            // Phase 1: fit only the species with explicitly known fractions
            let known: Vec<String> = union
                .iter()
                .filter(|s| *s != balance && target.contains(s))
                .cloned()
                .collect();
            let x1 = solve_system(sources, target, &known)?;

            // Re-derive the balance fraction from the phase-1 blend, then let
            // balancing compute it self-consistently for phase 2
            Mixture::compose(sources, x1.as_slice(), Some(balance.as_str()))?
        }
        None => target.clone(),
    };

    // Phase 2 (or the only phase without a balance species): fit the full union
    let x = solve_system(sources, &solve_target.balanced(), &union)?;

    let weights: Vec<f64> = x.iter().map(|&v| snap_to_zero(v, WEIGHT_ATOL)).collect();

    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > PROPORTION_SUM_TOLERANCE {
        warn!(
            total,
            weights = ?weights,
            "Inconsistent mixture composition: the sum of the supply proportions \
             is not 1 within tolerance {PROPORTION_SUM_TOLERANCE}. Either the fit \
             has not converged or the desired mixture cannot be achieved with the \
             selected gas supplies."
        );
    }

    Ok(weights)
}

/// One NNLS solve over a given species subset.
///
/// `A[i][j]` is the balanced fraction of `species[i]` in `sources[j]`; `b[i]`
/// the target fraction. Species a mixture does not contain contribute zero.
fn solve_system(
    sources: &[Mixture],
    target: &Mixture,
    species: &[String],
) -> SolverResult<DVector<f64>> {
    let m = species.len();
    let n = sources.len();

    let a = DMatrix::from_fn(m, n, |i, j| sources[j].get(&species[i]).unwrap_or(0.0));
    let b = DVector::from_fn(m, |i, _| target.get(&species[i]).unwrap_or(0.0));

    nnls(&a, &b, &NnlsConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(text: &str) -> Mixture {
        Mixture::parse(text).unwrap()
    }

    #[test]
    fn single_supply_single_species() {
        let sources = [mix("N2=*").with_name("carrier")];
        let target = mix("N2=1.0");
        let x = supply_proportions_for_mixture(&sources, &target).unwrap();
        assert_eq!(x.len(), 1);
        assert!((x[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn complex_sources_with_balance_target() {
        let sources = [
            mix("Ar=1.0"),
            mix("O2=1.0"),
            mix("CO=0.1492, Ar=*"),
            mix("NO=0.002959, Ar=*"),
            mix("H2=*"),
            mix("NO2=0.01072, N2O=0.0, Ar=*"),
        ];
        let target = mix("Ar=*, NO=400ppm, CO=400ppm");

        let x = supply_proportions_for_mixture(&sources, &target).unwrap();

        let expected = [0.86213823, 0.0, 0.00268097, 0.1351808, 0.0, 0.0];
        for (got, want) in x.iter().zip(expected) {
            assert!(
                (got - want).abs() < 1e-8,
                "weights {:?} != expected {:?}",
                x,
                expected
            );
        }
        let total: f64 = x.iter().sum();
        assert!((total - 1.0).abs() < PROPORTION_SUM_TOLERANCE);
    }

    #[test]
    fn unsupplied_balance_species_yields_inconsistent_sum() {
        // N2 is requested as balance but no source delivers it; the solve
        // completes and the inconsistency shows up in the weight sum.
        let sources = [
            mix("Ar=1.0"),
            mix("O2=1.0"),
            mix("CO=0.1492, Ar=*"),
            mix("NO=0.002959, Ar=*"),
            mix("H2=*"),
            mix("NO2=0.01072, N2O=0.0, Ar=*"),
        ];
        let target = mix("N2=*, NO=400ppm, CO=400ppm");

        let x = supply_proportions_for_mixture(&sources, &target).unwrap();
        let total: f64 = x.iter().sum();
        assert!((total - 1.0).abs() > PROPORTION_SUM_TOLERANCE);
    }

    #[test]
    fn unsupplied_species_is_not_fatal() {
        let sources = [mix("O2=0.21, N2=*"), mix("NO=0.003, N2=*")];
        let target = mix("CO=0.0004, N2=*");

        // CO is nowhere to be found; warning only, never a panic/error
        let x = supply_proportions_for_mixture(&sources, &target).unwrap();
        assert_eq!(x.len(), 2);
    }

    #[test]
    fn no_sources_is_an_error() {
        let err = supply_proportions_for_mixture(&[], &mix("N2=1.0")).unwrap_err();
        assert!(matches!(err, SolverError::NoSources));
    }

    #[test]
    fn two_complementary_sources() {
        let sources = [mix("N2=1.0"), mix("O2=1.0")];
        let target = mix("O2=0.21, N2=*");
        let x = supply_proportions_for_mixture(&sources, &target).unwrap();
        assert!((x[0] - 0.79).abs() < 1e-10);
        assert!((x[1] - 0.21).abs() < 1e-10);
    }
}
