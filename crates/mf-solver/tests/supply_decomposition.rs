//! Decompose-then-recompose: the weighted blend must reproduce the target.

use mf_mixture::Mixture;
use mf_solver::{PROPORTION_SUM_TOLERANCE, supply_proportions_for_mixture};

fn mix(text: &str) -> Mixture {
    Mixture::parse(text).unwrap()
}

#[test]
fn recomposed_blend_matches_the_target() {
    let sources = [
        mix("Ar=1.0"),
        mix("O2=1.0"),
        mix("CO=0.1492, Ar=*"),
        mix("NO=0.002959, Ar=*"),
    ];
    let target = mix("Ar=*, NO=400ppm, CO=400ppm");

    let weights = supply_proportions_for_mixture(&sources, &target).unwrap();
    let total: f64 = weights.iter().sum();
    assert!((total - 1.0).abs() < PROPORTION_SUM_TOLERANCE);

    let blend = Mixture::compose(&sources, &weights, None).unwrap();
    assert!((blend.get("NO").unwrap() - 400e-6).abs() < 1e-9);
    assert!((blend.get("CO").unwrap() - 400e-6).abs() < 1e-9);
    let balanced = target.balanced();
    assert!((blend.get("Ar").unwrap() - balanced.get("Ar").unwrap()).abs() < 1e-8);
}

#[test]
fn diluting_a_bottled_span_gas() {
    // A 500 ppm NO bottle diluted with pure carrier down to 100 ppm
    let sources = [mix("NO=500ppm, N2=*"), mix("N2=*")];
    let target = mix("NO=100ppm, N2=*");

    let weights = supply_proportions_for_mixture(&sources, &target).unwrap();
    assert!((weights[0] - 0.2).abs() < 1e-8);
    assert!((weights[1] - 0.8).abs() < 1e-8);
}

#[test]
fn redundant_supplies_stay_non_negative() {
    // Two bottles can deliver O2; neither weight may go negative to
    // compensate the other
    let sources = [mix("O2=1.0"), mix("O2=0.5, N2=*"), mix("N2=*")];
    let target = mix("O2=0.21, N2=*");

    let weights = supply_proportions_for_mixture(&sources, &target).unwrap();
    assert!(weights.iter().all(|&w| w >= 0.0));

    let blend = Mixture::compose(&sources, &weights, None).unwrap();
    assert!((blend.get("O2").unwrap() - 0.21).abs() < 1e-6);
}
