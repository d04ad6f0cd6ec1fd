//! Target mixture resolution against the configured supply lines.

use crate::AppResult;
use mf_core::units::{FlowRate, Temperature};
use mf_mixture::Mixture;
use mf_project::Config;
use mf_solver::{PROPORTION_SUM_TOLERANCE, supply_proportions_for_mixture};
use tracing::warn;

/// One supply line's share of a resolution.
#[derive(Debug, Clone)]
pub struct Component {
    pub gas: Mixture,
    pub weight: f64,
    pub flowrate: FlowRate,
    pub line: String,
    /// Controller name, for lines bound to a device.
    pub mfc: Option<String>,
    /// Device setpoint in [0,1]; `None` for unbound lines or flows the bound
    /// device cannot deliver.
    pub setpoint: Option<f64>,
}

/// Outcome of one resolution run. Read-only; a fresh value per call.
#[derive(Debug, Clone)]
pub struct MixtureResult {
    /// Whether the supply weights reproduce the target within tolerance.
    /// An inconsistent solve still carries its components so the caller can
    /// report how far off the blend is.
    pub success: bool,
    /// Composition actually obtained by blending the supplies.
    pub mixture: Mixture,
    pub components: Vec<Component>,
}

/// Resolve `target` into per-line flow rates at the given conditions.
///
/// Flow rates are the supply weights scaled by `total_flowrate`. Setpoints are
/// computed through each bound controller, correcting for the line's gas and
/// the requested temperature. Setpoint failures (out-of-range requests,
/// unknown conversion factors) degrade that component to `setpoint: None`
/// with a warning rather than failing the run.
pub fn resolve(
    config: &Config,
    target: &Mixture,
    total_flowrate: FlowRate,
    temperature: Temperature,
) -> AppResult<MixtureResult> {
    let sources: Vec<Mixture> = config.lines().iter().map(|line| line.gas.clone()).collect();
    let weights = supply_proportions_for_mixture(&sources, target)?;

    let total: f64 = weights.iter().sum();
    let success = (total - 1.0).abs() <= PROPORTION_SUM_TOLERANCE;

    let mixture = Mixture::compose(&sources, &weights, None)?;

    let components = config
        .lines()
        .iter()
        .zip(&weights)
        .map(|(line, &weight)| {
            let flowrate = total_flowrate * weight;

            let (mfc, setpoint) = match config.mfc_for_line(line) {
                Some((mfc, selector)) => {
                    let setpoint = match mfc.flowrate_to_setpoint(
                        flowrate,
                        Some(&line.gas),
                        Some(temperature),
                        selector,
                    ) {
                        Ok(s) => Some(s),
                        Err(e) => {
                            warn!(
                                line = %line.name,
                                mfc = %mfc.name(),
                                error = %e,
                                "Could not derive a setpoint for this line"
                            );
                            None
                        }
                    };
                    (Some(mfc.name().to_string()), setpoint)
                }
                None => (None, None),
            };

            Component {
                gas: line.gas.clone(),
                weight,
                flowrate,
                line: line.name.clone(),
                mfc,
                setpoint,
            }
        })
        .collect();

    Ok(MixtureResult {
        success,
        mixture,
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_core::units::{in_mlpm, k, lpm};
    use mf_project::{build_config, validate_config};

    const CONFIG: &str = r#"
lines:
  - name: carrier
    gas: { composition: { N2: "*" } }
    device: { mfc: mfc-a }
  - name: oxygen
    gas: { composition: { O2: 1.0 } }
controllers:
  - name: mfc-a
    calibrations:
      - method: linear
        date: 2024-06-20
        gas: { composition: { N2: 1.0 } }
        temperature: 273K
        offset: 10 ml/min
        slope: 1.5 L/min
    device:
      connection: FlowBus
"#;

    fn config() -> Config {
        let def = serde_yaml::from_str(CONFIG).unwrap();
        validate_config(&def).unwrap();
        build_config(&def).unwrap()
    }

    #[test]
    fn resolves_synthetic_air() {
        let target = Mixture::parse("O2=0.21, N2=*").unwrap();
        let result = resolve(&config(), &target, lpm(1.0), k(273.0)).unwrap();

        assert!(result.success);
        assert_eq!(result.components.len(), 2);

        let carrier = &result.components[0];
        assert!((carrier.weight - 0.79).abs() < 1e-10);
        assert!((in_mlpm(carrier.flowrate) - 790.0).abs() < 1e-6);
        assert_eq!(carrier.line, "carrier");
        assert_eq!(carrier.mfc.as_deref(), Some("mfc-a"));
        // (790 - 10) / 1500 on the bound controller
        assert!((carrier.setpoint.unwrap() - 0.52).abs() < 1e-10);

        let oxygen = &result.components[1];
        assert!((oxygen.weight - 0.21).abs() < 1e-10);
        assert_eq!(oxygen.mfc, None);
        assert_eq!(oxygen.setpoint, None);

        assert!((result.mixture.get("O2").unwrap() - 0.21).abs() < 1e-10);
        assert!((result.mixture.get("N2").unwrap() - 0.79).abs() < 1e-10);
    }

    #[test]
    fn unsuppliable_target_is_flagged_not_fatal() {
        let target = Mixture::parse("CH4=0.5, Ar=*").unwrap();
        let result = resolve(&config(), &target, lpm(1.0), k(293.0)).unwrap();
        assert!(!result.success);
    }

    #[test]
    fn unachievable_setpoint_degrades_to_none() {
        // 10 L/min of carrier exceeds the controller's full scale
        let target = Mixture::parse("N2=1.0").unwrap();
        let result = resolve(&config(), &target, lpm(10.0), k(273.0)).unwrap();

        let carrier = &result.components[0];
        assert!(result.success);
        assert_eq!(carrier.setpoint, None);
        assert!((in_mlpm(carrier.flowrate) - 10000.0).abs() < 1e-6);
    }
}
