//! Round trips of the configuration document through disk, in both formats.

use mf_project::schema::ConfigDef;
use mf_project::{ProjectError, load_config, load_config_def, save_config_def};
use std::path::PathBuf;

const SAMPLE: &str = r#"
lines:
  - name: carrier
    gas: { name: nitrogen, composition: { N2: "*" } }
    device: { mfc: mfc-a }
  - name: reactant
    gas: { composition: { NO: 0.003, N2: "*" } }
controllers:
  - name: mfc-a
    info:
      manufacturer: Bronkhorst
      make: F-201CV
      serial_number: SN-0042
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

fn temp_path(file_name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("mf-project-roundtrip");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(file_name)
}

#[test]
fn yaml_document_round_trips() {
    let def: ConfigDef = serde_yaml::from_str(SAMPLE).unwrap();

    let path = temp_path("roundtrip.yaml");
    save_config_def(&path, &def).unwrap();
    let loaded = load_config_def(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(def, loaded);
}

#[test]
fn json_document_round_trips() {
    let def: ConfigDef = serde_yaml::from_str(SAMPLE).unwrap();

    let path = temp_path("roundtrip.json");
    save_config_def(&path, &def).unwrap();
    let loaded = load_config_def(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(def, loaded);
}

#[test]
fn load_config_builds_domain_objects() {
    let path = temp_path("domain.yaml");
    std::fs::write(&path, SAMPLE).unwrap();
    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.lines().len(), 2);
    assert_eq!(config.lines()[0].gas.name(), Some("nitrogen"));
    let (mfc, _) = config.mfc_for_line(&config.lines()[0]).unwrap();
    assert_eq!(mfc.name(), "mfc-a");
    assert!(config.mfc_for_line(&config.lines()[1]).is_none());
}

#[test]
fn duplicate_line_names_are_rejected_on_load() {
    let yaml = SAMPLE.replace("name: reactant", "name: carrier");
    let path = temp_path("duplicates.yaml");
    std::fs::write(&path, &yaml).unwrap();
    let err = load_config(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn dangling_controller_reference_is_rejected_on_load() {
    let yaml = SAMPLE.replace("{ mfc: mfc-a }", "{ mfc: ghost }");
    let path = temp_path("dangling.yaml");
    std::fs::write(&path, &yaml).unwrap();
    let err = load_config(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(matches!(err, ProjectError::Validation(_)));
}

#[test]
fn unsupported_extension_is_rejected() {
    let def: ConfigDef = serde_yaml::from_str(SAMPLE).unwrap();
    let err = save_config_def(&temp_path("config.toml"), &def).unwrap_err();
    assert!(matches!(err, ProjectError::UnknownFormat { .. }));
}
