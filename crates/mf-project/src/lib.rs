//! mf-project: configuration file format, validation and the source-gas store.
//!
//! The on-disk representation (`schema`) keeps quantities and dates as strings
//! exactly as the user wrote them; `build` turns a validated document into
//! typed domain objects (`Config`, `Line`, [`mf_control::Mfc`]).

pub mod build;
pub mod schema;
pub mod store;
pub mod validate;

pub use build::{Config, DeviceRef, Line, build_config};
pub use schema::*;
pub use store::SourceStore;
pub use validate::{ValidationError, validate_config};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Could not parse {field} '{value}': {reason}")]
    BadField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Calibration error: {0}")]
    Control(#[from] mf_control::ControlError),

    #[error("Unsupported config format '{extension}' (expected yaml, yml or json)")]
    UnknownFormat { extension: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load, validate and build a configuration; the format is chosen from the
/// file extension.
pub fn load_config(path: &Path) -> ProjectResult<Config> {
    let def = load_config_def(path)?;
    validate_config(&def)?;
    build_config(&def)
}

/// Read the raw schema document without building domain objects.
pub fn load_config_def(path: &Path) -> ProjectResult<ConfigDef> {
    let content = std::fs::read_to_string(path)?;
    match extension_of(path)? {
        Format::Yaml => Ok(serde_yaml::from_str(&content)?),
        Format::Json => Ok(serde_json::from_str(&content)?),
    }
}

pub fn save_config_def(path: &Path, def: &ConfigDef) -> ProjectResult<()> {
    validate_config(def)?;
    let content = match extension_of(path)? {
        Format::Yaml => serde_yaml::to_string(def)?,
        Format::Json => serde_json::to_string_pretty(def)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

pub(crate) enum Format {
    Yaml,
    Json,
}

pub(crate) fn extension_of(path: &Path) -> ProjectResult<Format> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match extension.as_str() {
        "yaml" | "yml" => Ok(Format::Yaml),
        "json" => Ok(Format::Json),
        _ => Err(ProjectError::UnknownFormat { extension }),
    }
}
