//! Persistent store of source gas mixtures.
//!
//! A flat list of mixtures kept next to the working directory, YAML or JSON
//! by file extension like the config loader; the CLI `source` subcommands are
//! thin wrappers around this type. A missing file reads as an empty store.

use crate::{Format, ProjectResult, extension_of};
use mf_mixture::Mixture;
use std::path::{Path, PathBuf};

pub const DEFAULT_STORE_FILE: &str = ".sources.json";

#[derive(Debug, Clone, Default)]
pub struct SourceStore {
    path: PathBuf,
    gases: Vec<Mixture>,
}

impl SourceStore {
    pub fn open(path: Option<&Path>) -> ProjectResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE));
        let gases = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            match extension_of(&path)? {
                Format::Yaml => serde_yaml::from_str(&content)?,
                Format::Json => serde_json::from_str(&content)?,
            }
        } else {
            Vec::new()
        };
        Ok(Self { path, gases })
    }

    pub fn save(&self) -> ProjectResult<()> {
        let content = match extension_of(&self.path)? {
            Format::Yaml => serde_yaml::to_string(&self.gases)?,
            Format::Json => serde_json::to_string_pretty(&self.gases)?,
        };
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gases(&self) -> &[Mixture] {
        &self.gases
    }

    pub fn is_empty(&self) -> bool {
        self.gases.is_empty()
    }

    pub fn add(&mut self, mixture: Mixture) {
        self.gases.push(mixture);
    }

    /// Remove by list index (the `#` column of `source list`).
    pub fn remove(&mut self, index: usize) -> Option<Mixture> {
        if index < self.gases.len() {
            Some(self.gases.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.gases.clear();
    }
}
