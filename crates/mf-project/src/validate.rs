//! Configuration validation logic.
//!
//! Structural invariants only: name uniqueness and reference integrity.
//! Quantity strings are checked later, when [`crate::build`] parses them.

use crate::schema::ConfigDef;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: &'static str },

    #[error("Line '{line}' references unknown controller '{mfc}'")]
    UnknownController { line: String, mfc: String },
}

pub fn validate_config(config: &ConfigDef) -> Result<(), ValidationError> {
    let mut line_names = HashSet::new();
    for line in &config.lines {
        if !line_names.insert(&line.name) {
            return Err(ValidationError::DuplicateName {
                name: line.name.clone(),
                context: "lines",
            });
        }
    }

    let mut controller_names = HashSet::new();
    for controller in &config.controllers {
        if !controller_names.insert(&controller.name) {
            return Err(ValidationError::DuplicateName {
                name: controller.name.clone(),
                context: "controllers",
            });
        }
    }

    for line in &config.lines {
        if let Some(device) = &line.device {
            if !controller_names.contains(&device.mfc) {
                return Err(ValidationError::UnknownController {
                    line: line.name.clone(),
                    mfc: device.mfc.clone(),
                });
            }
        }
    }

    Ok(())
}
