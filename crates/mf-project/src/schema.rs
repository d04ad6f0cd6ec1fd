//! Configuration schema definitions.
//!
//! Quantities and dates stay as strings here; conversion to typed values
//! happens in [`crate::build`] so that parse failures carry the field name.

use mf_control::MfcInfo;
use mf_mixture::Mixture;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigDef {
    pub lines: Vec<LineDef>,
    #[serde(default)]
    pub controllers: Vec<MfcDef>,
}

/// A physical delivery line carrying one supply mixture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineDef {
    pub name: String,
    pub gas: Mixture,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceRefDef>,
}

/// Reference from a line to a controller plus a calibration selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceRefDef {
    pub mfc: String,
    #[serde(default = "default_calibration_selector")]
    pub calibration: String,
}

fn default_calibration_selector() -> String {
    "latest".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MfcDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<MfcInfo>,
    pub calibrations: Vec<CalibrationDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceDef>,
}

/// Calibration record, discriminated by curve form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum CalibrationDef {
    Linear {
        /// ISO date, `YYYY-MM-DD`
        date: String,
        gas: Mixture,
        temperature: String,
        offset: String,
        slope: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "connection")]
pub enum DeviceDef {
    Analog {
        max_output_voltage: String,
        max_input_voltage: String,
    },
    FlowBus,
    /// Declared but unconnected hardware.
    #[serde(rename = "None")]
    Unconnected,
}
