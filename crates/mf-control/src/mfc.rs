//! Mass-flow-controller devices and calibration selection.

use crate::calibration::Calibration;
use crate::error::{ControlError, ControlResult};
use mf_core::units::{ElectricPotential, FlowRate, Temperature};
use mf_mixture::Mixture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nameplate data. Free-form; nothing downstream interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MfcInfo {
    pub manufacturer: String,
    pub make: String,
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
}

/// How the controller is wired up.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceBinding {
    /// Analog interface: the setpoint maps linearly onto the output voltage
    /// range, the measured flow onto the input voltage range.
    Analog {
        max_output_voltage: ElectricPotential,
        max_input_voltage: ElectricPotential,
    },
    /// Bronkhorst FLOW-BUS digital interface; setpoints are written directly
    /// as fractions of full scale.
    FlowBus,
}

/// Which of an MFC's calibrations to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationSelector {
    /// Most recent by calibration date.
    Latest,
    /// Position in the calibration list.
    Index(usize),
}

impl Default for CalibrationSelector {
    fn default() -> Self {
        CalibrationSelector::Latest
    }
}

impl FromStr for CalibrationSelector {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(CalibrationSelector::Latest);
        }
        s.parse::<usize>()
            .map(CalibrationSelector::Index)
            .map_err(|_| ControlError::BadSelector {
                text: s.to_string(),
            })
    }
}

impl fmt::Display for CalibrationSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationSelector::Latest => write!(f, "latest"),
            CalibrationSelector::Index(i) => write!(f, "{i}"),
        }
    }
}

/// A mass-flow controller: identity, calibration history, and an optional
/// device binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Mfc {
    name: String,
    info: Option<MfcInfo>,
    calibrations: Vec<Calibration>,
    device: Option<DeviceBinding>,
}

impl Mfc {
    pub fn new(
        name: impl Into<String>,
        info: Option<MfcInfo>,
        calibrations: Vec<Calibration>,
        device: Option<DeviceBinding>,
    ) -> Self {
        Self {
            name: name.into(),
            info,
            calibrations,
            device,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> Option<&MfcInfo> {
        self.info.as_ref()
    }

    pub fn calibrations(&self) -> &[Calibration] {
        &self.calibrations
    }

    pub fn device(&self) -> Option<&DeviceBinding> {
        self.device.as_ref()
    }

    /// Resolve a selector against the calibration history.
    ///
    /// `Latest` picks the newest calibration date; list order breaks ties in
    /// favor of the later entry.
    pub fn get_calibration(&self, selector: CalibrationSelector) -> ControlResult<&Calibration> {
        match selector {
            CalibrationSelector::Latest => self
                .calibrations
                .iter()
                .max_by_key(|c| c.date())
                .ok_or_else(|| ControlError::NoCalibrations {
                    name: self.name.clone(),
                }),
            CalibrationSelector::Index(index) => {
                self.calibrations
                    .get(index)
                    .ok_or_else(|| ControlError::CalibrationIndexOob {
                        name: self.name.clone(),
                        index,
                        len: self.calibrations.len(),
                    })
            }
        }
    }

    /// [`Calibration::setpoint_to_flowrate`] via the selected calibration.
    pub fn setpoint_to_flowrate(
        &self,
        setpoint: f64,
        gas: Option<&Mixture>,
        temperature: Option<Temperature>,
        selector: CalibrationSelector,
    ) -> ControlResult<FlowRate> {
        self.get_calibration(selector)?
            .setpoint_to_flowrate(setpoint, gas, temperature)
    }

    /// [`Calibration::flowrate_to_setpoint`] via the selected calibration.
    pub fn flowrate_to_setpoint(
        &self,
        flowrate: FlowRate,
        gas: Option<&Mixture>,
        temperature: Option<Temperature>,
        selector: CalibrationSelector,
    ) -> ControlResult<f64> {
        self.get_calibration(selector)?
            .flowrate_to_setpoint(flowrate, gas, temperature)
    }
}
