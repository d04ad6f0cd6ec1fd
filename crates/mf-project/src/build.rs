//! Schema-to-domain conversion.

use crate::schema::{CalibrationDef, ConfigDef, DeviceDef, LineDef, MfcDef};
use crate::{ProjectError, ProjectResult};
use chrono::NaiveDate;
use mf_control::{
    Calibration, CalibrationSelector, DeviceBinding, LinearCalibration, Mfc,
};
use mf_core::parse::{parse_electric_potential, parse_flow_rate, parse_temperature};
use mf_mixture::Mixture;

/// A fully typed configuration ready for resolution runs.
#[derive(Debug, Clone)]
pub struct Config {
    lines: Vec<Line>,
    controllers: Vec<Mfc>,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub name: String,
    pub gas: Mixture,
    pub device: Option<DeviceRef>,
}

#[derive(Debug, Clone)]
pub struct DeviceRef {
    pub mfc: String,
    pub calibration: CalibrationSelector,
}

impl Config {
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn controllers(&self) -> &[Mfc] {
        &self.controllers
    }

    pub fn mfc_by_name(&self, name: &str) -> Option<&Mfc> {
        self.controllers.iter().find(|mfc| mfc.name() == name)
    }

    /// The controller a line is bound to, with its calibration selector.
    ///
    /// `None` for unbound lines. Dangling references cannot occur here; they
    /// are rejected at load time.
    pub fn mfc_for_line(&self, line: &Line) -> Option<(&Mfc, CalibrationSelector)> {
        let device = line.device.as_ref()?;
        let mfc = self.mfc_by_name(&device.mfc)?;
        Some((mfc, device.calibration))
    }
}

/// Convert a validated document into typed domain objects.
pub fn build_config(def: &ConfigDef) -> ProjectResult<Config> {
    let lines = def.lines.iter().map(build_line).collect::<Result<_, _>>()?;
    let controllers = def
        .controllers
        .iter()
        .map(build_mfc)
        .collect::<Result<_, _>>()?;
    Ok(Config { lines, controllers })
}

fn build_line(def: &LineDef) -> ProjectResult<Line> {
    let device = match &def.device {
        Some(device) => Some(DeviceRef {
            mfc: device.mfc.clone(),
            calibration: device.calibration.parse()?,
        }),
        None => None,
    };
    Ok(Line {
        name: def.name.clone(),
        gas: def.gas.clone(),
        device,
    })
}

fn build_mfc(def: &MfcDef) -> ProjectResult<Mfc> {
    let calibrations = def
        .calibrations
        .iter()
        .map(build_calibration)
        .collect::<ProjectResult<Vec<_>>>()?;
    let device = match &def.device {
        Some(device) => build_device(device)?,
        None => None,
    };
    Ok(Mfc::new(
        def.name.clone(),
        def.info.clone(),
        calibrations,
        device,
    ))
}

fn build_calibration(def: &CalibrationDef) -> ProjectResult<Calibration> {
    match def {
        CalibrationDef::Linear {
            date,
            gas,
            temperature,
            offset,
            slope,
        } => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                ProjectError::BadField {
                    field: "calibration date",
                    value: date.clone(),
                    reason: e.to_string(),
                }
            })?;
            let temperature =
                parse_temperature(temperature).map_err(|e| ProjectError::BadField {
                    field: "calibration temperature",
                    value: temperature.clone(),
                    reason: e.to_string(),
                })?;
            let offset = parse_flow_rate(offset).map_err(|e| ProjectError::BadField {
                field: "calibration offset",
                value: offset.clone(),
                reason: e.to_string(),
            })?;
            let slope = parse_flow_rate(slope).map_err(|e| ProjectError::BadField {
                field: "calibration slope",
                value: slope.clone(),
                reason: e.to_string(),
            })?;
            Ok(Calibration::Linear(LinearCalibration::new(
                date,
                gas.clone(),
                temperature,
                offset,
                slope,
            )?))
        }
    }
}

fn build_device(def: &DeviceDef) -> ProjectResult<Option<DeviceBinding>> {
    match def {
        DeviceDef::Analog {
            max_output_voltage,
            max_input_voltage,
        } => {
            let max_output_voltage =
                parse_electric_potential(max_output_voltage).map_err(|e| {
                    ProjectError::BadField {
                        field: "max_output_voltage",
                        value: max_output_voltage.clone(),
                        reason: e.to_string(),
                    }
                })?;
            let max_input_voltage =
                parse_electric_potential(max_input_voltage).map_err(|e| {
                    ProjectError::BadField {
                        field: "max_input_voltage",
                        value: max_input_voltage.clone(),
                        reason: e.to_string(),
                    }
                })?;
            Ok(Some(DeviceBinding::Analog {
                max_output_voltage,
                max_input_voltage,
            }))
        }
        DeviceDef::FlowBus => Ok(Some(DeviceBinding::FlowBus)),
        DeviceDef::Unconnected => Ok(None),
    }
}
