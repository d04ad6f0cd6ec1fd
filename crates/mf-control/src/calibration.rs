//! Setpoint/flow-rate calibration curves.

use crate::error::{ControlError, ControlResult};
use chrono::NaiveDate;
use mf_core::units::{FlowRate, Temperature, in_kelvin, in_mlpm};
use mf_mixture::Mixture;

/// A linear calibration taken against one gas at one temperature.
///
/// The curve is `flow = offset + setpoint * slope` with the setpoint a
/// dimensionless fraction of full scale in [0,1].
#[derive(Debug, Clone, PartialEq)]
pub struct LinearCalibration {
    date: NaiveDate,
    gas: Mixture,
    temperature: Temperature,
    offset: FlowRate,
    slope: FlowRate,
}

impl LinearCalibration {
    pub fn new(
        date: NaiveDate,
        gas: Mixture,
        temperature: Temperature,
        offset: FlowRate,
        slope: FlowRate,
    ) -> ControlResult<Self> {
        let kelvin = in_kelvin(temperature);
        if !(kelvin > 0.0) {
            return Err(ControlError::NonPositiveCalibrationTemperature { kelvin });
        }
        let slope_mlpm = in_mlpm(slope);
        if !(slope_mlpm > 0.0) {
            return Err(ControlError::NonPositiveSlope { mlpm: slope_mlpm });
        }
        Ok(Self {
            date,
            gas,
            temperature,
            offset,
            slope,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn gas(&self) -> &Mixture {
        &self.gas
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn offset(&self) -> FlowRate {
        self.offset
    }

    pub fn slope(&self) -> FlowRate {
        self.slope
    }

    /// Curve evaluated in calibration conditions (calibration gas, calibration
    /// temperature).
    fn curve(&self, setpoint: f64) -> FlowRate {
        self.offset + self.slope * setpoint
    }

    /// Inverse of [`curve`](Self::curve), again in calibration conditions.
    fn inverse_curve(&self, flow: FlowRate) -> f64 {
        use uom::si::ratio::ratio;
        ((flow - self.offset) / self.slope).get::<ratio>()
    }
}

/// Calibration curve forms. Every form shares the gas/temperature correction
/// model and differs only in the shape of the setpoint curve.
#[derive(Debug, Clone, PartialEq)]
pub enum Calibration {
    Linear(LinearCalibration),
}

impl Calibration {
    pub fn date(&self) -> NaiveDate {
        match self {
            Calibration::Linear(c) => c.date(),
        }
    }

    pub fn gas(&self) -> &Mixture {
        match self {
            Calibration::Linear(c) => c.gas(),
        }
    }

    pub fn temperature(&self) -> Temperature {
        match self {
            Calibration::Linear(c) => c.temperature(),
        }
    }

    /// Flow rate delivered at `setpoint`, optionally corrected for a process
    /// gas and temperature different from the calibration conditions.
    ///
    /// The gas correction scales by the ratio of conversion factors, the
    /// temperature correction by the ratio of absolute temperatures.
    pub fn setpoint_to_flowrate(
        &self,
        setpoint: f64,
        gas: Option<&Mixture>,
        temperature: Option<Temperature>,
    ) -> ControlResult<FlowRate> {
        if !(0.0..=1.0).contains(&setpoint) {
            return Err(ControlError::SetpointOutOfRange { value: setpoint });
        }
        let (cf_ratio, t_ratio) = self.correction_factors(gas, temperature)?;

        let raw = match self {
            Calibration::Linear(c) => c.curve(setpoint),
        };
        Ok(raw * cf_ratio * t_ratio)
    }

    /// Setpoint needed to deliver `flowrate` of the given gas at the given
    /// temperature. Errors if the flow is negative or outside the range the
    /// device can deliver.
    pub fn flowrate_to_setpoint(
        &self,
        flowrate: FlowRate,
        gas: Option<&Mixture>,
        temperature: Option<Temperature>,
    ) -> ControlResult<f64> {
        let mlpm = in_mlpm(flowrate);
        if !(mlpm >= 0.0) {
            return Err(ControlError::NegativeFlow { mlpm });
        }
        let (cf_ratio, t_ratio) = self.correction_factors(gas, temperature)?;

        // Undo the corrections to recover the flow in calibration conditions
        let in_cal_conditions = flowrate / (cf_ratio * t_ratio);
        let setpoint = match self {
            Calibration::Linear(c) => c.inverse_curve(in_cal_conditions),
        };
        if !(0.0..=1.0).contains(&setpoint) {
            return Err(ControlError::SetpointOutOfRange { value: setpoint });
        }
        Ok(setpoint)
    }

    /// `(cf_ratio, t_ratio)` multipliers taking a flow from calibration
    /// conditions to process conditions.
    fn correction_factors(
        &self,
        gas: Option<&Mixture>,
        temperature: Option<Temperature>,
    ) -> ControlResult<(f64, f64)> {
        let cal_cf = self.gas().conversion_factor()?;
        let gas_cf = match gas {
            Some(gas) => gas.conversion_factor()?,
            None => cal_cf,
        };

        let t = temperature.unwrap_or_else(|| self.temperature());
        let kelvin = in_kelvin(t);
        if !(kelvin >= 0.0) {
            return Err(ControlError::TemperatureBelowZero { kelvin });
        }

        Ok((gas_cf / cal_cf, kelvin / in_kelvin(self.temperature())))
    }
}
