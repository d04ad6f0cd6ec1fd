//! Calibration and device errors.

use mf_mixture::MixtureError;
use thiserror::Error;

pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    /// Setpoint outside [0,1]. On the inverse path this signals an
    /// unachievable flow request, never a silent clamp.
    #[error("Setpoint {value} outside the valid range [0, 1]")]
    SetpointOutOfRange { value: f64 },

    #[error("Flow rate must be non-negative, got {mlpm} ml/min")]
    NegativeFlow { mlpm: f64 },

    #[error("Temperature must be >= 0 K, got {kelvin} K")]
    TemperatureBelowZero { kelvin: f64 },

    #[error("Calibration slope must be positive, got {mlpm} ml/min")]
    NonPositiveSlope { mlpm: f64 },

    #[error("Calibration temperature must be > 0 K, got {kelvin} K")]
    NonPositiveCalibrationTemperature { kelvin: f64 },

    #[error("MFC '{name}' has no calibrations")]
    NoCalibrations { name: String },

    #[error("Calibration index {index} out of range for MFC '{name}' ({len} calibrations)")]
    CalibrationIndexOob {
        name: String,
        index: usize,
        len: usize,
    },

    #[error("Unknown calibration selector '{text}' (expected 'latest' or an index)")]
    BadSelector { text: String },

    /// Conversion-factor lookup failures while correcting for a gas.
    #[error("Mixture error: {0}")]
    Mixture(#[from] MixtureError),
}
