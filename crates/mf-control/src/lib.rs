//! mf-control: mass-flow-controller calibrations.
//!
//! Maps a dimensionless setpoint in [0,1] to a calibrated flow rate and back.
//! A calibration is taken against one gas at one temperature; evaluating it for
//! a different gas or temperature rescales by the conversion-factor ratio and
//! the absolute-temperature ratio. Only the linear curve form
//! (`flow = offset + setpoint * slope`) exists today; the `Calibration` variant
//! enum leaves room for non-linear forms without inheritance games.

pub mod calibration;
pub mod error;
pub mod mfc;

pub use calibration::{Calibration, LinearCalibration};
pub use error::{ControlError, ControlResult};
pub use mfc::{CalibrationSelector, DeviceBinding, Mfc, MfcInfo};
