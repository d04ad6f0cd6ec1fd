//! mf-core: stable foundation for mixflow.
//!
//! Contains:
//! - units (uom SI types + constructors for temperatures, flow rates, voltages)
//! - parse (text -> quantity boundary: "21%", "400ppm", "20 degC", "1.5 L/min")
//! - numeric (Real + tolerances + float helpers)

pub mod numeric;
pub mod parse;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use numeric::*;
pub use parse::{
    FractionUnit, ParseError, parse_electric_potential, parse_flow_rate, parse_fraction,
    parse_temperature,
};
pub use units::*;
