//! Unit-aware text parsing.
//!
//! The boundary between user text and typed quantities. Compositions, CLI
//! arguments and configuration files all carry values like `"21%"`, `"400ppm"`,
//! `"20 degC"` or `"1.5 L/min"`; everything past this module works with uom
//! types or plain fractions.
//!
//! There is deliberately no global unit registry: each quantity family has its
//! own parser with an explicit unit table, and unknown units fail loudly.

use crate::units::{ElectricPotential, FlowRate, Temperature, degc, in_kelvin, k, lpm, mlpm, volts};
use thiserror::Error;
use uom::si::volume_rate::cubic_meter_per_second;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Input text did not parse to a number + optional unit
    #[error("Parse error: could not read a number from '{text}'")]
    Malformed { text: String },

    /// Unit not recognized for this quantity family
    #[error("Unknown unit '{unit}' for {quantity}")]
    UnknownUnit { unit: String, quantity: &'static str },

    /// Value out of physical range (e.g. temperature below absolute zero)
    #[error("Value {value} out of range: {reason}")]
    OutOfRange { value: f64, reason: &'static str },
}

/// Display/serialization unit of a dimensionless fraction.
///
/// A fraction keeps the unit it was written in (`21%` stays percent) so that
/// round-tripping a mixture through YAML/JSON reproduces the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FractionUnit {
    /// Plain ratio, serialized as a bare float
    Ratio,
    /// Percent (1e-2)
    Percent,
    /// Parts per million (1e-6)
    Ppm,
    /// Parts per billion (1e-9)
    Ppb,
}

impl FractionUnit {
    /// Multiplier from display magnitude to base (ratio) value.
    pub fn scale(self) -> f64 {
        match self {
            FractionUnit::Ratio => 1.0,
            FractionUnit::Percent => 1e-2,
            FractionUnit::Ppm => 1e-6,
            FractionUnit::Ppb => 1e-9,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            FractionUnit::Ratio => "",
            FractionUnit::Percent => "%",
            FractionUnit::Ppm => "ppm",
            FractionUnit::Ppb => "ppb",
        }
    }
}

/// Parse a dimensionless fraction, returning display magnitude and unit.
///
/// The base value is `magnitude * unit.scale()`. Anything with a unit outside
/// the dimensionless family (temperatures, flows, ...) is rejected here, which
/// is what makes "fraction required" a construction-time error upstream.
pub fn parse_fraction(raw_text: &str) -> Result<(f64, FractionUnit), ParseError> {
    let (value, unit) = split_value_and_unit(raw_text)?;

    let unit = match unit.to_lowercase().as_str() {
        "" => FractionUnit::Ratio,
        "%" | "percent" => FractionUnit::Percent,
        "ppm" => FractionUnit::Ppm,
        "ppb" => FractionUnit::Ppb,
        _ => {
            return Err(ParseError::UnknownUnit {
                unit: unit.to_string(),
                quantity: "Fraction",
            });
        }
    };

    Ok((value, unit))
}

/// Parse a temperature in K, degC or degF, return a typed temperature.
///
/// A bare number is taken as Kelvin.
pub fn parse_temperature(raw_text: &str) -> Result<Temperature, ParseError> {
    let (value, unit) = split_value_and_unit(raw_text)?;

    let temperature = match unit.to_lowercase().as_str() {
        "" | "k" | "kelvin" => k(value),
        "c" | "°c" | "degc" | "celsius" => degc(value),
        "f" | "°f" | "degf" | "fahrenheit" => {
            use uom::si::thermodynamic_temperature::degree_fahrenheit;
            Temperature::new::<degree_fahrenheit>(value)
        }
        _ => {
            return Err(ParseError::UnknownUnit {
                unit: unit.to_string(),
                quantity: "Temperature",
            });
        }
    };

    let kelvin = in_kelvin(temperature);
    if kelvin < 0.0 {
        return Err(ParseError::OutOfRange {
            value: kelvin,
            reason: "absolute temperature must be >= 0 K",
        });
    }

    Ok(temperature)
}

/// Parse a volumetric flow rate, return a typed flow.
///
/// `sccm` and `slm`/`slpm` are accepted as spellings of ml/min and L/min; a
/// bare number is taken as m^3/s (SI canonical).
pub fn parse_flow_rate(raw_text: &str) -> Result<FlowRate, ParseError> {
    let (value, unit) = split_value_and_unit(raw_text)?;

    let flow = match unit.to_lowercase().as_str() {
        "ml/min" | "sccm" => mlpm(value),
        "l/min" | "slm" | "slpm" => lpm(value),
        "ml/s" => mlpm(value * 60.0),
        "l/s" => lpm(value * 60.0),
        "m3/s" | "m^3/s" | "m³/s" | "" => FlowRate::new::<cubic_meter_per_second>(value),
        _ => {
            return Err(ParseError::UnknownUnit {
                unit: unit.to_string(),
                quantity: "Flow rate",
            });
        }
    };

    Ok(flow)
}

/// Parse an electric potential (analog device ranges); a bare number is volts.
pub fn parse_electric_potential(raw_text: &str) -> Result<ElectricPotential, ParseError> {
    let (value, unit) = split_value_and_unit(raw_text)?;

    let potential = match unit.to_lowercase().as_str() {
        "" | "v" | "volt" | "volts" => volts(value),
        "mv" => volts(value * 1e-3),
        _ => {
            return Err(ParseError::UnknownUnit {
                unit: unit.to_string(),
                quantity: "Electric potential",
            });
        }
    };

    Ok(potential)
}

/// Split a value+unit string into (numeric_value, unit_string).
///
/// Examples:
/// - "21%" -> (21.0, "%")
/// - "1.5 L/min" -> (1.5, "L/min")
/// - "0.79" -> (0.79, "")
fn split_value_and_unit(input: &str) -> Result<(f64, String), ParseError> {
    let trimmed = input.trim();

    // Find where the numeric part ends
    let split_idx = trimmed
        .find(|c: char| !c.is_numeric() && c != '.' && c != '-' && c != '+' && c != 'e' && c != 'E')
        .unwrap_or(trimmed.len());

    let (num_part, unit_part) = trimmed.split_at(split_idx);
    let num_part = num_part.trim();
    let unit_part = unit_part.trim();

    let value: f64 = num_part.parse().map_err(|_| ParseError::Malformed {
        text: input.to_string(),
    })?;

    Ok((value, unit_part.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{in_kelvin, in_mlpm};

    #[test]
    fn fraction_plain() {
        assert_eq!(parse_fraction("0.21").unwrap(), (0.21, FractionUnit::Ratio));
    }

    #[test]
    fn fraction_percent_and_ppm() {
        let (v, u) = parse_fraction("21%").unwrap();
        assert_eq!((v, u), (21.0, FractionUnit::Percent));
        assert_eq!(v * u.scale(), 0.21);

        let (v, u) = parse_fraction("400 ppm").unwrap();
        assert_eq!((v, u), (400.0, FractionUnit::Ppm));
        assert!((v * u.scale() - 4e-4).abs() < 1e-15);
    }

    #[test]
    fn fraction_rejects_dimensioned_input() {
        assert!(matches!(
            parse_fraction("20 degC"),
            Err(ParseError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn fraction_rejects_garbage() {
        assert!(matches!(
            parse_fraction("test"),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn temperature_kelvin_and_celsius() {
        assert_eq!(in_kelvin(parse_temperature("293K").unwrap()), 293.0);
        assert_eq!(in_kelvin(parse_temperature("273").unwrap()), 273.0);
        let t = parse_temperature("20 degC").unwrap();
        assert!((in_kelvin(t) - 293.15).abs() < 1e-9);
    }

    #[test]
    fn temperature_below_absolute_zero() {
        assert!(matches!(
            parse_temperature("-300 degC"),
            Err(ParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn flow_rate_units() {
        assert!((in_mlpm(parse_flow_rate("1.0L/min").unwrap()) - 1000.0).abs() < 1e-9);
        assert!((in_mlpm(parse_flow_rate("10 ml/min").unwrap()) - 10.0).abs() < 1e-9);
        assert!((in_mlpm(parse_flow_rate("300 sccm").unwrap()) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn flow_rate_rejects_wrong_dimension() {
        assert!(matches!(
            parse_flow_rate("10 K"),
            Err(ParseError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn electric_potential_units() {
        use uom::si::electric_potential::volt;
        assert_eq!(parse_electric_potential("5V").unwrap().get::<volt>(), 5.0);
        assert_eq!(
            parse_electric_potential("500 mV").unwrap().get::<volt>(),
            0.5
        );
        assert!(matches!(
            parse_electric_potential("5 K"),
            Err(ParseError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn temperature_fahrenheit() {
        let t = parse_temperature("68 degF").unwrap();
        assert!((in_kelvin(t) - 293.15).abs() < 1e-9);
    }
}
