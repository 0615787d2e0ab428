//! Temperature conversion between Celsius, Fahrenheit and Kelvin
//!
//! Temperatures need offsets as well as factors, so they do not go through
//! the unit table.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::decimal;
use super::error::{ConversionError, ConversionResult};

/// A temperature scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureScale {
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "K")]
    Kelvin,
}

impl TemperatureScale {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "C",
            TemperatureScale::Fahrenheit => "F",
            TemperatureScale::Kelvin => "K",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "Celsius",
            TemperatureScale::Fahrenheit => "Fahrenheit",
            TemperatureScale::Kelvin => "Kelvin",
        }
    }
}

impl FromStr for TemperatureScale {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "C" => Ok(TemperatureScale::Celsius),
            "F" => Ok(TemperatureScale::Fahrenheit),
            "K" => Ok(TemperatureScale::Kelvin),
            _ => Err(ConversionError::UnsupportedScale(s.to_string())),
        }
    }
}

impl fmt::Display for TemperatureScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Whether a string names one of the supported scales
pub fn is_temperature_scale(s: &str) -> bool {
    s.parse::<TemperatureScale>().is_ok()
}

fn constant(value: u32) -> BigDecimal {
    BigDecimal::from(value)
}

/// 273.15, the Celsius offset of absolute zero
fn kelvin_offset() -> BigDecimal {
    BigDecimal::new(27315.into(), 2)
}

/// Convert between two scales
///
/// Same-scale conversions return the quantity unchanged (at working scale)
/// instead of running a formula that may not round-trip.
pub fn convert_scales(
    quantity: &BigDecimal,
    from: TemperatureScale,
    to: TemperatureScale,
) -> ConversionResult<BigDecimal> {
    use TemperatureScale::*;

    let thirty_two = constant(32);
    let five = constant(5);
    let nine = constant(9);

    let result = match (from, to) {
        (Fahrenheit, Celsius) => {
            decimal::div(&decimal::mul(&decimal::sub(quantity, &thirty_two), &five), &nine)?
        }
        (Fahrenheit, Kelvin) => {
            let celsius =
                decimal::div(&decimal::mul(&decimal::sub(quantity, &thirty_two), &five), &nine)?;
            decimal::add(&celsius, &kelvin_offset())
        }
        (Celsius, Fahrenheit) => {
            decimal::add(&decimal::div(&decimal::mul(quantity, &nine), &five)?, &thirty_two)
        }
        (Celsius, Kelvin) => decimal::add(quantity, &kelvin_offset()),
        (Kelvin, Celsius) => decimal::sub(quantity, &kelvin_offset()),
        (Kelvin, Fahrenheit) => {
            let ratio = decimal::div(&nine, &five)?;
            let celsius = decimal::sub(quantity, &kelvin_offset());
            decimal::add(&decimal::mul(&celsius, &ratio), &thirty_two)
        }
        (Celsius, Celsius) | (Fahrenheit, Fahrenheit) | (Kelvin, Kelvin) => {
            decimal::rescale(quantity)
        }
    };

    tracing::debug!("Converted {} {} -> {} {}", quantity, from, result, to);
    Ok(result)
}

/// Convert a temperature given scale symbols ("C", "f", "K", ...)
///
/// The source scale is validated first, so an error names it when both are bad.
pub fn convert_temperature(
    quantity: &BigDecimal,
    from: &str,
    to: &str,
) -> ConversionResult<BigDecimal> {
    let from: TemperatureScale = from.parse()?;
    let to: TemperatureScale = to.parse()?;
    convert_scales(quantity, from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn temp(q: &str, from: &str, to: &str) -> BigDecimal {
        convert_temperature(&dec(q), from, to).unwrap()
    }

    #[test]
    fn test_fixed_points() {
        assert_eq!(temp("0", "C", "F"), dec("32"));
        assert_eq!(temp("32", "F", "C"), dec("0"));
        assert_eq!(temp("0", "C", "K"), dec("273.15"));
        assert_eq!(temp("212", "F", "K"), dec("373.15"));
        assert_eq!(temp("100", "C", "F"), dec("212"));
        assert_eq!(temp("373.15", "K", "F"), dec("212"));
        assert_eq!(temp("273.15", "K", "C"), dec("0"));
        assert_eq!(temp("-40", "C", "F"), dec("-40"));
        assert_eq!(temp("-40", "F", "C"), dec("-40"));
    }

    #[test]
    fn test_truncating_division() {
        // (100 - 32) * 5 / 9 = 37.777...
        assert_eq!(temp("100", "F", "C"), dec("37.7777777777"));
    }

    #[test]
    fn test_case_insensitive_scales() {
        assert_eq!(temp("0", "c", "k"), dec("273.15"));
        assert_eq!(temp("32", "f", "C"), dec("0"));
    }

    #[test]
    fn test_same_scale_short_circuits() {
        assert_eq!(temp("21.5", "C", "C"), dec("21.5"));
        assert_eq!(temp("0.123456789012", "K", "k"), dec("0.1234567890"));
    }

    #[test]
    fn test_large_quantity_truncates() {
        let quantity = format!("1{}", "0".repeat(120));
        let expected = format!("{}37.{}", "5".repeat(118), "7".repeat(10));
        assert_eq!(temp(&quantity, "F", "C"), dec(&expected));
    }

    #[test]
    fn test_unsupported_scale() {
        assert_eq!(
            convert_temperature(&dec("1"), "R", "C"),
            Err(ConversionError::UnsupportedScale("R".to_string()))
        );
        assert_eq!(
            convert_temperature(&dec("1"), "C", "Rankine"),
            Err(ConversionError::UnsupportedScale("Rankine".to_string()))
        );
        // Source is reported when both are unknown
        assert_eq!(
            convert_temperature(&dec("1"), "X", "Y"),
            Err(ConversionError::UnsupportedScale("X".to_string()))
        );
    }

    #[test]
    fn test_scale_parsing() {
        assert!(is_temperature_scale("k"));
        assert!(!is_temperature_scale("kg"));
        assert_eq!("F".parse::<TemperatureScale>().unwrap().name(), "Fahrenheit");
        assert_eq!(TemperatureScale::Kelvin.to_string(), "K");
    }
}
