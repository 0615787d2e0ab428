//! Unit conversion functions
//!
//! Converts quantities between units of a [`UnitTable`].

use bigdecimal::BigDecimal;

use super::decimal;
use super::error::{ConversionError, ConversionResult};
use super::table::{ParsedUnit, UnitTable};

/// Parse a quantity string into a decimal
pub fn parse_quantity(input: &str) -> ConversionResult<BigDecimal> {
    decimal::parse(input).ok_or_else(|| ConversionError::InvalidQuantity(input.to_string()))
}

fn parse_known_unit(table: &UnitTable, unit: &str) -> ConversionResult<ParsedUnit> {
    table
        .parse_unit(unit)
        .ok_or_else(|| ConversionError::UnknownUnit(unit.to_string()))
}

/// Convert a quantity from one unit to another
///
/// The result is `quantity x factor x (from multiplier / to multiplier)`,
/// truncated to ten fractional digits after each step.
///
/// Examples:
/// - convert(1000, "m", "km") -> 1
/// - convert(2, "lb", "g") -> 907.184
/// - convert(1, "g", "gal") -> NoConversionPath
pub fn convert(
    table: &UnitTable,
    quantity: &BigDecimal,
    from: &str,
    to: &str,
) -> ConversionResult<BigDecimal> {
    let from_unit = parse_known_unit(table, from)?;
    let to_unit = parse_known_unit(table, to)?;

    let factor = table
        .conversion_factor(&from_unit.base_unit, &to_unit.base_unit)
        .ok_or_else(|| {
            tracing::warn!(
                "No conversion factor between '{}' and '{}'",
                from_unit.base_unit,
                to_unit.base_unit
            );
            ConversionError::NoConversionPath {
                from: from.to_string(),
                to: to.to_string(),
            }
        })?;

    let base_quantity = decimal::mul(&factor, quantity);
    let multiplier_ratio = decimal::div(&from_unit.multiplier, &to_unit.multiplier)?;
    let result = decimal::mul(&base_quantity, &multiplier_ratio);

    tracing::debug!("Converted {} {} -> {} {}", quantity, from, result, to);
    Ok(result)
}

/// Convert a quantity given as a string
pub fn convert_str(
    table: &UnitTable,
    quantity: &str,
    from: &str,
    to: &str,
) -> ConversionResult<BigDecimal> {
    let quantity = parse_quantity(quantity)?;
    convert(table, &quantity, from, to)
}
