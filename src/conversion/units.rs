//! Unit symbols, categories and the default conversion data
//!
//! Factors are written as decimal strings and read like
//! "{target} per 1 {source}".

use serde::{Deserialize, Serialize};

/// Kind of quantity a unit measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    /// Mass units (g, oz, lb, t)
    Mass,
    /// Volume units (gal, L, bbl, ft^3)
    Volume,
    /// Length units (m, in, ft, mi)
    Length,
    /// Dimensionless ratios (ppm)
    Ratio,
    /// Units registered at runtime without a known category
    Other,
}

impl UnitCategory {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mass" | "weight" => Some(UnitCategory::Mass),
            "volume" => Some(UnitCategory::Volume),
            "length" | "distance" => Some(UnitCategory::Length),
            "ratio" => Some(UnitCategory::Ratio),
            "other" => Some(UnitCategory::Other),
            _ => None,
        }
    }

    /// Convert to database string
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitCategory::Mass => "mass",
            UnitCategory::Volume => "volume",
            UnitCategory::Length => "length",
            UnitCategory::Ratio => "ratio",
            UnitCategory::Other => "other",
        }
    }
}

// ============================================================================
// Prefix Symbols
// ============================================================================

pub const DECI: &str = "d";
pub const CENTI: &str = "c";
pub const MILLI: &str = "m";
pub const MICRO: &str = "u";
pub const NANO: &str = "n";
pub const DEKA: &str = "da";
pub const HECTO: &str = "h";
pub const KILO: &str = "k";
pub const MEGA: &str = "M";
pub const GIGA: &str = "G";
/// Billion, as in "Bcf"
pub const BILLION: &str = "B";
/// Million in oil-field notation, as in "mmbbl"
pub const MILLION_MM: &str = "mm";

// ============================================================================
// Mass Symbols
// ============================================================================

pub const GRAM: &str = "g";
pub const OUNCE: &str = "oz";
pub const POUND: &str = "lb";
/// Short ton (2000 lb)
pub const TON: &str = "t";
/// Metric ton
pub const TONNE: &str = "tonne";

// ============================================================================
// Volume Symbols
// ============================================================================

/// US gallon
pub const GALLON: &str = "gal";
pub const IMPERIAL_GALLON: &str = "igal";
pub const LITER: &str = "L";
/// Oil barrel (42 US gallons)
pub const BARREL: &str = "bbl";
pub const CUBIC_INCH: &str = "in^3";
pub const CUBIC_FOOT: &str = "ft^3";
pub const CUBIC_METER: &str = "m^3";

// ============================================================================
// Length Symbols
// ============================================================================

pub const METER: &str = "m";
pub const INCH: &str = "in";
pub const FOOT: &str = "ft";
pub const YARD: &str = "yd";
pub const MILE: &str = "mi";
pub const NAUTICAL_MILE: &str = "nmi";

pub const PARTS_PER_MILLION: &str = "ppm";

// ============================================================================
// Default Tables
// ============================================================================

/// Prefixes in precedence order: earlier entries are tried first
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    (DECI, "0.1"),
    (CENTI, "0.01"),
    (MILLI, "0.001"),
    (MICRO, "0.000001"),
    (NANO, "0.000000001"),
    (DEKA, "10"),
    (HECTO, "100"),
    (KILO, "1000"),
    (MEGA, "1000000"),
    (GIGA, "1000000000"),
    (BILLION, "1000000000"),
    (MILLION_MM, "1000000"),
];

/// Named units: (symbol, name, category)
pub const DEFAULT_UNITS: &[(&str, &str, UnitCategory)] = &[
    (GRAM, "gram", UnitCategory::Mass),
    (OUNCE, "ounce", UnitCategory::Mass),
    (POUND, "pound", UnitCategory::Mass),
    (TON, "ton", UnitCategory::Mass),
    (TONNE, "tonne", UnitCategory::Mass),
    (GALLON, "gallon", UnitCategory::Volume),
    (IMPERIAL_GALLON, "imperial gallon", UnitCategory::Volume),
    (LITER, "liter", UnitCategory::Volume),
    (BARREL, "barrel", UnitCategory::Volume),
    (CUBIC_INCH, "cubic inch", UnitCategory::Volume),
    (CUBIC_FOOT, "cubic foot", UnitCategory::Volume),
    (CUBIC_METER, "cubic meter", UnitCategory::Volume),
    (METER, "meter", UnitCategory::Length),
    (INCH, "inch", UnitCategory::Length),
    (FOOT, "foot", UnitCategory::Length),
    (YARD, "yard", UnitCategory::Length),
    (MILE, "mile", UnitCategory::Length),
    (NAUTICAL_MILE, "nautical mile", UnitCategory::Length),
    (PARTS_PER_MILLION, "parts per million", UnitCategory::Ratio),
];

/// Conversion edges: (target, source, target units per 1 source unit)
pub const DEFAULT_FACTORS: &[(&str, &str, &str)] = &[
    // Mass
    (GRAM, POUND, "453.592"),
    (GRAM, TON, "907185"),
    (GRAM, TONNE, "1000000"),
    (OUNCE, POUND, "16"),
    (OUNCE, TON, "32000"),
    (OUNCE, TONNE, "35274"),
    (POUND, TON, "2000"),
    (POUND, TONNE, "2204.62"),
    (TON, TONNE, "1.10231"),
    // Volume
    (GALLON, IMPERIAL_GALLON, "1.20095"),
    (GALLON, LITER, "0.264172"),
    (GALLON, BARREL, "42"),
    (GALLON, CUBIC_INCH, "0.004329"),
    (GALLON, CUBIC_FOOT, "0.133681"),
    (GALLON, CUBIC_METER, "264.172"),
    (LITER, IMPERIAL_GALLON, "4.54609"),
    (CUBIC_INCH, CUBIC_FOOT, "1728"),
    (CUBIC_INCH, CUBIC_METER, "61023.7"),
    (CUBIC_FOOT, CUBIC_METER, "35.3147"),
    // Length
    (INCH, FOOT, "12"),
    (INCH, YARD, "36"),
    (INCH, MILE, "63360"),
    (INCH, NAUTICAL_MILE, "72913.4"),
    (FOOT, YARD, "3"),
    (FOOT, MILE, "5280"),
    (FOOT, NAUTICAL_MILE, "6076.12"),
    (METER, INCH, "0.0254"),
    (METER, FOOT, "0.3048"),
    (METER, YARD, "0.9144"),
    (METER, MILE, "1609.34"),
    (METER, NAUTICAL_MILE, "1852"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::decimal;

    #[test]
    fn test_category_round_trip() {
        for category in [
            UnitCategory::Mass,
            UnitCategory::Volume,
            UnitCategory::Length,
            UnitCategory::Ratio,
            UnitCategory::Other,
        ] {
            assert_eq!(UnitCategory::from_str(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(UnitCategory::from_str("Weight"), Some(UnitCategory::Mass));
        assert_eq!(UnitCategory::from_str(" distance "), Some(UnitCategory::Length));
        assert_eq!(UnitCategory::from_str("temperature"), None);
    }

    #[test]
    fn test_default_factors_are_numeric() {
        for (target, source, factor) in DEFAULT_FACTORS {
            assert!(decimal::is_numeric(factor), "{} per {} is not numeric", target, source);
        }
        for (symbol, multiplier) in DEFAULT_PREFIXES {
            assert!(decimal::is_numeric(multiplier), "prefix {} is not numeric", symbol);
        }
    }

    #[test]
    fn test_every_factor_unit_is_named() {
        let named: Vec<&str> = DEFAULT_UNITS.iter().map(|(symbol, _, _)| *symbol).collect();
        for (target, source, _) in DEFAULT_FACTORS {
            assert!(named.contains(target), "{} has no name", target);
            assert!(named.contains(source), "{} has no name", source);
        }
    }
}
