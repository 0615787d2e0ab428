//! Conversion module
//!
//! Exact-decimal conversion between mass, volume and length units, and
//! between temperature scales.

pub mod converter;
pub mod decimal;
pub mod error;
pub mod table;
pub mod temperature;
pub mod units;

pub use converter::{convert, convert_str, parse_quantity};
pub use error::{ConversionError, ConversionResult};
pub use table::{FactorSource, ParsedUnit, Prefix, UnitDefinition, UnitTable};
pub use temperature::{convert_scales, convert_temperature, is_temperature_scale, TemperatureScale};
pub use units::UnitCategory;
