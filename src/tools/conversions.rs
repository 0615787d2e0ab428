//! Conversion MCP Tools
//!
//! Tools for converting quantities and extending the unit table.

use serde::Serialize;

use crate::conversion::{
    self, decimal, ConversionError, TemperatureScale, UnitCategory, UnitDefinition, UnitTable,
};
use crate::db::Database;
use crate::models::{CustomFactor, CustomUnit};

/// Response for convert_unit and convert_temperature
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub quantity: String,
    pub from: String,
    pub to: String,
    pub from_name: Option<String>,
    pub to_name: Option<String>,
    /// Result with ten fractional digits
    pub result: String,
    /// Result without trailing zeros
    pub display: String,
}

/// Response for get_conversion_factor
#[derive(Debug, Serialize)]
pub struct ConversionFactorResponse {
    pub from: String,
    pub to: String,
    /// Number of `to` units per one `from` unit, null when no path exists
    pub factor: Option<String>,
    /// "identity", "direct" or "inverse"
    pub source: Option<&'static str>,
}

/// Response for get_unit_name
#[derive(Debug, Serialize)]
pub struct UnitNameResponse {
    pub symbol: String,
    pub name: Option<String>,
    pub category: Option<UnitCategory>,
}

/// Prefix entry in list_units
#[derive(Debug, Serialize)]
pub struct PrefixSummary {
    /// Position in the precedence order, starting at 1
    pub order: usize,
    pub symbol: String,
    pub multiplier: String,
}

/// Response for list_units
#[derive(Debug, Serialize)]
pub struct ListUnitsResponse {
    pub units: Vec<UnitDefinition>,
    pub total: usize,
    pub prefixes: Vec<PrefixSummary>,
    pub temperature_scales: Vec<&'static str>,
}

/// Response for register_unit
#[derive(Debug, Serialize)]
pub struct RegisterUnitResponse {
    pub success: bool,
    pub unit: CustomUnit,
}

/// Response for register_conversion_factor
#[derive(Debug, Serialize)]
pub struct RegisterFactorResponse {
    pub success: bool,
    pub factor: CustomFactor,
    /// Derived reciprocal: base units per one target unit
    pub inverse: String,
}

/// Counts of registrations applied at startup
#[derive(Debug, Default, Serialize)]
pub struct LoadSummary {
    pub units_loaded: usize,
    pub factors_loaded: usize,
    pub skipped: Vec<String>,
}

fn format_error(e: ConversionError) -> String {
    e.to_string()
}

/// Convert a quantity between two units of the table
pub fn convert_unit(
    table: &UnitTable,
    quantity: &str,
    from: &str,
    to: &str,
) -> Result<ConvertResponse, String> {
    let result = conversion::convert_str(table, quantity, from, to).map_err(format_error)?;

    let name_of = |unit: &str| {
        let parsed = table.parse_unit(unit)?;
        let name = table.unit_name(&parsed.base_unit)?;
        Some(match parsed.prefix {
            Some(prefix) => format!("{} ({} prefix)", name, prefix),
            None => name.to_string(),
        })
    };

    Ok(ConvertResponse {
        quantity: quantity.trim().to_string(),
        from: from.to_string(),
        to: to.to_string(),
        from_name: name_of(from),
        to_name: name_of(to),
        result: decimal::to_plain_string(&result),
        display: decimal::to_trimmed_string(&result),
    })
}

/// Convert a temperature between C, F and K
pub fn convert_temperature(quantity: &str, from: &str, to: &str) -> Result<ConvertResponse, String> {
    let value = conversion::parse_quantity(quantity).map_err(format_error)?;
    let from_scale: TemperatureScale = from.parse().map_err(format_error)?;
    let to_scale: TemperatureScale = to.parse().map_err(format_error)?;
    let result = conversion::convert_scales(&value, from_scale, to_scale).map_err(format_error)?;

    Ok(ConvertResponse {
        quantity: quantity.trim().to_string(),
        from: from_scale.symbol().to_string(),
        to: to_scale.symbol().to_string(),
        from_name: Some(from_scale.name().to_string()),
        to_name: Some(to_scale.name().to_string()),
        result: decimal::to_plain_string(&result),
        display: decimal::to_trimmed_string(&result),
    })
}

/// Look up the factor between two base units
pub fn get_conversion_factor(table: &UnitTable, from: &str, to: &str) -> ConversionFactorResponse {
    let lookup = table.lookup_factor(from, to);
    if lookup.is_none() {
        tracing::debug!("No factor between '{}' and '{}'", from, to);
    }

    ConversionFactorResponse {
        from: from.to_string(),
        to: to.to_string(),
        factor: lookup
            .as_ref()
            .map(|source| decimal::to_trimmed_string(&source.factor())),
        source: lookup.as_ref().map(|source| source.kind()),
    }
}

/// Look up a unit's name
pub fn get_unit_name(table: &UnitTable, symbol: &str) -> UnitNameResponse {
    let unit = table.unit(symbol);
    UnitNameResponse {
        symbol: symbol.to_string(),
        name: unit.map(|u| u.name.clone()),
        category: unit.map(|u| u.category),
    }
}

/// List units, optionally filtered by category
pub fn list_units(table: &UnitTable, category: Option<&str>) -> Result<ListUnitsResponse, String> {
    let category = match category {
        Some(c) => Some(
            UnitCategory::from_str(c)
                .ok_or_else(|| format!("Unknown category '{}'. Use mass, volume, length, ratio or other.", c))?,
        ),
        None => None,
    };

    let units: Vec<UnitDefinition> = table
        .units()
        .filter(|u| category.map_or(true, |c| u.category == c))
        .cloned()
        .collect();

    let prefixes = table
        .prefixes()
        .iter()
        .enumerate()
        .map(|(i, p)| PrefixSummary {
            order: i + 1,
            symbol: p.symbol.clone(),
            multiplier: decimal::to_trimmed_string(&p.multiplier),
        })
        .collect();

    Ok(ListUnitsResponse {
        total: units.len(),
        units,
        prefixes,
        temperature_scales: vec!["C", "F", "K"],
    })
}

/// Register (or rename) a unit and persist it
pub fn register_unit(
    db: &Database,
    table: &mut UnitTable,
    symbol: &str,
    name: &str,
    category: Option<&str>,
) -> Result<RegisterUnitResponse, String> {
    let symbol = symbol.trim();
    let category = match category {
        Some(c) => UnitCategory::from_str(c).ok_or_else(|| format!("Unknown category '{}'", c))?,
        None => UnitCategory::Other,
    };
    if is_reserved_scale(symbol) {
        return Err(format!("'{}' is reserved for temperature scales", symbol));
    }

    let mut staged = table.clone();
    staged
        .register_unit(symbol, name, category)
        .map_err(format_error)?;
    let stored_name = staged.unit_name(symbol).unwrap_or(symbol).to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let unit = CustomUnit::upsert(&conn, symbol, &stored_name, category)
        .map_err(|e| format!("Failed to save unit: {}", e))?;

    *table = staged;
    tracing::info!("Registered unit '{}' ({})", unit.symbol, unit.name);

    Ok(RegisterUnitResponse { success: true, unit })
}

/// Register a conversion factor and persist it
///
/// `factor` is the number of `target_unit`s per one `base_unit`. A rejected
/// factor leaves both the table and the database untouched.
pub fn register_conversion_factor(
    db: &Database,
    table: &mut UnitTable,
    base_unit: &str,
    target_unit: &str,
    factor: &str,
) -> Result<RegisterFactorResponse, String> {
    let base_unit = base_unit.trim();
    let target_unit = target_unit.trim();
    let factor = factor.trim();
    for symbol in [base_unit, target_unit] {
        if is_reserved_scale(symbol) {
            return Err(format!(
                "'{}' is reserved for temperature scales; use convert_temperature",
                symbol
            ));
        }
    }

    let mut staged = table.clone();
    staged
        .set_conversion_factor(base_unit, target_unit, factor)
        .map_err(format_error)?;
    let inverse = staged
        .conversion_factor(target_unit, base_unit)
        .map(|f| decimal::to_trimmed_string(&f))
        .unwrap_or_default();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    // Endpoints created implicitly are persisted too, so a reload sees the same table
    for symbol in [base_unit, target_unit] {
        if !table.is_known(symbol) {
            CustomUnit::upsert(&conn, symbol, symbol, UnitCategory::Other)
                .map_err(|e| format!("Failed to save unit: {}", e))?;
        }
    }
    let stored = CustomFactor::upsert(&conn, base_unit, target_unit, factor)
        .map_err(|e| format!("Failed to save conversion factor: {}", e))?;

    *table = staged;
    tracing::info!(
        "Registered conversion factor: {} {} per 1 {}",
        stored.factor,
        stored.target_unit,
        stored.base_unit
    );

    Ok(RegisterFactorResponse {
        success: true,
        factor: stored,
        inverse,
    })
}

/// Apply persisted units and factors onto a table
///
/// Units go first so factors referring to them keep their names. Rows that
/// no longer validate are skipped and reported.
pub fn load_registrations(db: &Database, table: &mut UnitTable) -> Result<LoadSummary, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let units = CustomUnit::list(&conn).map_err(|e| format!("Failed to load units: {}", e))?;
    let factors =
        CustomFactor::list(&conn).map_err(|e| format!("Failed to load conversion factors: {}", e))?;

    let mut summary = LoadSummary::default();

    for unit in units {
        match table.register_unit(&unit.symbol, &unit.name, unit.category) {
            Ok(()) => summary.units_loaded += 1,
            Err(e) => {
                tracing::warn!("Skipping stored unit '{}': {}", unit.symbol, e);
                summary.skipped.push(format!("unit {}: {}", unit.symbol, e));
            }
        }
    }

    for f in factors {
        match table.set_conversion_factor(&f.base_unit, &f.target_unit, &f.factor) {
            Ok(()) => summary.factors_loaded += 1,
            Err(e) => {
                tracing::warn!(
                    "Skipping stored factor {} per {}: {}",
                    f.target_unit,
                    f.base_unit,
                    e
                );
                summary
                    .skipped
                    .push(format!("factor {} per {}: {}", f.target_unit, f.base_unit, e));
            }
        }
    }

    tracing::info!(
        "Loaded {} custom units and {} custom conversion factors",
        summary.units_loaded,
        summary.factors_loaded
    );
    Ok(summary)
}

/// C, F and K in either case route to the temperature converter
fn is_reserved_scale(symbol: &str) -> bool {
    conversion::is_temperature_scale(symbol)
}
