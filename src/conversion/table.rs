//! Unit table
//!
//! Holds unit names, prefix multipliers and the conversion-factor graph.
//! The table is a plain value: build it once, extend it explicitly, and pass
//! it by reference to the converter.

use std::collections::{BTreeMap, HashMap};

use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use serde::Serialize;

use super::decimal;
use super::error::{ConversionError, ConversionResult};
use super::units::{UnitCategory, DEFAULT_FACTORS, DEFAULT_PREFIXES, DEFAULT_UNITS};

/// A named unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDefinition {
    pub symbol: String,
    pub name: String,
    pub category: UnitCategory,
}

/// A unit prefix and its multiplier
#[derive(Debug, Clone, PartialEq)]
pub struct Prefix {
    pub symbol: String,
    pub multiplier: BigDecimal,
}

/// A unit string split into its base unit and prefix multiplier
///
/// - "km" -> ParsedUnit { base_unit: "m", prefix: Some("k"), multiplier: 1000 }
/// - "lb" -> ParsedUnit { base_unit: "lb", prefix: None, multiplier: 1 }
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedUnit {
    pub base_unit: String,
    pub prefix: Option<String>,
    pub multiplier: BigDecimal,
}

/// How a factor between two base units was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum FactorSource {
    /// Both sides are the same base unit
    Identity,
    /// Stored edge in the requested direction
    Direct(BigDecimal),
    /// Reciprocal of the edge stored in the opposite direction
    Inverse(BigDecimal),
}

impl FactorSource {
    pub fn factor(&self) -> BigDecimal {
        match self {
            FactorSource::Identity => BigDecimal::one(),
            FactorSource::Direct(f) | FactorSource::Inverse(f) => f.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FactorSource::Identity => "identity",
            FactorSource::Direct(_) => "direct",
            FactorSource::Inverse(_) => "inverse",
        }
    }
}

/// Unit names, prefixes and the conversion-factor graph
#[derive(Debug, Clone, Default)]
pub struct UnitTable {
    names: BTreeMap<String, UnitDefinition>,
    prefixes: Vec<Prefix>,
    /// target -> source -> target units per 1 source unit
    factors: HashMap<String, HashMap<String, BigDecimal>>,
}

impl UnitTable {
    /// A table with no units, prefixes or factors
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in mass, volume and length table
    pub fn standard() -> Self {
        let mut table = Self::empty();

        for (symbol, multiplier) in DEFAULT_PREFIXES {
            if let Err(e) = table.add_prefix(symbol, multiplier) {
                tracing::error!("Skipping default prefix '{}': {}", symbol, e);
            }
        }
        for (symbol, name, category) in DEFAULT_UNITS {
            if let Err(e) = table.register_unit(symbol, name, *category) {
                tracing::error!("Skipping default unit '{}': {}", symbol, e);
            }
        }
        for (target, source, factor) in DEFAULT_FACTORS {
            if let Err(e) = table.set_conversion_factor(source, target, factor) {
                tracing::error!("Skipping default factor {} per {}: {}", target, source, e);
            }
        }

        table
    }

    /// Append a prefix at the end of the precedence order
    pub fn add_prefix(&mut self, symbol: &str, multiplier: &str) -> ConversionResult<()> {
        validate_symbol(symbol)?;
        let multiplier = decimal::parse(multiplier)
            .filter(|m| !m.is_zero())
            .ok_or_else(|| ConversionError::InvalidFactor(multiplier.to_string()))?;

        if let Some(existing) = self.prefixes.iter_mut().find(|p| p.symbol == symbol) {
            existing.multiplier = multiplier;
        } else {
            self.prefixes.push(Prefix {
                symbol: symbol.to_string(),
                multiplier,
            });
        }
        Ok(())
    }

    /// Add a named unit, or rename an existing one
    pub fn register_unit(
        &mut self,
        symbol: &str,
        name: &str,
        category: UnitCategory,
    ) -> ConversionResult<()> {
        validate_symbol(symbol)?;
        let name = name.trim();
        let name = if name.is_empty() { symbol } else { name };

        self.names.insert(
            symbol.to_string(),
            UnitDefinition {
                symbol: symbol.to_string(),
                name: name.to_string(),
                category,
            },
        );
        Ok(())
    }

    /// Store `factor` as the number of `target_unit`s per one `base_unit`
    ///
    /// Overwrites an existing edge in the same direction. Endpoints that have
    /// no name yet are registered under their own symbol. The table is left
    /// untouched when the factor is rejected.
    pub fn set_conversion_factor(
        &mut self,
        base_unit: &str,
        target_unit: &str,
        factor: &str,
    ) -> ConversionResult<()> {
        let value = decimal::parse(factor)
            .filter(|f| !f.is_zero())
            .ok_or_else(|| ConversionError::InvalidFactor(factor.to_string()))?;
        validate_symbol(base_unit)?;
        validate_symbol(target_unit)?;
        if base_unit == target_unit {
            return Err(ConversionError::InvalidFactor(format!(
                "{} ('{}' cannot be converted to itself)",
                factor, base_unit
            )));
        }

        // A prefixed spelling of a known unit would shadow its prefix parsing
        for symbol in [base_unit, target_unit] {
            if self.is_known(symbol) {
                continue;
            }
            if let Some(parsed) = self.parse_unit(symbol) {
                return Err(ConversionError::PrefixedSymbol {
                    symbol: symbol.to_string(),
                    base: parsed.base_unit,
                });
            }
        }

        for symbol in [base_unit, target_unit] {
            if !self.names.contains_key(symbol) {
                tracing::debug!("Registering unnamed unit '{}' from factor", symbol);
                self.register_unit(symbol, symbol, UnitCategory::Other)?;
            }
        }

        self.factors
            .entry(target_unit.to_string())
            .or_default()
            .insert(base_unit.to_string(), value);
        Ok(())
    }

    /// Name of a unit, if it is known
    pub fn unit_name(&self, symbol: &str) -> Option<&str> {
        self.names.get(symbol).map(|u| u.name.as_str())
    }

    pub fn unit(&self, symbol: &str) -> Option<&UnitDefinition> {
        self.names.get(symbol)
    }

    pub fn is_known(&self, symbol: &str) -> bool {
        self.names.contains_key(symbol)
    }

    /// All units ordered by symbol
    pub fn units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.names.values()
    }

    /// Prefixes in precedence order
    pub fn prefixes(&self) -> &[Prefix] {
        &self.prefixes
    }

    pub fn factor_count(&self) -> usize {
        self.factors.values().map(HashMap::len).sum()
    }

    /// Split a unit string into base unit and multiplier
    ///
    /// A known symbol is always a base unit. Otherwise prefixes are tried in
    /// precedence order and the first one leaving a known unit wins, so "mm"
    /// is a millimeter while "mmbbl" falls through to the "mm" prefix.
    pub fn parse_unit(&self, unit: &str) -> Option<ParsedUnit> {
        let unit = unit.trim();

        if self.is_known(unit) {
            return Some(ParsedUnit {
                base_unit: unit.to_string(),
                prefix: None,
                multiplier: BigDecimal::one(),
            });
        }

        self.prefixes.iter().find_map(|prefix| {
            let base = unit.strip_prefix(prefix.symbol.as_str())?;
            if !self.is_known(base) {
                return None;
            }
            Some(ParsedUnit {
                base_unit: base.to_string(),
                prefix: Some(prefix.symbol.clone()),
                multiplier: prefix.multiplier.clone(),
            })
        })
    }

    /// Find the factor converting one base unit into another
    pub fn lookup_factor(&self, from: &str, to: &str) -> Option<FactorSource> {
        if from == to && self.is_known(from) {
            return Some(FactorSource::Identity);
        }

        if let Some(direct) = self.factors.get(to).and_then(|sources| sources.get(from)) {
            return Some(FactorSource::Direct(direct.clone()));
        }

        let stored = self.factors.get(from).and_then(|sources| sources.get(to))?;
        decimal::div(&BigDecimal::one(), stored)
            .ok()
            .map(FactorSource::Inverse)
    }

    /// Number of `to` units per one `from` unit, or `None` when no path exists
    pub fn conversion_factor(&self, from: &str, to: &str) -> Option<BigDecimal> {
        self.lookup_factor(from, to).map(|source| source.factor())
    }
}

fn validate_symbol(symbol: &str) -> ConversionResult<()> {
    if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
        return Err(ConversionError::InvalidSymbol(symbol.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_standard_table_contents() {
        let table = UnitTable::standard();
        assert_eq!(table.units().count(), DEFAULT_UNITS.len());
        assert_eq!(table.prefixes().len(), DEFAULT_PREFIXES.len());
        assert_eq!(table.factor_count(), DEFAULT_FACTORS.len());
        assert_eq!(table.unit_name("gal"), Some("gallon"));
        assert_eq!(table.unit_name("nmi"), Some("nautical mile"));
        assert_eq!(table.unit_name("xyz"), None);
    }

    #[test]
    fn test_parse_base_units() {
        let table = UnitTable::standard();
        let parsed = table.parse_unit("m").unwrap();
        assert_eq!(parsed.base_unit, "m");
        assert_eq!(parsed.prefix, None);
        assert_eq!(parsed.multiplier, dec("1"));

        // Known symbols beginning with a prefix letter are not stripped
        assert_eq!(table.parse_unit("mi").unwrap().base_unit, "mi");
        assert_eq!(table.parse_unit("m^3").unwrap().base_unit, "m^3");
        assert_eq!(table.parse_unit("tonne").unwrap().base_unit, "tonne");
    }

    #[test]
    fn test_parse_prefixed_units() {
        let table = UnitTable::standard();
        let km = table.parse_unit("km").unwrap();
        assert_eq!(km.base_unit, "m");
        assert_eq!(km.prefix.as_deref(), Some("k"));
        assert_eq!(km.multiplier, dec("1000"));

        let mg = table.parse_unit("mg").unwrap();
        assert_eq!(mg.base_unit, "g");
        assert_eq!(mg.multiplier, dec("0.001"));

        assert_eq!(table.parse_unit("ug").unwrap().multiplier, dec("0.000001"));
        assert_eq!(table.parse_unit("Gg").unwrap().multiplier, dec("1000000000"));
    }

    #[test]
    fn test_prefix_precedence() {
        let table = UnitTable::standard();

        // "m" (milli) is declared before "mm" (million)
        let mm = table.parse_unit("mm").unwrap();
        assert_eq!(mm.base_unit, "m");
        assert_eq!(mm.prefix.as_deref(), Some("m"));
        assert_eq!(mm.multiplier, dec("0.001"));

        // "mbbl" is not a unit, so the later "mm" prefix is reached
        let mmbbl = table.parse_unit("mmbbl").unwrap();
        assert_eq!(mmbbl.base_unit, "bbl");
        assert_eq!(mmbbl.prefix.as_deref(), Some("mm"));
        assert_eq!(mmbbl.multiplier, dec("1000000"));

        // "d" leaves "am", so "da" is tried next
        let dam = table.parse_unit("dam").unwrap();
        assert_eq!(dam.base_unit, "m");
        assert_eq!(dam.prefix.as_deref(), Some("da"));

        // Case-sensitive: "M" is mega
        let big = table.parse_unit("Mm").unwrap();
        assert_eq!(big.prefix.as_deref(), Some("M"));
        assert_eq!(big.multiplier, dec("1000000"));
    }

    #[test]
    fn test_parse_unknown_units() {
        let table = UnitTable::standard();
        assert_eq!(table.parse_unit("xyz"), None);
        assert_eq!(table.parse_unit("kxyz"), None);
        assert_eq!(table.parse_unit(""), None);
    }

    #[test]
    fn test_lookup_direct_and_inverse() {
        let table = UnitTable::standard();
        assert_eq!(
            table.lookup_factor("lb", "g"),
            Some(FactorSource::Direct(dec("453.592")))
        );
        assert_eq!(
            table.lookup_factor("g", "lb"),
            Some(FactorSource::Inverse(dec("0.0022046244")))
        );
        assert_eq!(table.lookup_factor("g", "g"), Some(FactorSource::Identity));
        assert_eq!(table.conversion_factor("ft", "in"), Some(dec("12")));
    }

    #[test]
    fn test_lookup_missing_path() {
        let table = UnitTable::standard();
        // Both known, but the graph has no edge between them
        assert_eq!(table.conversion_factor("g", "gal"), None);
        assert_eq!(table.conversion_factor("ppm", "g"), None);
        // Only one hop is followed
        assert_eq!(table.conversion_factor("oz", "g"), None);
        assert_eq!(table.conversion_factor("xyz", "xyz"), None);
    }

    #[test]
    fn test_set_conversion_factor() {
        let mut table = UnitTable::standard();
        table.set_conversion_factor("oz", "g", "28.3495").unwrap();
        assert_eq!(table.conversion_factor("oz", "g"), Some(dec("28.3495")));
        assert_eq!(table.factor_count(), DEFAULT_FACTORS.len() + 1);

        // Overwrite keeps a single edge
        table.set_conversion_factor("oz", "g", "28.35").unwrap();
        assert_eq!(table.conversion_factor("oz", "g"), Some(dec("28.35")));
        assert_eq!(table.factor_count(), DEFAULT_FACTORS.len() + 1);
    }

    #[test]
    fn test_set_conversion_factor_registers_endpoints() {
        let mut table = UnitTable::empty();
        table.set_conversion_factor("cup", "tbsp", "16").unwrap();
        assert!(table.is_known("cup"));
        assert_eq!(table.unit("tbsp").unwrap().category, UnitCategory::Other);
        assert_eq!(table.conversion_factor("tbsp", "cup"), Some(dec("0.0625")));
    }

    #[test]
    fn test_invalid_factor_leaves_table_unchanged() {
        let mut table = UnitTable::standard();
        let result = table.set_conversion_factor("g", "oz", "not-a-number");
        assert_eq!(
            result,
            Err(ConversionError::InvalidFactor("not-a-number".to_string()))
        );
        assert_eq!(table.factor_count(), DEFAULT_FACTORS.len());
        assert_eq!(table.conversion_factor("g", "oz"), None);

        assert!(table.set_conversion_factor("g", "oz", "0").is_err());
        assert!(table.set_conversion_factor("g", "g", "1").is_err());
        assert!(table.set_conversion_factor("new unit", "g", "2").is_err());
        assert!(!table.is_known("new unit"));
        assert_eq!(table.factor_count(), DEFAULT_FACTORS.len());
    }

    #[test]
    fn test_factor_on_prefixed_symbol_rejected() {
        let mut table = UnitTable::standard();
        let result = table.set_conversion_factor("kg", "lb", "2.20462");
        assert_eq!(
            result,
            Err(ConversionError::PrefixedSymbol {
                symbol: "kg".to_string(),
                base: "g".to_string(),
            })
        );
        assert!(!table.is_known("kg"));
        assert_eq!(table.factor_count(), DEFAULT_FACTORS.len());

        let kg = table.parse_unit("kg").unwrap();
        assert_eq!(kg.base_unit, "g");
        assert_eq!(kg.multiplier, dec("1000"));

        // Registered explicitly, the symbol stands on its own
        table.register_unit("kg", "kilogram", UnitCategory::Mass).unwrap();
        table.set_conversion_factor("kg", "lb", "2.20462").unwrap();
        assert_eq!(table.conversion_factor("kg", "lb"), Some(dec("2.20462")));
    }

    #[test]
    fn test_exponent_factor_rejected() {
        let mut table = UnitTable::standard();
        assert_eq!(
            table.set_conversion_factor("oz", "g", "1e999999999999"),
            Err(ConversionError::InvalidFactor("1e999999999999".to_string()))
        );
        assert_eq!(table.conversion_factor("oz", "g"), None);
    }

    #[test]
    fn test_register_unit_enables_prefixes() {
        let mut table = UnitTable::standard();
        assert_eq!(table.parse_unit("kcal"), None);
        table.register_unit("cal", "calorie", UnitCategory::Other).unwrap();
        let kcal = table.parse_unit("kcal").unwrap();
        assert_eq!(kcal.base_unit, "cal");
        assert_eq!(kcal.multiplier, dec("1000"));

        // Blank names fall back to the symbol
        table.register_unit("J", "  ", UnitCategory::Other).unwrap();
        assert_eq!(table.unit_name("J"), Some("J"));
    }

    #[test]
    fn test_custom_prefix_order() {
        let mut table = UnitTable::empty();
        table.register_unit("x", "ex", UnitCategory::Other).unwrap();
        table.register_unit("ax", "ax", UnitCategory::Other).unwrap();
        table.add_prefix("a", "2").unwrap();
        table.add_prefix("aa", "3").unwrap();

        // "aax": "a" leaves "ax", a known unit, so the later "aa" never applies
        let parsed = table.parse_unit("aax").unwrap();
        assert_eq!(parsed.base_unit, "ax");
        assert_eq!(parsed.multiplier, dec("2"));

        assert!(table.add_prefix("z", "0").is_err());
    }
}
