//! UMC Status Tool
//!
//! Provides runtime status information about the UMC service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::conversion::UnitTable;

/// Conversion instructions for AI assistants
pub const CONVERSION_INSTRUCTIONS: &str = r#"
# UMC Conversion Instructions

The Universal Measurement Converter converts quantities with exact decimal
arithmetic. Every result carries ten fractional digits and is truncated, never
rounded, at each step.

## Quantities

Always pass quantities as plain decimal strings: `"2.5"`, `"-40"`, `"1000"`.
Exponent notation such as `"1e3"` is rejected. Do not pre-round.

## Units

| Category | Symbols |
|----------|---------|
| Mass | g, oz, lb, t (short ton), tonne |
| Volume | gal, igal, L, bbl, in^3, ft^3, m^3 |
| Length | m, in, ft, yd, mi, nmi |
| Ratio | ppm |

Symbols are case-sensitive: `L` is liter, `M` is the mega prefix, `m` is meter
or the milli prefix.

## Prefixes

Any unit can take one prefix. Prefixes are tried in this order and the first
one that leaves a known unit wins:

d (0.1), c (0.01), m (0.001), u (0.000001), n (0.000000001), da (10),
h (100), k (1000), M (1000000), G (1000000000), B (1000000000), mm (1000000)

- `mm` is a millimeter, because `m` is tried before `mm`.
- `mmbbl` is a million barrels, because `mbbl` is not a unit.
- A whole symbol that is already a unit is never split: `mi` is a mile.

Prefixes scale linearly. `cm^3` is 0.01 cubic meters, not a cubic centimeter.

## Tools

1. **convert_unit**: `quantity`, `from`, `to`. Mass, volume and length.
2. **convert_temperature**: `quantity`, `from`, `to` with scales C, F, K
   (case-insensitive).
3. **get_conversion_factor**: factor between two unprefixed units, or null.
4. **list_units**: every unit, optionally filtered by `category`, plus the
   prefix order.
5. **register_unit**: add or rename a unit (`symbol`, `name`, `category`).
6. **register_conversion_factor**: `base_unit`, `target_unit`, `factor`,
   where factor is the number of target units in ONE base unit.
   Example: base `st`, target `lb`, factor `"14"` (14 pounds per stone).

Only one edge is stored per pair; the reverse direction is derived.
Conversions follow a single edge, so register a direct factor for any pair you
need (oz to g is not derived through lb).

## Errors

- Unknown unit: the symbol is not in the table even after removing a prefix.
- No conversion available: both units exist but no edge joins them.
- Unknown temperature unit: the scale is not C, F or K.
- Conversion factor must be a non-zero number: the factor did not parse.
- "'kg' is 'g' with a prefix": a factor was given for a prefixed spelling.
  Register the symbol with register_unit first if it really is its own unit.
"#;

/// Service status snapshot
#[derive(Debug, Serialize)]
pub struct UmcStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub unit_count: usize,
    pub prefix_count: usize,
    pub factor_count: usize,
    pub checked_at: String,
}

/// Tracks service start time and reports status
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, table: &UnitTable) -> UmcStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        UmcStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            unit_count: table.units().count(),
            prefix_count: table.prefixes().len(),
            factor_count: table.factor_count(),
            checked_at: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts_table() {
        let tracker = StatusTracker::new(PathBuf::from("does-not-exist.db"));
        let table = UnitTable::standard();
        let status = tracker.get_status(&table);

        assert_eq!(status.unit_count, table.units().count());
        assert_eq!(status.factor_count, table.factor_count());
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
    }
}
