//! UMC MCP Server Implementation
//!
//! Implements the MCP server with all UMC tools.

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::conversion::UnitTable;
use crate::db::Database;
use crate::tools::conversions;
use crate::tools::status::StatusTracker;

/// UMC MCP Service
#[derive(Clone)]
pub struct UmcService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    /// Shared unit table; registration tools take the write lock
    table: Arc<RwLock<UnitTable>>,
    tool_router: ToolRouter<UmcService>,
}

impl UmcService {
    pub fn new(database_path: PathBuf, database: Database, table: UnitTable) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            table: Arc::new(RwLock::new(table)),
            tool_router: Self::tool_router(),
        }
    }

    fn read_table(&self) -> Result<RwLockReadGuard<'_, UnitTable>, McpError> {
        self.table
            .read()
            .map_err(|_| McpError::internal_error("Unit table lock poisoned", None))
    }

    fn write_table(&self) -> Result<RwLockWriteGuard<'_, UnitTable>, McpError> {
        self.table
            .write()
            .map_err(|_| McpError::internal_error("Unit table lock poisoned", None))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Conversion Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertUnitParams {
    /// Quantity as a decimal string, e.g. "2.5"
    pub quantity: String,
    /// Unit of the quantity, optionally prefixed (e.g. "kg", "mi", "mmbbl")
    pub from: String,
    /// Unit to convert to
    pub to: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertTemperatureParams {
    /// Temperature as a decimal string, e.g. "-40"
    pub quantity: String,
    /// Source scale: C, F or K
    pub from: String,
    /// Target scale: C, F or K
    pub to: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetConversionFactorParams {
    /// Unprefixed unit to convert from
    pub from: String,
    /// Unprefixed unit to convert to
    pub to: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListUnitsParams {
    /// Only list one category: mass, volume, length, ratio or other
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetUnitNameParams {
    /// Unit symbol (case-sensitive)
    pub symbol: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RegisterUnitParams {
    /// New unit symbol, no whitespace (e.g. "st")
    pub symbol: String,
    /// Human-readable name (e.g. "stone")
    pub name: String,
    /// mass, volume, length, ratio or other (default other)
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RegisterConversionFactorParams {
    /// Unit being converted from (e.g. "st")
    pub base_unit: String,
    /// Unit being converted to (e.g. "lb")
    pub target_unit: String,
    /// Number of target units in one base unit, as a decimal string (e.g. "14")
    pub factor: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl UmcService {
    // --- Status ---

    #[tool(description = "Get the current status of the UMC service including build info, unit table size, database status, and process information")]
    async fn umc_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = {
            let table = self.read_table()?;
            tracker.get_status(&table)
        };
        to_json(&status)
    }

    #[tool(description = "Get instructions for converting units and temperatures, including unit symbols and prefix rules. Call this before the first conversion in a session.")]
    fn conversion_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CONVERSION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CONVERSION_INSTRUCTIONS)]))
    }

    // --- Conversions ---

    #[tool(description = "Convert a quantity between two mass, volume or length units using exact decimal arithmetic. Units may carry a prefix (kg, mL, mmbbl).")]
    fn convert_unit(&self, Parameters(p): Parameters<ConvertUnitParams>) -> Result<CallToolResult, McpError> {
        let table = self.read_table()?;
        let result = conversions::convert_unit(&table, &p.quantity, &p.from, &p.to)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Convert a temperature between Celsius (C), Fahrenheit (F) and Kelvin (K)")]
    fn convert_temperature(&self, Parameters(p): Parameters<ConvertTemperatureParams>) -> Result<CallToolResult, McpError> {
        let result = conversions::convert_temperature(&p.quantity, &p.from, &p.to)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the conversion factor between two unprefixed units (number of 'to' units per one 'from' unit). Returns null when no conversion is defined.")]
    fn get_conversion_factor(&self, Parameters(p): Parameters<GetConversionFactorParams>) -> Result<CallToolResult, McpError> {
        let table = self.read_table()?;
        to_json(&conversions::get_conversion_factor(&table, &p.from, &p.to))
    }

    // --- Unit Table ---

    #[tool(description = "List known units with names and categories, plus unit prefixes in the order they are tried")]
    fn list_units(&self, Parameters(p): Parameters<ListUnitsParams>) -> Result<CallToolResult, McpError> {
        let table = self.read_table()?;
        let result = conversions::list_units(&table, p.category.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get the human-readable name of a unit symbol. Returns null for unknown symbols.")]
    fn get_unit_name(&self, Parameters(p): Parameters<GetUnitNameParams>) -> Result<CallToolResult, McpError> {
        let table = self.read_table()?;
        to_json(&conversions::get_unit_name(&table, &p.symbol))
    }

    #[tool(description = "Register a new unit (or rename an existing one). The unit is saved and available after restart.")]
    fn register_unit(&self, Parameters(p): Parameters<RegisterUnitParams>) -> Result<CallToolResult, McpError> {
        let mut table = self.write_table()?;
        let result = conversions::register_unit(&self.database, &mut table, &p.symbol, &p.name, p.category.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Register a conversion factor: the number of target units in one base unit. Overwrites an existing factor for the same direction. Unknown units are created. Saved across restarts.")]
    fn register_conversion_factor(&self, Parameters(p): Parameters<RegisterConversionFactorParams>) -> Result<CallToolResult, McpError> {
        let mut table = self.write_table()?;
        let result = conversions::register_conversion_factor(&self.database, &mut table, &p.base_unit, &p.target_unit, &p.factor)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for UmcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "umc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Universal Measurement Converter".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Universal Measurement Converter (UMC) - exact decimal unit and temperature conversion. \
                 IMPORTANT: Call conversion_instructions before converting. \
                 Convert: convert_unit (mass, volume, length, prefixed units), convert_temperature (C/F/K). \
                 Lookup: get_conversion_factor, list_units, get_unit_name. \
                 Extend: register_unit, register_conversion_factor (persisted). \
                 Quantities and factors are decimal strings. Status: umc_status."
                    .into(),
            ),
        }
    }
}
