//! UMC Tools module
//!
//! MCP tool implementations for the Universal Measurement Converter.

pub mod conversions;
pub mod status;
