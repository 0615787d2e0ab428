//! Universal Measurement Converter (UMC) Library
//!
//! Exact decimal unit and temperature conversion.

pub mod build_info;
pub mod config;
pub mod conversion;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
