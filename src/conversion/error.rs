//! Conversion error types

use thiserror::Error;

/// Errors raised while parsing units or converting quantities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("No conversion available from '{from}' to '{to}'")]
    NoConversionPath { from: String, to: String },

    #[error("Unknown temperature unit '{0}'")]
    UnsupportedScale(String),

    #[error("Conversion factor must be a non-zero number, given: {0}")]
    InvalidFactor(String),

    #[error("Quantity must be numeric, given: {0}")]
    InvalidQuantity(String),

    #[error("Invalid unit symbol '{0}'")]
    InvalidSymbol(String),

    #[error("'{symbol}' is '{base}' with a prefix; register '{symbol}' as a unit before giving it factors")]
    PrefixedSymbol { symbol: String, base: String },

    #[error("Division by zero")]
    DivisionByZero,
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;
