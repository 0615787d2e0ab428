//! Fixed-scale decimal arithmetic
//!
//! Every operation truncates its result toward zero at [`SCALE`] fractional
//! digits, so repeated conversions give identical strings on every platform.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::Zero;

use super::error::{ConversionError, ConversionResult};

/// Number of fractional digits kept after each operation
pub const SCALE: i64 = 10;

/// Parse a plain decimal string: optional sign, digits, optional fraction.
///
/// Exponent notation is rejected, so the digit count of a parsed value never
/// exceeds the length of its input.
pub fn parse(input: &str) -> Option<BigDecimal> {
    let trimmed = input.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let digits = BigInt::from_str(&format!("{}{}", int_part, frac_part)).ok()?;
    let digits = if negative { -digits } else { digits };
    Some(BigDecimal::new(digits, frac_part.len() as i64))
}

/// Whether the string is a number `parse` would accept
pub fn is_numeric(input: &str) -> bool {
    parse(input).is_some()
}

/// Truncate a value toward zero at the working scale
pub fn rescale(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(SCALE, RoundingMode::Down)
}

pub fn add(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    rescale(&(a + b))
}

pub fn sub(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    rescale(&(a - b))
}

pub fn mul(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    rescale(&(a * b))
}

/// Quotient truncated toward zero at [`SCALE`] digits
///
/// Computed on the unscaled integers, so the last digit is exact however
/// many digits the operands carry.
pub fn div(a: &BigDecimal, b: &BigDecimal) -> ConversionResult<BigDecimal> {
    if b.is_zero() {
        return Err(ConversionError::DivisionByZero);
    }

    let (a_digits, a_scale) = a.as_bigint_and_exponent();
    let (b_digits, b_scale) = b.as_bigint_and_exponent();
    let ten = BigInt::from(10u8);

    // a / b * 10^SCALE == a_digits / b_digits * 10^shift
    let shift = SCALE + b_scale - a_scale;
    let quotient = if shift >= 0 {
        a_digits * ten.pow(shift as u32) / b_digits
    } else {
        a_digits / (b_digits * ten.pow(shift.unsigned_abs() as u32))
    };

    Ok(BigDecimal::new(quotient, SCALE))
}

/// Render in plain notation with exactly [`SCALE`] fractional digits
pub fn to_plain_string(value: &BigDecimal) -> String {
    rescale(value).to_plain_string()
}

/// Plain notation with trailing fractional zeros removed ("32.5000000000" -> "32.5")
pub fn to_trimmed_string(value: &BigDecimal) -> String {
    let plain = to_plain_string(value);
    plain.trim_end_matches('0').trim_end_matches('.').to_string()
}
