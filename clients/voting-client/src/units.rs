//! Decimal token amounts <-> integer base units.

use std::fmt;

pub const TOKEN_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    Empty,
    InvalidDigit,
    TooManyDecimals { max: u8 },
    Overflow,
}

impl fmt::Display for UnitsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitsError::Empty => write!(f, "amount is empty"),
            UnitsError::InvalidDigit => write!(f, "amount must be a non-negative decimal number"),
            UnitsError::TooManyDecimals { max } => write!(f, "amount has more than {max} decimals"),
            UnitsError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for UnitsError {}

/// `"1.5"` at 18 decimals -> `1_500_000_000_000_000_000`.
pub fn parse_units(amount: &str, decimals: u8) -> Result<u128, UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }
    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(UnitsError::InvalidDigit);
    }
    if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(UnitsError::InvalidDigit);
    }
    if frac.len() > decimals as usize {
        return Err(UnitsError::TooManyDecimals { max: decimals });
    }

    let scale = 10u128.checked_pow(decimals as u32).ok_or(UnitsError::Overflow)?;
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| UnitsError::Overflow)?
    };
    let frac_value: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = decimals as usize);
        padded.parse().map_err(|_| UnitsError::Overflow)?
    };
    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_value))
        .ok_or(UnitsError::Overflow)
}

/// Inverse of [`parse_units`], trimming trailing zeros.
pub fn format_units(value: u128, decimals: u8) -> String {
    // Past 38 decimals every u128 is below one whole token.
    let (whole, frac) = match 10u128.checked_pow(decimals as u32) {
        Some(scale) => (value / scale, value % scale),
        None => (0, value),
    };
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0>width$}", width = decimals as usize);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
