use std::str::FromStr;

use alloy_primitives::U256;

use crate::error::{PolkagivError, PolkagivResult};

/// Renders a raw token amount as an exact decimal string, keeping at least
/// one fractional digit (`50000000` at 6 decimals is `"50.0"`).
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };

    let (integer, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        format!("{}.0", integer)
    } else {
        format!("{}.{}", integer, fraction)
    }
}

/// Inverse of [`format_units`].
pub fn parse_units(amount: &str, decimals: u8) -> PolkagivResult<U256> {
    let amount = amount.trim();
    let decimals = decimals as usize;

    let (integer, fraction) = match amount.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (amount, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err(PolkagivError::Units(format!("empty amount: {:?}", amount)));
    }

    if !integer.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(PolkagivError::Units(format!("not a decimal number: {}", amount)));
    }

    let fraction = if fraction.len() > decimals {
        let (kept, dropped) = fraction.split_at(decimals);
        if dropped.chars().any(|c| c != '0') {
            return Err(PolkagivError::Units(format!(
                "{} has more than {} fractional digits",
                amount, decimals
            )));
        }
        kept.to_string()
    } else {
        format!("{:0<width$}", fraction, width = decimals)
    };

    let combined = format!("{}{}", integer, fraction);
    let combined = combined.trim_start_matches('0');
    if combined.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str(combined)
        .map_err(|e| PolkagivError::Units(format!("{} does not fit in 256 bits: {}", amount, e)))
}

/// Lossy conversion used for USD arithmetic.
pub fn to_f64(value: U256, decimals: u8) -> f64 {
    format_units(value, decimals).parse::<f64>().unwrap_or(0.0)
}
