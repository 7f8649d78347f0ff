//! Fixed-point amounts in integer base units
//!
//! ETH amounts are entered as decimal strings ("0.001") and handled as wei
//! (`U256`) everywhere else. Scaling is done by alloy's unit helpers; this
//! module only narrows what counts as a valid amount.

use crate::{Error, Result};
use alloy::primitives::utils::{self, UnitsError};
use alloy::primitives::U256;

/// Decimals of the native asset.
pub const ETHER_DECIMALS: u8 = 18;

/// Parse a plain decimal string into base units.
///
/// Accepts `"1"`, `"0.001"`, `".5"` and `"2."`. Rejects signs, exponents,
/// separators and more fractional digits than `decimals`. alloy would
/// silently truncate the extra digits or accept a leading `-`.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256> {
    let trimmed = input.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction)
    {
        return Err(Error::InvalidArgument(format!(
            "'{}' is not a decimal amount",
            input
        )));
    }
    if fraction.len() > decimals as usize {
        return Err(Error::InvalidArgument(format!(
            "'{}' has more than {} fractional digits",
            input, decimals
        )));
    }

    utils::parse_units(trimmed, decimals)
        .map(Into::into)
        .map_err(|e| units_error(input, e))
}

/// Parse an ETH amount into wei.
pub fn parse_ether(input: &str) -> Result<U256> {
    parse_units(input, ETHER_DECIMALS)
}

/// Format base units as a decimal string without trailing zeros.
pub fn format_units(value: U256, decimals: u8) -> Result<String> {
    utils::format_units(value, decimals)
        .map(|s| trim_fraction(&s).to_string())
        .map_err(|e| units_error(&value.to_string(), e))
}

/// Format wei as ETH.
pub fn format_ether(value: U256) -> String {
    trim_fraction(&utils::format_ether(value)).to_string()
}

fn trim_fraction(formatted: &str) -> &str {
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted
    }
}

fn units_error(input: &str, e: UnitsError) -> Error {
    Error::InvalidArgument(format!("'{}': {}", input, e))
}
