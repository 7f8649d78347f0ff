//! Swap kinds, their fixed routes and the menu that selects them

use crate::{Error, Result};
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-hop output estimate expressed as a multiple of the final amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopRatio {
    pub token: &'static str,
    pub numerator: u64,
    pub denominator: u64,
}

impl HopRatio {
    const fn new(token: &'static str, numerator: u64, denominator: u64) -> Self {
        Self {
            token,
            numerator,
            denominator,
        }
    }

    /// floor(amount_out * numerator / denominator). Fails instead of wrapping
    /// when the quoted amount is too large for the multiplication.
    pub fn apply(&self, amount_out: U256) -> Result<U256> {
        amount_out
            .checked_mul(U256::from(self.numerator))
            .map(|scaled| scaled / U256::from(self.denominator))
            .ok_or_else(|| {
                Error::Api(format!(
                    "amount_out {} overflows the {} hop estimate",
                    amount_out, self.token
                ))
            })
    }
}

/// Static description of one swap kind
#[derive(Debug, Clone, Copy)]
pub struct RouteProfile {
    pub label: &'static str,
    pub target_chain_uid: &'static str,
    pub default_amount_out: &'static str,
    pub route: &'static [&'static str],
    pub hops: &'static [HopRatio],
    pub manual_gas_limit: u64,
}

static EUCLID_ROUTE: RouteProfile = RouteProfile {
    label: "ETH to EUCLID",
    target_chain_uid: "optimism",
    default_amount_out: "11580659",
    route: &["eth", "euclid"],
    hops: &[HopRatio::new("euclid", 1, 1)],
    manual_gas_limit: 812_028,
};

static ANDR_ROUTE: RouteProfile = RouteProfile {
    label: "ETH to ANDR",
    target_chain_uid: "andromeda",
    default_amount_out: "1471120",
    route: &["eth", "euclid", "usdc", "usdt", "andr"],
    hops: &[
        HopRatio::new("euclid", 9_934, 1_000),
        HopRatio::new("usdc", 13_936, 100),
        HopRatio::new("usdt", 27_187, 100),
        HopRatio::new("andr", 1, 1),
    ],
    manual_gas_limit: 1_500_000,
};

/// Destination token of a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapKind {
    /// ETH to EUCLID on Optimism
    Euclid,
    /// ETH to ANDR on Andromeda, routed through USDC and USDT
    Andr,
}

impl SwapKind {
    pub fn profile(&self) -> &'static RouteProfile {
        match self {
            SwapKind::Euclid => &EUCLID_ROUTE,
            SwapKind::Andr => &ANDR_ROUTE,
        }
    }
}

impl fmt::Display for SwapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().label)
    }
}

impl FromStr for SwapKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "euclid" => Ok(SwapKind::Euclid),
            "andr" => Ok(SwapKind::Andr),
            other => Err(Error::InvalidArgument(format!(
                "Unknown swap kind: {} (expected euclid or andr)",
                other
            ))),
        }
    }
}

/// How the swap kind is chosen for each iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapMode {
    Fixed(SwapKind),
    /// Even iterations swap to EUCLID, odd ones to ANDR
    Alternating,
}

impl SwapMode {
    pub fn kind_for(&self, index: u32) -> SwapKind {
        match self {
            SwapMode::Fixed(kind) => *kind,
            SwapMode::Alternating if index % 2 == 0 => SwapKind::Euclid,
            SwapMode::Alternating => SwapKind::Andr,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SwapMode::Fixed(kind) => kind.profile().label,
            SwapMode::Alternating => "Random (EUCLID/ANDR)",
        }
    }
}

/// Main menu entries
pub const MENU: [&str; 4] = [
    "1. ETH - EUCLID (Arbitrum)",
    "2. ETH - ANDR (Arbitrum)",
    "3. Random Swap (Arbitrum)",
    "4. Exit",
];

/// Parsed main menu answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Swap(SwapMode),
    Exit,
    Invalid,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => MenuChoice::Swap(SwapMode::Fixed(SwapKind::Euclid)),
            "2" => MenuChoice::Swap(SwapMode::Fixed(SwapKind::Andr)),
            "3" => MenuChoice::Swap(SwapMode::Alternating),
            "4" => MenuChoice::Exit,
            _ => MenuChoice::Invalid,
        }
    }
}
