//! Configuration for the swap runner
//!
//! Every section has defaults matching the public Euclid testnet deployment
//! on Arbitrum Sepolia, so a config file only needs the values it overrides.

pub mod rpc;

use crate::retry::RetryPolicy;
use crate::{Error, Result};
use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use rpc::RpcConfig;

/// Private key environment variable name
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

/// Euclid router contract on Arbitrum Sepolia
pub const ROUTER_CONTRACT: Address = address!("7f2CC9FE79961f628Da671Ac62d1f2896638edd5");

/// Target chain settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Chain ID the transactions are signed for
    pub chain_id: u64,
    /// RPC URL (overridden by ARBITRUM_SEPOLIA_RPC_URL)
    pub rpc_url: Option<String>,
    /// Contract receiving the swap transactions
    pub router_contract: Address,
    /// Block explorer prefix for transaction links
    pub explorer_tx_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: rpc::chains::ARBITRUM_SEPOLIA,
            rpc_url: None,
            router_contract: ROUTER_CONTRACT,
            explorer_tx_url: "https://sepolia.arbiscan.io/tx/".to_string(),
        }
    }
}

/// Euclid HTTP endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Quote and swap-build endpoint
    pub swap_url: String,
    /// Referral tracking endpoint
    pub track_url: String,
    /// Referer header for swap requests
    pub referer: String,
    /// Referer header for tracking requests
    pub track_referer: String,
    /// Referral code reported with each confirmed swap
    pub referral_code: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            swap_url: "https://testnet.api.euclidprotocol.com/api/v1/execute/astro/swap"
                .to_string(),
            track_url: "https://testnet.euclidswap.io/api/intract-track".to_string(),
            referer: "https://testnet.euclidswap.io/".to_string(),
            track_referer: "https://testnet.euclidswap.io/swap?ref=EUCLIDEAN667247".to_string(),
            referral_code: "EUCLIDEAN667247".to_string(),
        }
    }
}

/// Swap request parameters shared by every transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapSettings {
    /// Slippage tolerance in basis points
    pub slippage_bps: u32,
    /// Partner fee in basis points
    pub partner_fee_bps: u32,
    /// Chain UID of the sending chain as Euclid names it
    pub sender_chain_uid: String,
    /// DEX used for the swap path
    pub dex: String,
    /// Chain UID the swap path is routed through
    pub routing_chain_uid: String,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            slippage_bps: 500,
            partner_fee_bps: 10,
            sender_chain_uid: "arbitrum".to_string(),
            dex: "euclid".to_string(),
            routing_chain_uid: "vsl".to_string(),
        }
    }
}

/// Fee caps and balance reserve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// EIP-1559 max fee per gas (wei)
    pub max_fee_per_gas_wei: u128,
    /// EIP-1559 priority fee per gas (wei)
    pub max_priority_fee_per_gas_wei: u128,
    /// ETH reserved per transaction for gas in the balance check (wei)
    pub gas_reserve_per_tx_wei: u128,
    /// Margin added on top of the node's gas estimate (percent)
    pub gas_buffer_percent: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            max_fee_per_gas_wei: 100_000_000,          // 0.1 gwei
            max_priority_fee_per_gas_wei: 100_000_000, // 0.1 gwei
            gas_reserve_per_tx_wei: 97_940_000_000_000, // 0.00009794 ETH
            gas_buffer_percent: 10,
        }
    }
}

/// Pause between consecutive transactions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 5_000,
            max_delay_ms: 10_000,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub api: ApiConfig,
    pub swap: SwapSettings,
    pub fees: FeeConfig,
    pub pacing: PacingConfig,
    /// Retry policy for the HTTP APIs
    pub retry: RetryPolicy,
    /// Path to the JSONL run journal
    pub journal_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            api: ApiConfig::default(),
            swap: SwapSettings::default(),
            fees: FeeConfig::default(),
            pacing: PacingConfig::default(),
            retry: RetryPolicy::default(),
            journal_path: Some("swap-journal.jsonl".to_string()),
        }
    }
}

impl Config {
    /// Load a JSON config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the runner cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.pacing.min_delay_ms > self.pacing.max_delay_ms {
            return Err(Error::Config(format!(
                "pacing.min_delay_ms ({}) exceeds pacing.max_delay_ms ({})",
                self.pacing.min_delay_ms, self.pacing.max_delay_ms
            )));
        }
        if self.fees.max_priority_fee_per_gas_wei > self.fees.max_fee_per_gas_wei {
            return Err(Error::Config(
                "fees.max_priority_fee_per_gas_wei exceeds fees.max_fee_per_gas_wei".to_string(),
            ));
        }
        for (name, value) in [
            ("api.swap_url", &self.api.swap_url),
            ("api.track_url", &self.api.track_url),
            ("network.explorer_tx_url", &self.network.explorer_tx_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| Error::Config(format!("{} is not a valid URL: {}", name, e)))?;
        }
        Ok(())
    }
}
