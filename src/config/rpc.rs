//! RPC endpoint resolution
//!
//! Priority:
//! 1. `ARBITRUM_SEPOLIA_RPC_URL` env var
//! 2. `network.rpc_url` from the config file
//! 3. Public Arbitrum Sepolia RPC (rate limited, for testing only)

/// Chain ID constants
pub mod chains {
    pub const ARBITRUM_SEPOLIA: u64 = 421614;
}

/// Environment variable names
pub mod env_vars {
    pub const ARBITRUM_SEPOLIA_RPC_URL: &str = "ARBITRUM_SEPOLIA_RPC_URL";
}

/// Public RPC endpoints
pub mod public_rpcs {
    pub const ARBITRUM_SEPOLIA: &str = "https://sepolia-rollup.arbitrum.io/rpc";
}

/// Resolved RPC endpoint for the target chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    chain_id: u64,
    url: String,
}

impl RpcConfig {
    /// Resolve the RPC URL from the environment, then `configured`, then the
    /// public fallback.
    pub fn resolve(chain_id: u64, configured: Option<&str>) -> Self {
        let from_env = std::env::var(env_vars::ARBITRUM_SEPOLIA_RPC_URL)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::resolve_with(chain_id, from_env, configured)
    }

    fn resolve_with(chain_id: u64, from_env: Option<String>, configured: Option<&str>) -> Self {
        if let Some(url) = from_env {
            tracing::debug!("Using ARBITRUM_SEPOLIA_RPC_URL");
            return Self { chain_id, url };
        }

        if let Some(url) = configured.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("Using RPC URL from config file");
            return Self {
                chain_id,
                url: url.to_string(),
            };
        }

        tracing::warn!("No RPC configured for Arbitrum Sepolia, using public RPC (rate limited)");
        Self {
            chain_id,
            url: public_rpcs::ARBITRUM_SEPOLIA.to_string(),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
