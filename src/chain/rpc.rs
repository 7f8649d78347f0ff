//! alloy-backed [`ChainClient`]

use super::{
    parse_revert_reason, ChainClient, Connect, PendingTransaction, Session, TransactionResult,
    TxStatus,
};
use crate::config::RpcConfig;
use crate::wallet::SecureWallet;
use crate::{Error, Result};
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Arc;

/// JSON-RPC connection with the wallet attached for signing
pub struct RpcChain {
    provider: DynProvider,
}

impl RpcChain {
    /// Build the provider. No request is made until the first call.
    pub fn connect(rpc: &RpcConfig, wallet: &SecureWallet) -> Result<Self> {
        let url: url::Url = rpc
            .url()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL: {}", e)))?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.wallet().clone())
            .connect_http(url)
            .erased();

        tracing::debug!(rpc_url = rpc.url(), chain_id = rpc.chain_id(), "RPC provider ready");

        Ok(Self { provider })
    }
}

/// Loads the key from an environment variable when the runner first needs
/// to sign, then attaches it to an [`RpcChain`].
pub struct EnvConnector {
    rpc: RpcConfig,
    key_var: &'static str,
}

impl EnvConnector {
    pub fn new(rpc: RpcConfig, key_var: &'static str) -> Self {
        Self { rpc, key_var }
    }
}

impl Connect for EnvConnector {
    type Chain = RpcChain;

    fn connect(&self) -> Result<Session<RpcChain>> {
        let wallet = SecureWallet::from_env(self.key_var)?;
        tracing::info!(address = %wallet.address_string(), "Loaded wallet from {}", self.key_var);

        let chain = RpcChain::connect(&self.rpc, &wallet)?;
        Ok(Session {
            wallet: wallet.address(),
            chain: Arc::new(chain),
        })
    }
}

#[async_trait]
impl ChainClient for RpcChain {
    async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get balance: {}", e)))
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get nonce: {}", e)))
    }

    async fn estimate_gas(&self, tx: &PendingTransaction) -> Result<u64> {
        self.provider
            .estimate_gas(tx.to_request())
            .await
            .map_err(|e| Error::Rpc(parse_revert_reason(&e.to_string())))
    }

    async fn simulate(&self, tx: &PendingTransaction) -> Result<()> {
        self.provider
            .call(tx.to_request())
            .await
            .map(|_| ())
            .map_err(|e| Error::Simulation(parse_revert_reason(&e.to_string())))
    }

    async fn submit(&self, tx: &PendingTransaction) -> Result<B256> {
        let pending = self
            .provider
            .send_transaction(tx.to_request())
            .await
            .map_err(|e| Error::Rpc(format!("Failed to send transaction: {}", e)))?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionResult> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), hash)
            .get_receipt()
            .await
            .map_err(|e| Error::Rpc(format!("Failed to get receipt for {}: {}", hash, e)))?;

        Ok(TransactionResult {
            hash,
            status: if receipt.status() {
                TxStatus::Success
            } else {
                TxStatus::Failed
            },
            gas_used: receipt.gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn rpc() -> RpcConfig {
        RpcConfig::resolve(421614, Some("http://127.0.0.1:8545"))
    }

    #[test]
    fn missing_key_fails_at_connect() {
        let connector = EnvConnector::new(rpc(), "EUCLID_SWAP_TEST_UNSET_KEY");
        assert!(matches!(connector.connect(), Err(Error::Wallet(_))));
    }

    #[test]
    fn connect_loads_the_key_without_network() {
        std::env::set_var("EUCLID_SWAP_TEST_CONNECT_KEY", ANVIL_KEY);
        let connector = EnvConnector::new(rpc(), "EUCLID_SWAP_TEST_CONNECT_KEY");

        let session = connector.connect().unwrap();
        assert_eq!(
            session.wallet,
            address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266")
        );
    }
}
