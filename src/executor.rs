//! Transaction execution
//!
//! Takes call data from the swap builder through gas estimation, simulation,
//! submission and confirmation. One transaction at a time, never retried.

use crate::chain::{ChainClient, PendingTransaction, TransactionResult};
use crate::config::Config;
use crate::Result;
use alloy::primitives::{Address, Bytes, U256};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fee and routing parameters applied to every transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub router: Address,
    pub chain_id: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub gas_buffer_percent: u64,
}

impl ExecutorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            router: config.network.router_contract,
            chain_id: config.network.chain_id,
            max_fee_per_gas: config.fees.max_fee_per_gas_wei,
            max_priority_fee_per_gas: config.fees.max_priority_fee_per_gas_wei,
            gas_buffer_percent: config.fees.gas_buffer_percent,
        }
    }

    /// estimate * (100 + buffer) / 100, rounded down
    pub fn buffered_gas(&self, estimate: u64) -> u64 {
        let limit = u128::from(estimate) * u128::from(100 + self.gas_buffer_percent) / 100;
        u64::try_from(limit).unwrap_or(u64::MAX)
    }
}

/// One swap call to send to the router
#[derive(Debug, Clone)]
pub struct SwapCall {
    pub from: Address,
    pub call_data: Bytes,
    pub value: U256,
    /// Gas limit used when the node cannot estimate
    pub fallback_gas_limit: u64,
}

pub struct TransactionExecutor<C: ChainClient> {
    chain: Arc<C>,
    settings: ExecutorSettings,
}

impl<C: ChainClient> TransactionExecutor<C> {
    pub fn new(chain: Arc<C>, settings: ExecutorSettings) -> Self {
        Self { chain, settings }
    }

    /// Build the transaction with a fresh pending nonce and the best gas limit
    /// available.
    pub async fn prepare(&self, call: &SwapCall) -> Result<PendingTransaction> {
        let nonce = self.chain.pending_nonce(call.from).await?;

        let mut tx = PendingTransaction {
            from: call.from,
            to: self.settings.router,
            value: call.value,
            input: call.call_data.clone(),
            gas_limit: call.fallback_gas_limit,
            nonce,
            max_fee_per_gas: self.settings.max_fee_per_gas,
            max_priority_fee_per_gas: self.settings.max_priority_fee_per_gas,
            chain_id: self.settings.chain_id,
        };

        match self.chain.estimate_gas(&tx).await {
            Ok(estimate) => {
                tx.gas_limit = self.settings.buffered_gas(estimate);
                info!(estimate, gas_limit = tx.gas_limit, "Gas estimated");
            }
            Err(e) => {
                warn!(
                    error = %e,
                    gas_limit = tx.gas_limit,
                    "Gas estimation failed, using manual gas limit"
                );
            }
        }

        Ok(tx)
    }

    /// Simulate, submit and wait for the receipt.
    ///
    /// A simulation failure aborts before anything is broadcast. A reverted
    /// receipt is returned as a [`TransactionResult`], not an error.
    pub async fn execute(&self, call: &SwapCall) -> Result<TransactionResult> {
        let tx = self.prepare(call).await?;

        self.chain.simulate(&tx).await?;
        debug!(nonce = tx.nonce, "Simulation passed");

        let hash = self.chain.submit(&tx).await?;
        info!(tx_hash = %hash, nonce = tx.nonce, gas_limit = tx.gas_limit, "Transaction sent");

        self.chain.wait_for_receipt(hash).await
    }
}
