//! Blockchain RPC access
//!
//! [`ChainClient`] covers the handful of RPC calls the runner needs. Calls are
//! never retried: a failure here fails the current iteration only.

mod revert;
mod rpc;

pub use revert::parse_revert_reason;
pub use rpc::{EnvConnector, RpcChain};

use crate::Result;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// EIP-1559 transaction ready to be estimated, simulated and sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
    pub gas_limit: u64,
    pub nonce: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    pub chain_id: u64,
}

impl PendingTransaction {
    pub fn to_request(&self) -> TransactionRequest {
        let mut request = TransactionRequest::default()
            .from(self.from)
            .to(self.to)
            .value(self.value)
            .input(self.input.clone().into())
            .gas_limit(self.gas_limit)
            .nonce(self.nonce)
            .max_fee_per_gas(self.max_fee_per_gas)
            .max_priority_fee_per_gas(self.max_priority_fee_per_gas);
        request.chain_id = Some(self.chain_id);
        request
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

/// Confirmed outcome of one submitted transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionResult {
    pub hash: B256,
    pub status: TxStatus,
    pub gas_used: u64,
}

impl TransactionResult {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Success
    }
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native balance in wei
    async fn balance(&self, address: Address) -> Result<U256>;

    /// Transaction count including pending transactions
    async fn pending_nonce(&self, address: Address) -> Result<u64>;

    async fn estimate_gas(&self, tx: &PendingTransaction) -> Result<u64>;

    /// Dry-run against current state. Fails with [`crate::Error::Simulation`]
    /// carrying the decoded revert reason.
    async fn simulate(&self, tx: &PendingTransaction) -> Result<()>;

    /// Sign and broadcast; returns the transaction hash
    async fn submit(&self, tx: &PendingTransaction) -> Result<B256>;

    /// Block until the transaction is mined
    async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionResult>;
}

/// Signer address with a chain client acting for it
pub struct Session<C> {
    pub wallet: Address,
    pub chain: Arc<C>,
}

impl<C> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet,
            chain: self.chain.clone(),
        }
    }
}

/// Opens a [`Session`] on demand, so the key is only needed once there is
/// something to sign.
pub trait Connect: Send + Sync {
    type Chain: ChainClient;

    fn connect(&self) -> Result<Session<Self::Chain>>;
}

/// An already open session connects to itself
impl<C: ChainClient> Connect for Session<C> {
    type Chain = C;

    fn connect(&self) -> Result<Session<C>> {
        Ok(self.clone())
    }
}
