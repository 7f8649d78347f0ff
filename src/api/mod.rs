//! Euclid HTTP APIs
//!
//! [`SwapApi`] is the seam between the runner and the remote quote, build and
//! tracking endpoints. [`EuclidClient`] is the reqwest implementation.

mod euclid;

pub use euclid::EuclidClient;

use crate::swap::{BuildResponse, QuoteResponse, SwapRequest};
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Referral tracking record for a confirmed swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEvent {
    pub chain_uid: String,
    pub tx_hash: String,
    pub wallet_address: String,
    pub referral_code: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TrackEvent {
    pub fn swap(chain_uid: &str, tx_hash: String, wallet_address: String, referral_code: &str) -> Self {
        Self {
            chain_uid: chain_uid.to_string(),
            tx_hash,
            wallet_address,
            referral_code: referral_code.to_string(),
            kind: "swap".to_string(),
        }
    }
}

#[async_trait]
pub trait SwapApi: Send + Sync {
    /// Ask the swap endpoint for a quote
    async fn quote(&self, request: &SwapRequest) -> Result<QuoteResponse>;

    /// Ask the swap endpoint for call data
    async fn build(&self, request: &SwapRequest) -> Result<BuildResponse>;

    /// Report a confirmed transaction to the tracking endpoint
    async fn track(&self, event: &TrackEvent) -> Result<()>;
}
