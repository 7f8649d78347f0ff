//! Typed decoding of Euclid swap responses

use crate::{Error, Result};
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Response to a quote request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// JSON document encoded as a string
    #[serde(default)]
    pub meta: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteMeta {
    swaps: MetaSwaps,
}

#[derive(Debug, Deserialize)]
struct MetaSwaps {
    path: Vec<MetaPathStep>,
}

#[derive(Debug, Deserialize)]
struct MetaPathStep {
    #[serde(default)]
    amount_out: Option<String>,
}

/// Where a quote's output amount came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountOut {
    /// Decoded from the response `meta`
    Quoted(U256),
    /// Response had no `meta`; the route's default estimate applies
    Default(U256),
}

impl AmountOut {
    pub fn value(&self) -> U256 {
        match self {
            AmountOut::Quoted(v) | AmountOut::Default(v) => *v,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, AmountOut::Default(_))
    }
}

impl QuoteResponse {
    /// Output amount of the first swap path.
    ///
    /// A missing or blank `meta` falls back to `default_amount_out`. A
    /// malformed `meta` is an error. A missing, empty or zero amount is
    /// [`Error::ZeroAmountOut`].
    pub fn amount_out(&self, default_amount_out: &str) -> Result<AmountOut> {
        match self.meta.as_deref().filter(|m| !m.trim().is_empty()) {
            None => Ok(AmountOut::Default(parse_amount(Some(default_amount_out))?)),
            Some(raw) => {
                let meta: QuoteMeta = serde_json::from_str(raw)
                    .map_err(|e| Error::Api(format!("Malformed quote meta: {}", e)))?;
                let first = meta.swaps.path.first().ok_or_else(|| {
                    Error::Api("Quote meta contains an empty swap path".to_string())
                })?;
                Ok(AmountOut::Quoted(parse_amount(first.amount_out.as_deref())?))
            }
        }
    }
}

fn parse_amount(raw: Option<&str>) -> Result<U256> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = raw else {
        return Err(Error::ZeroAmountOut);
    };
    let value = U256::from_str_radix(raw, 10)
        .map_err(|e| Error::Api(format!("amount_out '{}' is not an integer: {}", raw, e)))?;
    if value.is_zero() {
        return Err(Error::ZeroAmountOut);
    }
    Ok(value)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildMessage {
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSender {
    #[serde(default)]
    pub address: Option<String>,
}

/// Response to a build request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildResponse {
    #[serde(default)]
    pub msgs: Option<Vec<BuildMessage>>,
    #[serde(default)]
    pub sender: Option<BuildSender>,
}

impl BuildResponse {
    /// Call data of the first message, checked against the wallet that will
    /// sign it.
    pub fn call_data_for(&self, wallet: Address) -> Result<Bytes> {
        let data = self
            .msgs
            .as_ref()
            .and_then(|msgs| msgs.first())
            .and_then(|msg| msg.data.as_deref())
            .filter(|d| !d.is_empty())
            .ok_or(Error::MissingCallData)?;

        let expected = wallet.to_checksum(None);
        let declared = self.sender.as_ref().and_then(|s| s.address.as_deref());
        match declared {
            Some(actual) if actual.eq_ignore_ascii_case(&expected) => {}
            other => {
                return Err(Error::SenderMismatch {
                    expected,
                    actual: other.unwrap_or("<none>").to_string(),
                })
            }
        }

        Bytes::from_str(data).map_err(|e| Error::Api(format!("Invalid calldata hex: {}", e)))
    }
}
