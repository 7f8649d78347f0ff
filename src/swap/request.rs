//! Swap request document sent to the Euclid swap endpoint
//!
//! The same document shape is posted twice per transaction: once with a zero
//! `amount_out` to obtain a quote, and once with the quoted amount to get the
//! call data.

use super::route::SwapKind;
use crate::config::SwapSettings;
use crate::{Error, Result};
use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeToken {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub denom: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenType {
    #[serde(rename = "__typename")]
    pub typename: String,
    pub native: NativeToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIn {
    pub token: String,
    pub token_type: TokenType,
}

impl AssetIn {
    /// Native ETH
    pub fn native_eth() -> Self {
        Self {
            token: "eth".to_string(),
            token_type: TokenType {
                typename: "NativeTokenType".to_string(),
                native: NativeToken {
                    typename: "NativeToken".to_string(),
                    denom: "eth".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAddress {
    pub address: String,
    pub chain_uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLimit {
    pub less_than_or_equal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossChainAddress {
    pub user: ChainAddress,
    pub limit: OutputLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerFee {
    pub partner_fee_bps: u32,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub route: Vec<String>,
    pub dex: String,
    pub amount_in: String,
    pub amount_out: String,
    pub chain_uid: String,
    /// Entries formatted as `"<token>: <amount>"`
    pub amount_out_for_hops: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPath {
    pub path: Vec<PathStep>,
    pub total_price_impact: String,
}

/// Body of a quote or build request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub amount_in: String,
    pub asset_in: AssetIn,
    /// Slippage in basis points, as a decimal string
    pub slippage: String,
    pub cross_chain_addresses: Vec<CrossChainAddress>,
    #[serde(rename = "partnerFee")]
    pub partner_fee: PartnerFee,
    pub sender: ChainAddress,
    pub swap_path: SwapPath,
}

impl SwapRequest {
    /// Request used to obtain a quote: zero output, zero hops, and the
    /// route's default estimate as the destination limit.
    pub fn for_quote(
        settings: &SwapSettings,
        kind: SwapKind,
        wallet: Address,
        amount_in: U256,
    ) -> Result<Self> {
        let profile = kind.profile();
        let hops = profile
            .route
            .iter()
            .map(|token| format!("{}: 0", token))
            .collect();

        Self::assemble(
            settings,
            kind,
            wallet,
            amount_in,
            profile.default_amount_out.to_string(),
            "0".to_string(),
            hops,
        )
    }

    /// Request used to obtain call data for a quoted `amount_out`.
    pub fn for_build(
        settings: &SwapSettings,
        kind: SwapKind,
        wallet: Address,
        amount_in: U256,
        amount_out: U256,
    ) -> Result<Self> {
        if amount_out.is_zero() {
            return Err(Error::ZeroAmountOut);
        }

        let hops = kind
            .profile()
            .hops
            .iter()
            .map(|hop| Ok(format!("{}: {}", hop.token, hop.apply(amount_out)?)))
            .collect::<Result<Vec<_>>>()?;

        Self::assemble(
            settings,
            kind,
            wallet,
            amount_in,
            amount_out.to_string(),
            amount_out.to_string(),
            hops,
        )
    }

    fn assemble(
        settings: &SwapSettings,
        kind: SwapKind,
        wallet: Address,
        amount_in: U256,
        limit: String,
        amount_out: String,
        amount_out_for_hops: Vec<String>,
    ) -> Result<Self> {
        if amount_in.is_zero() {
            return Err(Error::InvalidArgument(
                "amount_in must be greater than zero".to_string(),
            ));
        }

        let profile = kind.profile();
        let wallet = wallet.to_checksum(None);
        let amount_in = amount_in.to_string();

        Ok(Self {
            amount_in: amount_in.clone(),
            asset_in: AssetIn::native_eth(),
            slippage: settings.slippage_bps.to_string(),
            cross_chain_addresses: vec![CrossChainAddress {
                user: ChainAddress {
                    address: wallet.clone(),
                    chain_uid: profile.target_chain_uid.to_string(),
                },
                limit: OutputLimit {
                    less_than_or_equal: limit,
                },
            }],
            partner_fee: PartnerFee {
                partner_fee_bps: settings.partner_fee_bps,
                recipient: wallet.clone(),
            },
            sender: ChainAddress {
                address: wallet,
                chain_uid: settings.sender_chain_uid.clone(),
            },
            swap_path: SwapPath {
                path: vec![PathStep {
                    route: profile.route.iter().map(|t| t.to_string()).collect(),
                    dex: settings.dex.clone(),
                    amount_in,
                    amount_out,
                    chain_uid: settings.routing_chain_uid.clone(),
                    amount_out_for_hops,
                }],
                total_price_impact: "0.00".to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const WALLET: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    fn one_milli_eth() -> U256 {
        U256::from(1_000_000_000_000_000u64)
    }

    #[test]
    fn quote_request_shape() {
        let request = SwapRequest::for_quote(
            &SwapSettings::default(),
            SwapKind::Euclid,
            WALLET,
            one_milli_eth(),
        )
        .unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["amount_in"], "1000000000000000");
        assert_eq!(value["slippage"], "500");
        assert_eq!(value["asset_in"]["token_type"]["__typename"], "NativeTokenType");
        assert_eq!(
            value["asset_in"]["token_type"]["native"]["__typename"],
            "NativeToken"
        );
        assert_eq!(value["partnerFee"]["partner_fee_bps"], 10);
        assert_eq!(value["sender"]["chain_uid"], "arbitrum");
        assert_eq!(
            value["cross_chain_addresses"][0]["user"]["chain_uid"],
            "optimism"
        );
        assert_eq!(
            value["cross_chain_addresses"][0]["limit"]["less_than_or_equal"],
            "11580659"
        );

        let step = &value["swap_path"]["path"][0];
        assert_eq!(step["amount_out"], "0");
        assert_eq!(step["chain_uid"], "vsl");
        assert_eq!(step["dex"], "euclid");
        assert_eq!(
            step["amount_out_for_hops"],
            serde_json::json!(["eth: 0", "euclid: 0"])
        );
        assert_eq!(value["swap_path"]["total_price_impact"], "0.00");
    }

    #[test]
    fn addresses_are_checksummed() {
        let request = SwapRequest::for_quote(
            &SwapSettings::default(),
            SwapKind::Euclid,
            WALLET,
            one_milli_eth(),
        )
        .unwrap();
        assert_eq!(
            request.sender.address,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(request.partner_fee.recipient, request.sender.address);
        assert_eq!(
            request.cross_chain_addresses[0].user.address,
            request.sender.address
        );
    }

    #[test]
    fn build_request_for_andr_uses_hop_ratios() {
        let request = SwapRequest::for_build(
            &SwapSettings::default(),
            SwapKind::Andr,
            WALLET,
            one_milli_eth(),
            U256::from(1_471_120u64),
        )
        .unwrap();

        let step = &request.swap_path.path[0];
        assert_eq!(step.amount_out, "1471120");
        assert_eq!(
            step.route,
            vec!["eth", "euclid", "usdc", "usdt", "andr"]
        );
        assert_eq!(
            step.amount_out_for_hops,
            vec![
                "euclid: 14614106",
                "usdc: 205015283",
                "usdt: 399953394",
                "andr: 1471120"
            ]
        );
        assert_eq!(
            request.cross_chain_addresses[0].limit.less_than_or_equal,
            "1471120"
        );
        assert_eq!(request.cross_chain_addresses[0].user.chain_uid, "andromeda");
    }

    #[test]
    fn build_request_for_euclid_has_single_hop() {
        let request = SwapRequest::for_build(
            &SwapSettings::default(),
            SwapKind::Euclid,
            WALLET,
            one_milli_eth(),
            U256::from(11_580_659u64),
        )
        .unwrap();
        assert_eq!(
            request.swap_path.path[0].amount_out_for_hops,
            vec!["euclid: 11580659"]
        );
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let settings = SwapSettings::default();
        assert!(matches!(
            SwapRequest::for_quote(&settings, SwapKind::Euclid, WALLET, U256::ZERO),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            SwapRequest::for_build(
                &settings,
                SwapKind::Euclid,
                WALLET,
                one_milli_eth(),
                U256::ZERO
            ),
            Err(Error::ZeroAmountOut)
        ));
    }

    #[test]
    fn oversized_quote_fails_the_build() {
        let result = SwapRequest::for_build(
            &SwapSettings::default(),
            SwapKind::Andr,
            WALLET,
            one_milli_eth(),
            U256::MAX / U256::from(100u64),
        );
        assert!(matches!(result, Err(Error::Api(_))));
    }
}
