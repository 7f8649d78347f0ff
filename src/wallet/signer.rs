//! Signing wallet
//!
//! The private key is only held by alloy's `PrivateKeySigner`. It is read
//! from the environment into a `SecretString`, never logged and never
//! serialized.

use crate::{Error, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use secrecy::{ExposeSecret, SecretString};

/// Wallet used to sign swap transactions
pub struct SecureWallet {
    address: Address,
    wallet: EthereumWallet,
}

impl SecureWallet {
    /// Load the private key from `var_name`.
    ///
    /// A missing or empty variable is reported as a wallet error before any
    /// network activity happens.
    pub fn from_env(var_name: &str) -> Result<Self> {
        let key = std::env::var(var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                Error::Wallet(format!("Private key not found: set {} in .env", var_name))
            })?;

        Self::from_secret(&key)
    }

    pub fn from_secret(key: &SecretString) -> Result<Self> {
        let key_hex = key.expose_secret().trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| Error::Wallet(format!("Invalid private key: {}", e)))?;

        let address = signer.address();
        Ok(Self {
            address,
            wallet: EthereumWallet::from(signer),
        })
    }

    /// Create a wallet from a hex-encoded private key
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        Self::from_secret(&SecretString::from(key_hex.to_string()))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-55 checksummed address
    pub fn address_string(&self) -> String {
        self.address.to_checksum(None)
    }

    /// Signing wallet for alloy providers
    pub fn wallet(&self) -> &EthereumWallet {
        &self.wallet
    }
}

impl std::fmt::Debug for SecureWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureWallet")
            .field("address", &self.address)
            .field("signer", &"[REDACTED]")
            .finish()
    }
}
