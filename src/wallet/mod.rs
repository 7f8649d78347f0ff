//! Wallet management
//!
//! The private key never leaves this module.

mod signer;

pub use signer::SecureWallet;
