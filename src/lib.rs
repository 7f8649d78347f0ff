//! Euclid Swap Runner
//!
//! Automates ETH swaps through the Euclid protocol testnet deployment on
//! Arbitrum Sepolia:
//! - Quotes and builds swaps through the Euclid HTTP API
//! - Estimates, simulates and submits the resulting transactions
//! - Reports confirmed swaps to the Euclid referral tracker
//!
//! # Security Model
//!
//! - The private key is read once from the environment and never leaves the
//!   wallet module
//! - Every transaction is simulated before it is broadcast
//! - Call data is only sent when the API built it for the local wallet

pub mod amount;
pub mod api;
pub mod chain;
pub mod config;
pub mod console;
pub mod executor;
pub mod journal;
pub mod retry;
pub mod runner;
pub mod swap;
pub mod wallet;

mod error;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{Config, RpcConfig, PRIVATE_KEY_ENV};
pub use error::{Error, Result};
pub use runner::{RunOutcome, RunSummary, SwapRunner};
