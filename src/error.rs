//! Error types for the swap runner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Console error: {0}")]
    Console(String),

    #[error("Swap API error: {0}")]
    Api(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction simulation failed: {0}")]
    Simulation(String),

    #[error("Insufficient ETH balance. Required: {required} ETH, Available: {available} ETH")]
    InsufficientBalance { required: String, available: String },

    #[error("Operation cancelled by user")]
    Cancelled,

    #[error("Invalid amount_out in API response")]
    ZeroAmountOut,

    #[error("Calldata not found in API response (expected in msgs[0].data)")]
    MissingCallData,

    #[error("API returned incorrect sender address: {actual}. Expected: {expected}")]
    SenderMismatch { expected: String, actual: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors that end the run when raised before the first swap. Inside
    /// the loop every failure only skips its iteration.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Config(_)
                | Error::InvalidArgument(_)
                | Error::Wallet(_)
                | Error::Console(_)
                | Error::Rpc(_)
                | Error::InsufficientBalance { .. }
                | Error::Cancelled
        )
    }

    /// Revert reason attached to a failed simulation, if any.
    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Error::Simulation(reason) => Some(reason),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
