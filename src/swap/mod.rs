//! Euclid swap documents
//!
//! Pure data: routes per swap kind, the request document posted to the swap
//! endpoint, and typed decoding of its responses. No I/O happens here.

mod request;
mod response;
mod route;

pub use request::{
    AssetIn, ChainAddress, CrossChainAddress, OutputLimit, PartnerFee, PathStep, SwapPath,
    SwapRequest,
};
pub use response::{AmountOut, BuildMessage, BuildResponse, BuildSender, QuoteResponse};
pub use route::{HopRatio, MenuChoice, RouteProfile, SwapKind, SwapMode, MENU};
