//! Error types shared by the atlas crates.

use thiserror::Error;

/// Errors from encoding or decoding LAND token ids.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenIdError {
    #[error("coordinate {axis}={value} out of range (must be within ±{limit})")]
    OutOfRange {
        axis: char,
        value: i64,
        limit: i64,
    },

    #[error("invalid token id: {0}")]
    Malformed(String),
}

/// Errors raised while checking whether a bidder can cover a bid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BidCheckError {
    #[error("Could not connect to Ethereum")]
    NotConnected,

    #[error("Invalid address. Wallet must be connected.")]
    WalletNotConnected,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("balance lookup failed: {0}")]
    Balance(String),
}
